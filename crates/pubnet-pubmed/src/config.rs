//! Archive parsing configuration

use std::path::PathBuf;

use crate::schema::InformationSet;

/// Runtime configuration for the archive parser
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Directory holding `*.gz` PubMed archives
    pub input_dir: PathBuf,
    /// Directory receiving `nodes_*.csv` / `links_*.csv`
    pub output_dir: PathBuf,
    /// MeSH descriptor UI an article must carry to be written
    pub mesh: Option<String>,
    /// Columns written between pmid and references
    pub informations: InformationSet,
}

impl ParseConfig {
    /// Set the topic filter; an empty or blank UI disables it
    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        let mesh = mesh.into();
        self.mesh = (!mesh.trim().is_empty()).then(|| mesh.trim().to_string());
        self
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data/pubmed"),
            output_dir: PathBuf::from("data/csv"),
            mesh: None,
            informations: InformationSet::all(),
        }
    }
}

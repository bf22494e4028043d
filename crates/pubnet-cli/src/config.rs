//! Configuration loading from TOML files

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pubnet_graph::GraphOptions;
use pubnet_pubmed::{Information, InformationSet, ParseConfig};
use serde::Deserialize;

/// Graph file name used when no topic term is configured
const DEFAULT_GRAPH_NAME: &str = "pubmed";

/// Global configuration for pubnet
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub mesh: MeshConfig,
    pub informations: InformationsConfig,
    pub graph: GraphConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Input archives
    pub pubmed: PathBuf,
    /// Intermediate node and link tables
    pub csv: PathBuf,
    /// Persisted graphs
    pub graph: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pubmed: PathBuf::from("./data/pubmed"),
            csv: PathBuf::from("./data/csv"),
            graph: PathBuf::from("./data/graph"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct MeshConfig {
    /// Descriptor UI required on written articles; empty disables the filter
    pub mesh: String,
    /// Topic term naming the graph file
    pub term_mesh: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InformationsConfig {
    pub info: Vec<String>,
}

impl Default for InformationsConfig {
    fn default() -> Self {
        Self {
            info: Information::ALL.iter().map(|i| i.name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub connected: bool,
    pub keep_unknown_nodes: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        let options = GraphOptions::default();
        Self {
            connected: options.connected,
            keep_unknown_nodes: options.keep_unknown_nodes,
        }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./pubnet.toml (current directory)
    /// 2. ~/.config/pubnet/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("pubnet.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "pubnet") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .informations()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Configured column selection
    pub fn informations(&self) -> Result<InformationSet> {
        InformationSet::parse_names(&self.informations.info).context("invalid [informations] info")
    }

    /// Parser settings: configured paths, topic filter and selection
    pub fn parse_config(&self) -> Result<ParseConfig> {
        let config = ParseConfig {
            input_dir: self.paths.pubmed.clone(),
            output_dir: self.paths.csv.clone(),
            mesh: None,
            informations: self.informations()?,
        };
        Ok(config.with_mesh(self.mesh.mesh.as_str()))
    }

    pub fn graph_options(&self) -> GraphOptions {
        GraphOptions {
            connected: self.graph.connected,
            keep_unknown_nodes: self.graph.keep_unknown_nodes,
        }
    }

    /// `<graph dir>/<term>.gexf`, `pubmed` when no term is set
    pub fn graph_path(&self) -> PathBuf {
        let term = self.mesh.term_mesh.trim();
        let name = if term.is_empty() { DEFAULT_GRAPH_NAME } else { term };
        self.paths.graph.join(format!("{name}.gexf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.paths.pubmed, PathBuf::from("./data/pubmed"));
        assert_eq!(config.paths.csv, PathBuf::from("./data/csv"));
        assert_eq!(config.informations().unwrap(), InformationSet::all());
        assert_eq!(config.graph_options(), GraphOptions::default());
        assert_eq!(config.graph_path(), PathBuf::from("./data/graph/pubmed.gexf"));
        assert!(config.parse_config().unwrap().mesh.is_none());
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[paths]
pubmed = "/tmp/archives"
graph = "/tmp/graphs"

[mesh]
mesh = "D004724"
term_mesh = "endoscopy"

[informations]
info = ["keywords", "title"]

[graph]
connected = false
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.paths.pubmed, PathBuf::from("/tmp/archives"));
        assert_eq!(config.paths.csv, PathBuf::from("./data/csv"));
        assert_eq!(config.graph_path(), PathBuf::from("/tmp/graphs/endoscopy.gexf"));
        assert!(!config.graph.connected);
        assert!(!config.graph.keep_unknown_nodes);

        let parse = config.parse_config().unwrap();
        assert_eq!(parse.mesh.as_deref(), Some("D004724"));
        assert_eq!(
            parse.informations.iter().collect::<Vec<_>>(),
            vec![Information::Title, Information::Keywords]
        );
    }

    #[test]
    fn unknown_information_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pubnet.toml");
        std::fs::write(&path, "[informations]\ninfo = [\"title\", \"doi\"]\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("doi"));
    }

    #[test]
    fn blank_mesh_disables_filter() {
        let config: Config = toml::from_str("[mesh]\nmesh = \"  \"\n").unwrap();
        assert!(config.parse_config().unwrap().mesh.is_none());
    }
}

//! Intermediate table manifest
//!
//! Lists the node and link files produced by the archive parser, so the
//! loader never has to guess which files in a directory belong to a run.

use std::io;
use std::path::{Path, PathBuf};

/// Kind of intermediate table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Nodes,
    Links,
}

impl TableKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Nodes => "nodes_",
            Self::Links => "links_",
        }
    }

    /// `nodes_<stem>.csv` / `links_<stem>.csv`
    pub fn file_name(self, stem: &str) -> String {
        format!("{}{stem}.csv", self.prefix())
    }
}

/// One table file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub kind: TableKind,
    pub path: PathBuf,
}

/// Ordered list of intermediate table files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: TableKind, path: impl Into<PathBuf>) {
        self.entries.push(ManifestEntry {
            kind,
            path: path.into(),
        });
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Paths of one kind, in manifest order
    pub fn paths(&self, kind: TableKind) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(move |e| e.kind == kind)
            .map(|e| e.path.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discover `nodes_*.csv` and `links_*.csv` in `dir`, sorted by file name
    pub fn from_dir(dir: &Path) -> io::Result<Self> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("table directory not found: {}", dir.display()),
            ));
        }

        let mut manifest = Self::new();
        for kind in [TableKind::Nodes, TableKind::Links] {
            let pattern = Path::new(&glob::Pattern::escape(&dir.to_string_lossy()))
                .join(format!("{}*.csv", kind.prefix()));
            let mut paths: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
                .filter_map(Result::ok)
                .filter(|p| p.is_file())
                .collect();
            paths.sort();
            for path in paths {
                manifest.push(kind, path);
            }
        }
        log::debug!("Found {} table files in {}", manifest.len(), dir.display());
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_names() {
        assert_eq!(TableKind::Nodes.file_name("test"), "nodes_test.csv");
        assert_eq!(TableKind::Links.file_name("pubmed26n0001"), "links_pubmed26n0001.csv");
    }

    #[test]
    fn paths_filter_by_kind() {
        let mut manifest = Manifest::new();
        manifest.push(TableKind::Nodes, "nodes_a.csv");
        manifest.push(TableKind::Links, "links_a.csv");
        manifest.push(TableKind::Nodes, "nodes_b.csv");

        let nodes: Vec<&Path> = manifest.paths(TableKind::Nodes).collect();
        assert_eq!(nodes, vec![Path::new("nodes_a.csv"), Path::new("nodes_b.csv")]);
        assert_eq!(manifest.paths(TableKind::Links).count(), 1);
        assert_eq!(manifest.len(), 3);
    }

    #[test]
    fn from_dir_discovers_tables() {
        let dir = TempDir::new().unwrap();
        for name in ["nodes_b.csv", "nodes_a.csv", "links_a.csv", "nodes_a.csv.tmp", "other.csv"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let manifest = Manifest::from_dir(dir.path()).unwrap();
        let names: Vec<String> = manifest
            .entries()
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["nodes_a.csv", "nodes_b.csv", "links_a.csv"]);
    }

    #[test]
    fn from_dir_missing() {
        let dir = TempDir::new().unwrap();
        assert!(Manifest::from_dir(&dir.path().join("missing")).is_err());
    }
}

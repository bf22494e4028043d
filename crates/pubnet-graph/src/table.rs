//! Node and link tables, and the loader reading them from intermediate files

use std::fs::File;
use std::io;
use std::path::Path;

use pubnet_core::{PipelineError, TsvSink};
use pubnet_pubmed::{InformationSet, Manifest, Pmid, TableKind};
use rustc_hash::FxHashSet;

/// One node row: pmid plus the selected columns and `references`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub pmid: Pmid,
    /// Values of `NodeTable::columns()[1..]`
    pub fields: Vec<String>,
}

/// Node rows sharing one information selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeTable {
    selection: InformationSet,
    rows: Vec<NodeRecord>,
}

impl NodeTable {
    pub fn new(selection: InformationSet) -> Self {
        Self {
            selection,
            rows: Vec::new(),
        }
    }

    pub fn selection(&self) -> InformationSet {
        self.selection
    }

    /// `pmid`, selected informations, `references`
    pub fn columns(&self) -> Vec<&'static str> {
        self.selection.node_columns()
    }

    /// Append a row; `fields` must hold one value per non-pmid column
    pub fn push(&mut self, pmid: Pmid, fields: Vec<String>) {
        debug_assert_eq!(fields.len() + 1, self.selection.node_width());
        self.rows.push(NodeRecord { pmid, fields });
    }

    pub fn rows(&self) -> &[NodeRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn pmids(&self) -> FxHashSet<Pmid> {
        self.rows.iter().map(|r| r.pmid).collect()
    }
}

/// Citation from `source` to `target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkRecord {
    pub source: Pmid,
    pub target: Pmid,
}

/// Link rows in file order; neither unique nor restricted to known nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    pub rows: Vec<LinkRecord>,
}

impl LinkTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write `source<TAB>target` rows. Returns the row count.
    pub fn write_tsv(&self, path: &Path) -> io::Result<usize> {
        let mut sink = TsvSink::create(path)?;
        for link in &self.rows {
            sink.write_row([link.source.to_string(), link.target.to_string()])?;
        }
        sink.finalize()
    }
}

impl FromIterator<(Pmid, Pmid)> for LinkTable {
    fn from_iter<I: IntoIterator<Item = (Pmid, Pmid)>>(iter: I) -> Self {
        Self {
            rows: iter
                .into_iter()
                .map(|(source, target)| LinkRecord { source, target })
                .collect(),
        }
    }
}

fn tsv_reader(file: File) -> csv::Reader<File> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(file)
}

fn csv_error(path: &Path, err: csv::Error) -> PipelineError {
    let line = err.position().map_or(0, |p| p.line());
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => PipelineError::Io(e),
        _ => PipelineError::MalformedTable {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}

fn malformed(path: &Path, record: &csv::StringRecord, message: String) -> PipelineError {
    PipelineError::MalformedTable {
        path: path.to_path_buf(),
        line: record.position().map_or(0, |p| p.line()),
        message,
    }
}

fn parse_pmid(path: &Path, record: &csv::StringRecord, value: &str) -> Result<Pmid, PipelineError> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed(path, record, format!("invalid pmid {value:?}")))
}

/// Open a table file; a missing file is skipped with a warning
fn open_table(path: &Path) -> Result<Option<csv::Reader<File>>, PipelineError> {
    match File::open(path) {
        Ok(file) => Ok(Some(tsv_reader(file))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("{}: not found, skipped", path.display());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Read every links file of the manifest into one table.
///
/// Returns `Ok(None)` when no file holds a row.
pub fn load_links(manifest: &Manifest) -> Result<Option<LinkTable>, PipelineError> {
    let mut table = LinkTable::default();
    let mut files_with_rows = 0usize;

    for path in manifest.paths(TableKind::Links) {
        let Some(mut reader) = open_table(path)? else {
            continue;
        };

        let mut file_rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;
            file_rows += 1;
            if record.len() != 2 {
                return Err(malformed(
                    path,
                    &record,
                    format!("expected 2 fields, found {}", record.len()),
                ));
            }
            table.rows.push(LinkRecord {
                source: parse_pmid(path, &record, &record[0])?,
                target: parse_pmid(path, &record, &record[1])?,
            });
        }

        if file_rows == 0 {
            log::warn!("{}: no rows, skipped", path.display());
        } else {
            files_with_rows += 1;
        }
    }

    if files_with_rows == 0 {
        log::error!("No articles found with these settings: every links file is empty");
        return Ok(None);
    }
    log::info!("Loaded {} links from {files_with_rows} files", table.len());
    Ok(Some(table))
}

/// Read every nodes file of the manifest into one table.
///
/// Rows with an empty pmid are dropped; any other row must have
/// `selection.node_width()` fields. Returns `Ok(None)` when no file holds a
/// row with an identifier.
pub fn load_nodes(
    manifest: &Manifest,
    selection: InformationSet,
) -> Result<Option<NodeTable>, PipelineError> {
    let width = selection.node_width();
    let mut table = NodeTable::new(selection);
    let mut files_with_rows = 0usize;
    let mut discarded = 0usize;

    for path in manifest.paths(TableKind::Nodes) {
        let Some(mut reader) = open_table(path)? else {
            continue;
        };

        let mut file_rows = 0usize;
        for record in reader.records() {
            let record = record.map_err(|e| csv_error(path, e))?;

            if record.get(0).is_none_or(|pmid| pmid.trim().is_empty()) {
                discarded += 1;
                continue;
            }
            if record.len() != width {
                return Err(malformed(
                    path,
                    &record,
                    format!("expected {width} fields for [{selection}], found {}", record.len()),
                ));
            }

            let pmid = parse_pmid(path, &record, &record[0])?;
            let fields = record.iter().skip(1).map(String::from).collect();
            table.push(pmid, fields);
            file_rows += 1;
        }

        if file_rows == 0 {
            log::warn!("{}: no rows with an identifier, skipped", path.display());
        } else {
            files_with_rows += 1;
        }
    }

    if table.is_empty() {
        log::error!("No articles found with these settings: no nodes file holds an identified row");
        return Ok(None);
    }
    if discarded > 0 {
        log::debug!("Discarded {discarded} rows without identifier");
    }
    log::info!("Loaded {} nodes from {files_with_rows} files", table.len());
    Ok(Some(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubnet_pubmed::Information;
    use tempfile::TempDir;

    fn manifest_with(dir: &Path, files: &[(TableKind, &str, &str)]) -> Manifest {
        let mut manifest = Manifest::new();
        for (kind, name, content) in files {
            let path = dir.join(name);
            std::fs::write(&path, content).unwrap();
            manifest.push(*kind, path);
        }
        manifest
    }

    #[test]
    fn links_concatenated_in_manifest_order() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[
                (TableKind::Links, "links_a.csv", "36464820\t36464821\n"),
                (TableKind::Links, "links_b.csv", ""),
                (TableKind::Links, "links_c.csv", "36464823\t36464822\n36464823\t36464827\n"),
            ],
        );

        let links = load_links(&manifest).unwrap().unwrap();
        let pairs: Vec<(Pmid, Pmid)> = links.rows.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(
            pairs,
            vec![
                (36464820, 36464821),
                (36464823, 36464822),
                (36464823, 36464827)
            ]
        );
    }

    #[test]
    fn all_empty_links_is_none() {
        let dir = TempDir::new().unwrap();
        let mut manifest = manifest_with(dir.path(), &[(TableKind::Links, "links_a.csv", "")]);
        manifest.push(TableKind::Links, dir.path().join("links_missing.csv"));
        assert!(load_links(&manifest).unwrap().is_none());
        assert!(load_links(&Manifest::new()).unwrap().is_none());
    }

    #[test]
    fn link_row_width_checked() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[(TableKind::Links, "links_a.csv", "36464820\t36464821\n36464820\n")],
        );
        let err = load_links(&manifest).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTable { line: 2, .. }));
    }

    #[test]
    fn non_numeric_link_rejected() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[(TableKind::Links, "links_a.csv", "36464820\tPMC123\n")],
        );
        assert!(matches!(
            load_links(&manifest),
            Err(PipelineError::MalformedTable { .. })
        ));
    }

    #[test]
    fn nodes_drop_partial_rows() {
        let dir = TempDir::new().unwrap();
        let selection = InformationSet::from(Information::Title);
        let manifest = manifest_with(
            dir.path(),
            &[(
                TableKind::Nodes,
                "nodes_a.csv",
                "\t\n36464820\tA title\t36464821, 36464824\n36464822\t\t\n",
            )],
        );

        let nodes = load_nodes(&manifest, selection).unwrap().unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes.columns(), vec!["pmid", "title", "references"]);
        assert_eq!(nodes.rows()[0].pmid, 36464820);
        assert_eq!(nodes.rows()[0].fields, vec!["A title", "36464821, 36464824"]);
        assert_eq!(nodes.rows()[1].fields, vec!["", ""]);
    }

    #[test]
    fn node_width_mismatch_is_malformed() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[(TableKind::Nodes, "nodes_a.csv", "36464820\tA title\t\n")],
        );

        let err = load_nodes(&manifest, InformationSet::all()).unwrap_err();
        match err {
            PipelineError::MalformedTable { path, line, .. } => {
                assert!(path.ends_with("nodes_a.csv"));
                assert_eq!(line, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_node_files_skipped() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[
                (TableKind::Nodes, "nodes_a.csv", ""),
                (TableKind::Nodes, "nodes_b.csv", "36464820\t\n"),
            ],
        );
        let nodes = load_nodes(&manifest, InformationSet::empty()).unwrap().unwrap();
        assert_eq!(nodes.len(), 1);

        let manifest = manifest_with(dir.path(), &[(TableKind::Nodes, "nodes_c.csv", "")]);
        assert!(load_nodes(&manifest, InformationSet::empty()).unwrap().is_none());
    }

    #[test]
    fn only_partial_rows_is_none() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[
                (TableKind::Nodes, "nodes_a.csv", "\t\n\t\n"),
                (TableKind::Nodes, "nodes_b.csv", ""),
            ],
        );
        assert!(load_nodes(&manifest, InformationSet::empty()).unwrap().is_none());
    }

    #[test]
    fn quotes_are_plain_text() {
        let dir = TempDir::new().unwrap();
        let manifest = manifest_with(
            dir.path(),
            &[(TableKind::Nodes, "nodes_a.csv", "36464820\tsay \"hi\"\t\n")],
        );
        let nodes = load_nodes(&manifest, InformationSet::from(Information::Title))
            .unwrap()
            .unwrap();
        assert_eq!(nodes.rows()[0].fields[0], "say \"hi\"");
    }

    #[test]
    fn link_table_write_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("links_graph.csv");
        let links: LinkTable = [(36464820, 36464821), (36464825, 36464828)].into_iter().collect();
        assert_eq!(links.write_tsv(&path).unwrap(), 2);

        let mut manifest = Manifest::new();
        manifest.push(TableKind::Links, &path);
        assert_eq!(load_links(&manifest).unwrap().unwrap(), links);
    }
}

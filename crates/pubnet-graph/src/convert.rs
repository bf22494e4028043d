//! Graph → table conversion

use std::io;
use std::path::Path;

use pubnet_core::TsvSink;
use pubnet_pubmed::schema::PMID_COLUMN;

use crate::assemble::CitationGraph;
use crate::table::LinkTable;

/// Attribute holding the node identifier in persisted graphs
pub const LABEL_ATTRIBUTE: &str = "label";

/// Node attributes as text rows, identifier first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AttributeTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write rows without header, in the layout of the intermediate node files
    pub fn write_tsv(&self, path: &Path) -> io::Result<usize> {
        let mut sink = TsvSink::create(path)?;
        for row in &self.rows {
            sink.write_row(row)?;
        }
        sink.finalize()
    }
}

/// One row per node carrying attributes.
///
/// The identifier comes from the `label` attribute when present, else from
/// the node key. Nodes without attributes are left out.
pub fn nodes_to_table(graph: &CitationGraph) -> AttributeTable {
    let mut columns = vec![PMID_COLUMN.to_string()];
    for pmid in graph.nodes() {
        for (key, _) in graph.attributes(pmid) {
            if key != LABEL_ATTRIBUTE && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows = Vec::new();
    for pmid in graph.nodes() {
        if graph.attributes(pmid).is_empty() {
            continue;
        }
        let id = graph
            .attribute(pmid, LABEL_ATTRIBUTE)
            .map_or_else(|| pmid.to_string(), str::to_string);

        let mut row = Vec::with_capacity(columns.len());
        row.push(id);
        for column in &columns[1..] {
            row.push(graph.attribute(pmid, column).unwrap_or_default().to_string());
        }
        rows.push(row);
    }

    AttributeTable { columns, rows }
}

/// One `(source, target)` row per edge, in edge order
pub fn links_to_table(graph: &CitationGraph) -> LinkTable {
    graph.edges().collect()
}

//! Article → node row + link rows
//!
//! Rows are written straight to the archive's two sinks; nothing is buffered
//! beyond the current article.

use std::path::Path;

use pubnet_core::{PipelineError, TsvSink};

use crate::extract::{self, extractor};
use crate::parser::PubmedArticle;
use crate::schema::{InformationSet, Pmid};

/// How much of a node row could be filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Complete,
    /// Identifier absent: the row holds a single empty column
    MissingIdentifier,
    /// Title selected but absent: remaining columns left empty, no links
    MissingTitle,
}

/// One node row and its outgoing citations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRow {
    pub pmid: Option<Pmid>,
    /// Selected informations in canonical order
    pub values: Vec<String>,
    pub references: Vec<String>,
    pub kind: RowKind,
}

impl NodeRow {
    /// Run the selected extractors for one article in canonical order
    pub fn from_article(
        article: &PubmedArticle,
        selection: InformationSet,
    ) -> Result<Self, PipelineError> {
        let Some(pmid) = extract::pmid(article) else {
            return Ok(Self {
                pmid: None,
                values: Vec::new(),
                references: Vec::new(),
                kind: RowKind::MissingIdentifier,
            });
        };

        let mut values = Vec::with_capacity(selection.len());
        for info in selection.iter() {
            match extractor(info)(article, pmid)? {
                Some(value) => values.push(value),
                None => {
                    log::debug!("Article {pmid}: no {info} element, remaining columns left empty");
                    values.resize(selection.len(), String::new());
                    return Ok(Self {
                        pmid: Some(pmid),
                        values,
                        references: Vec::new(),
                        kind: RowKind::MissingTitle,
                    });
                }
            }
        }

        Ok(Self {
            pmid: Some(pmid),
            values,
            references: extract::references(article),
            kind: RowKind::Complete,
        })
    }

    /// Fields of the node row as written: pmid, values, joined references
    pub fn fields(&self) -> Vec<String> {
        let Some(pmid) = self.pmid else {
            // Trailing empty field makes the writer emit "\t\n"
            return vec![String::new(), String::new()];
        };
        let mut fields = Vec::with_capacity(self.values.len() + 2);
        fields.push(pmid.to_string());
        fields.extend(self.values.iter().cloned());
        fields.push(self.references.join(", "));
        fields
    }
}

/// Rows written for one article
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleCounts {
    pub nodes: usize,
    pub links: usize,
    pub partial: bool,
}

/// Node and link sinks of one archive
#[derive(Debug)]
pub struct RecordWriter {
    nodes: TsvSink,
    links: TsvSink,
    selection: InformationSet,
}

impl RecordWriter {
    pub fn create(
        nodes_path: &Path,
        links_path: &Path,
        selection: InformationSet,
    ) -> std::io::Result<Self> {
        Ok(Self {
            nodes: TsvSink::create(nodes_path)?,
            links: TsvSink::create(links_path)?,
            selection,
        })
    }

    /// Extract one article and stream its rows
    pub fn write_article(&mut self, article: &PubmedArticle) -> Result<ArticleCounts, PipelineError> {
        let row = NodeRow::from_article(article, self.selection)?;
        self.nodes.write_row(row.fields())?;

        let mut counts = ArticleCounts {
            nodes: 1,
            links: 0,
            partial: row.kind != RowKind::Complete,
        };

        if let Some(pmid) = row.pmid {
            let source = pmid.to_string();
            for target in &row.references {
                self.links.write_row([source.as_str(), target.as_str()])?;
                counts.links += 1;
            }
        }

        Ok(counts)
    }

    /// Rename both files into place. Returns (node rows, link rows).
    ///
    /// Both files are flushed before either is renamed; if the links rename
    /// fails the renamed nodes file is removed again.
    pub fn finalize(mut self) -> std::io::Result<(usize, usize)> {
        self.nodes.flush()?;
        self.links.flush()?;

        let nodes_path = self.nodes.final_path().to_path_buf();
        let nodes = self.nodes.finalize()?;
        match self.links.finalize() {
            Ok(links) => Ok((nodes, links)),
            Err(e) => {
                if let Err(remove) = std::fs::remove_file(&nodes_path) {
                    log::warn!("Failed to remove {}: {remove}", nodes_path.display());
                }
                Err(e)
            }
        }
    }
}

//! Pubnet Graph - citation graph assembly
//!
//! Loads the node and link tables written by `pubnet-pubmed`, assembles a
//! directed citation graph with per-article attributes, and persists it as
//! GEXF.
//!
//! # Example
//!
//! ```ignore
//! use pubnet_graph::{GraphOptions, assemble, load_links, load_nodes, write_gexf};
//! use pubnet_pubmed::{InformationSet, Manifest};
//!
//! let manifest = Manifest::from_dir("data/csv".as_ref())?;
//! let links = load_links(&manifest)?.expect("links");
//! let nodes = load_nodes(&manifest, InformationSet::all())?.expect("nodes");
//! let graph = assemble(&links, &nodes, GraphOptions::default());
//! write_gexf(&graph, "data/graph/pubmed.gexf".as_ref())?;
//! ```

pub mod assemble;
pub mod convert;
pub mod gexf;
pub mod table;

// Re-exports
pub use assemble::{
    CitationGraph, GraphOptions, NodeAttributes, assemble, is_weakly_connected,
    largest_component, weakly_connected_components,
};
pub use convert::{AttributeTable, LABEL_ATTRIBUTE, links_to_table, nodes_to_table};
pub use gexf::{read_gexf, write_gexf};
pub use table::{LinkRecord, LinkTable, NodeRecord, NodeTable, load_links, load_nodes};

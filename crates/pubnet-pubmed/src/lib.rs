//! Pubnet PubMed - archive parser
//!
//! Turns gzip-compressed PubMed XML archives into per-archive node and link
//! tables (tab-separated, no header).
//!
//! # Features
//!
//! - Streaming XML parsing with quick-xml, one article in memory at a time
//! - Column selection via [`InformationSet`], always written in canonical order
//! - Optional MeSH topic filter
//! - Atomic outputs: a failed archive leaves no files behind
//!
//! # Example
//!
//! ```ignore
//! use pubnet_core::ProgressContext;
//! use pubnet_pubmed::{ParseConfig, run};
//!
//! let config = ParseConfig {
//!     input_dir: "data/pubmed".into(),
//!     output_dir: "data/csv".into(),
//!     ..Default::default()
//! };
//!
//! let (summary, manifest) = run(&config, &ProgressContext::hidden())?;
//! println!("Wrote {} node rows", summary.written);
//! ```

pub mod config;
pub mod extract;
pub mod manifest;
pub mod parser;
pub mod runner;
pub mod sanitize;
pub mod schema;
pub mod transform;
pub mod worker;

// Re-exports
pub use config::ParseConfig;
pub use manifest::{Manifest, ManifestEntry, TableKind};
pub use parser::{ArticleReader, PubmedArticle};
pub use runner::{Summary, run};
pub use sanitize::sanitize;
pub use schema::{Information, InformationSet, Pmid, UnknownInformation};
pub use transform::{NodeRow, RecordWriter};

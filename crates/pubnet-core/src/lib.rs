//! Pubnet Core - Common infrastructure for the citation network pipeline
//!
//! This crate provides the pieces shared by the parsing and graph stages:
//! logging, progress reporting, gzip archive reading, atomic output sinks
//! and the pipeline error taxonomy.

pub mod error;
pub mod logging;
pub mod progress;
pub mod sink;
pub mod stream;

// Re-exports for convenience
pub use error::PipelineError;
pub use logging::{SuspendingLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use sink::{AtomicFile, TsvSink, cleanup_tmp_files};
pub use stream::{ByteCounter, GzipReader, find_archives, open_gzip_file};

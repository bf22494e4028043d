//! Error taxonomy shared by the parsing and graph stages

use std::path::PathBuf;

/// Fatal error from parsing an archive or loading an intermediate table.
///
/// Non-fatal conditions (out-of-range identifiers, empty intermediate files,
/// links to unknown nodes) are logged and never surface as a `PipelineError`.
#[derive(Debug)]
pub enum PipelineError {
    /// Archive could not be decompressed or parsed as XML.
    MalformedInput { path: PathBuf, message: String },
    /// An element every article must carry is absent.
    MissingRequiredField { pmid: u64, field: &'static str },
    /// Intermediate table row cannot be interpreted.
    MalformedTable {
        path: PathBuf,
        line: u64,
        message: String,
    },
    Io(std::io::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput { path, message } => {
                write!(f, "malformed input {}: {message}", path.display())
            }
            Self::MissingRequiredField { pmid, field } => {
                write!(f, "article {pmid}: missing required field `{field}`")
            }
            Self::MalformedTable {
                path,
                line,
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            Self::Io(e) => write!(f, "IO: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl PipelineError {
    /// Wrap any displayable decode/XML error as `MalformedInput` for `path`.
    pub fn malformed_input(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::MalformedInput {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("source file {path:?} could not be opened: {source}")]
    SourceNotFound {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("unsupported source extension '{0}'")]
    UnsupportedExtension(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

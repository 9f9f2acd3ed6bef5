use thiserror::Error;

use pcd_colorizer::error::{ColorConfigError, ColorError};
use pcd_parser::error::ParseError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid color configuration: {0}")]
    ColorConfig(#[from] ColorConfigError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("line {line}: {source}")]
    Color { line: u64, source: ColorError },
    #[error("source reported {expected} points but {actual} records were decoded")]
    CountMismatch { expected: usize, actual: usize },
    #[error("failed to emit batch {batch_index}: {source}")]
    Emit {
        batch_index: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

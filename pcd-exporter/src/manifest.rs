use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub index: usize,
    pub file: String,
    pub count: usize,
}

/// Record of a finished run, written next to the batch files so a later run
/// over the same source can skip re-ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchManifest {
    pub source: String,
    pub num_points: usize,
    pub batch_capacity: usize,
    pub batches: Vec<BatchEntry>,
}

impl BatchManifest {
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(MANIFEST_FILE_NAME)
    }

    pub fn exists_in(dir: &Path) -> bool {
        Self::path_in(dir).is_file()
    }

    pub fn load(dir: &Path) -> Result<Self, ExportError> {
        let content = fs::read_to_string(Self::path_in(dir))?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, dir: &Path) -> Result<(), ExportError> {
        fs::write(Self::path_in(dir), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

use thiserror::Error;

/// Vertex ceiling of common per-draw rendering surfaces.
pub const DEFAULT_BATCH_CAPACITY: usize = 65000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("batch capacity must be at least 1")]
    ZeroBatchCapacity,
}

#[derive(Debug, Clone, Copy)]
pub struct IngestConfig {
    pub relocate_to_origin: bool,
    pub batch_capacity: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            relocate_to_origin: false,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
        }
    }
}

impl IngestConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_capacity == 0 {
            return Err(ConfigError::ZeroBatchCapacity);
        }
        Ok(())
    }
}

use thiserror::Error;

/// Rejected at construction, before any parsing starts.
#[derive(Debug, Error)]
pub enum ColorConfigError {
    #[error("degenerate height range: min_height == max_height ({0})")]
    DegenerateHeightRange(f64),
    #[error("degenerate intensity range: min_intensity == max_intensity ({0})")]
    DegenerateIntensityRange(f64),
}

#[derive(Debug, Error)]
pub enum ColorError {
    #[error("record has no intensity field")]
    MissingIntensityField,
}

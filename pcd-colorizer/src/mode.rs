/// How each point gets its display color. Every variant carries only the
/// parameters it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorMode {
    /// The configured flat color for every point.
    Default,
    /// Per-point RGB from the source record, falling back to the flat color.
    Rgb,
    /// Gradient over the vertical position within `[min_height, max_height]`.
    Height { min_height: f64, max_height: f64 },
    /// Gradient over the intensity field within `[min_intensity, max_intensity]`.
    Intensity {
        min_intensity: f64,
        max_intensity: f64,
    },
}

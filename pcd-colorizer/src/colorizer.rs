use pcd_core::gradient::Gradient;
use pcd_core::pointcloud::point::{Color, PointRecord};

use crate::error::{ColorConfigError, ColorError};
use crate::mode::ColorMode;

/// Per-record color assignment under a fixed, validated configuration.
pub struct Colorizer {
    mode: ColorMode,
    default_color: Color,
    gradient: Gradient,
    invert_yz: bool,
}

impl Colorizer {
    /// Validates the gradient ranges up front so a zero-width range can
    /// never turn into NaN colors mid-ingestion.
    pub fn new(
        mode: ColorMode,
        default_color: Color,
        gradient: Gradient,
        invert_yz: bool,
    ) -> Result<Self, ColorConfigError> {
        match mode {
            ColorMode::Height {
                min_height,
                max_height,
            } if max_height == min_height => {
                return Err(ColorConfigError::DegenerateHeightRange(min_height));
            }
            ColorMode::Intensity {
                min_intensity,
                max_intensity,
            } if max_intensity == min_intensity => {
                return Err(ColorConfigError::DegenerateIntensityRange(min_intensity));
            }
            _ => {}
        }

        Ok(Colorizer {
            mode,
            default_color,
            gradient,
            invert_yz,
        })
    }

    pub fn colorize(&self, record: &PointRecord) -> Result<Color, ColorError> {
        match self.mode {
            ColorMode::Default => Ok(self.default_color),
            ColorMode::Rgb => Ok(record
                .rgb
                .map(|[r, g, b]| Color::from_rgb8(r, g, b))
                .unwrap_or(self.default_color)),
            ColorMode::Height {
                min_height,
                max_height,
            } => {
                // The vertical component of the transformed position: the
                // Y/Z inversion moves the sampled axis to z.
                let height = if self.invert_yz {
                    record.position[2]
                } else {
                    record.position[1]
                };
                let t = (height - min_height) / (max_height - min_height);
                Ok(self.gradient.evaluate(t as f32))
            }
            ColorMode::Intensity {
                min_intensity,
                max_intensity,
            } => {
                let intensity = record
                    .intensity
                    .ok_or(ColorError::MissingIntensityField)?;
                let t = (intensity - min_intensity) / (max_intensity - min_intensity);
                Ok(self.gradient.evaluate(t as f32))
            }
        }
    }
}

use thiserror::Error;

use crate::pointcloud::point::Color;

#[derive(Debug, Error)]
pub enum GradientError {
    #[error("a gradient needs at least two stops, got {0}")]
    NotEnoughStops(usize),
    #[error("gradient stops must be in ascending position order")]
    UnsortedStops,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub position: f32,
    pub color: Color,
}

/// Multi-stop color ramp evaluated over a normalized [0, 1] input.
#[derive(Debug, Clone)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn new(stops: Vec<GradientStop>) -> Result<Self, GradientError> {
        if stops.len() < 2 {
            return Err(GradientError::NotEnoughStops(stops.len()));
        }
        if stops.windows(2).any(|pair| pair[1].position <= pair[0].position) {
            return Err(GradientError::UnsortedStops);
        }
        Ok(Gradient { stops })
    }

    /// Terrain ramp: blue-gray, green, yellow-green, brown, white.
    pub fn terrain() -> Self {
        let stops = vec![
            GradientStop {
                position: 0.0,
                color: Color::new(0.2, 0.4, 0.6),
            },
            GradientStop {
                position: 0.25,
                color: Color::new(0.3, 0.5, 0.2),
            },
            GradientStop {
                position: 0.5,
                color: Color::new(0.6, 0.6, 0.3),
            },
            GradientStop {
                position: 0.75,
                color: Color::new(0.5, 0.4, 0.3),
            },
            GradientStop {
                position: 1.0,
                color: Color::new(0.9, 0.9, 0.9),
            },
        ];
        Gradient { stops }
    }

    /// Interpolated color at `t`. Inputs are clamped to [0, 1] and to the
    /// outermost stops, matching how rendering-engine gradient ramps behave.
    pub fn evaluate(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);

        let first = &self.stops[0];
        if t <= first.position {
            return first.color;
        }
        let last = &self.stops[self.stops.len() - 1];
        if t >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if t <= upper.position {
                let span = upper.position - lower.position;
                let fraction = (t - lower.position) / span;
                return lerp(lower.color, upper.color, fraction);
            }
        }

        last.color
    }
}

fn lerp(from: Color, to: Color, fraction: f32) -> Color {
    Color::new(
        from.r + (to.r - from.r) * fraction,
        from.g + (to.g - from.g) * fraction,
        from.b + (to.b - from.b) * fraction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> Gradient {
        Gradient::new(vec![
            GradientStop {
                position: 0.0,
                color: Color::new(0.0, 0.0, 0.0),
            },
            GradientStop {
                position: 1.0,
                color: Color::new(1.0, 1.0, 1.0),
            },
        ])
        .unwrap()
    }

    #[test]
    fn evaluates_endpoints_exactly() {
        let gradient = two_stop();
        assert_eq!(gradient.evaluate(0.0), Color::new(0.0, 0.0, 0.0));
        assert_eq!(gradient.evaluate(1.0), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn interpolates_between_stops() {
        let gradient = two_stop();
        assert_eq!(gradient.evaluate(0.5), Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn clamps_out_of_range_inputs() {
        let gradient = two_stop();
        assert_eq!(gradient.evaluate(-2.0), gradient.evaluate(0.0));
        assert_eq!(gradient.evaluate(3.0), gradient.evaluate(1.0));
    }

    #[test]
    fn terrain_ramp_spans_blue_gray_to_white() {
        let gradient = Gradient::terrain();
        assert_eq!(gradient.evaluate(0.0), Color::new(0.2, 0.4, 0.6));
        assert_eq!(gradient.evaluate(1.0), Color::new(0.9, 0.9, 0.9));
    }

    #[test]
    fn rejects_single_stop() {
        let result = Gradient::new(vec![GradientStop {
            position: 0.0,
            color: Color::default(),
        }]);
        assert!(matches!(result, Err(GradientError::NotEnoughStops(1))));
    }

    #[test]
    fn rejects_unsorted_stops() {
        let result = Gradient::new(vec![
            GradientStop {
                position: 0.5,
                color: Color::default(),
            },
            GradientStop {
                position: 0.2,
                color: Color::default(),
            },
        ]);
        assert!(matches!(result, Err(GradientError::UnsortedStops)));
    }
}

/// Normalized RGB color, each channel in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        [
            (self.r * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.g * 255.0).round().clamp(0.0, 255.0) as u8,
            (self.b * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }
}

/// One decoded line of source data. The position already has the uniform
/// scale and the Y/Z inversion applied; `rgb` and `intensity` are present
/// only when the line carried those fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub position: [f64; 3],
    pub rgb: Option<[u8; 3]>,
    pub intensity: Option<f64>,
}

/// Index-aligned position and color buffers for the whole dataset.
///
/// `positions[i]` and `colors[i]` always describe the same point, in source
/// file order. Pushing is the only way to grow the buffers, which keeps the
/// two lengths equal.
#[derive(Debug, Default)]
pub struct Dataset {
    positions: Vec<[f64; 3]>,
    colors: Vec<Color>,
}

impl Dataset {
    pub fn with_capacity(num_points: usize) -> Self {
        Dataset {
            positions: Vec::with_capacity(num_points),
            colors: Vec::with_capacity(num_points),
        }
    }

    pub fn push(&mut self, position: [f64; 3], color: Color) {
        self.positions.push(position);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// A contiguous slice of the dataset, emitted to the geometry consumer.
/// Positions have the relocation offset already subtracted.
#[derive(Debug, Clone)]
pub struct PointBatch {
    pub index: usize,
    pub positions: Vec<[f64; 3]>,
    pub colors: Vec<Color>,
}

/// Running component-wise minimum over all positions seen so far.
///
/// The first update stores the position verbatim; a zero-magnitude first
/// point is therefore handled correctly.
#[derive(Debug, Default)]
pub struct MinCorner {
    min: [f64; 3],
    seen: bool,
}

impl MinCorner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, position: [f64; 3]) {
        if !self.seen {
            self.min = position;
            self.seen = true;
            return;
        }
        for (stored, incoming) in self.min.iter_mut().zip(position) {
            if incoming < *stored {
                *stored = incoming;
            }
        }
    }

    /// The minimum corner, or `None` before the first update.
    pub fn current(&self) -> Option<[f64; 3]> {
        self.seen.then_some(self.min)
    }
}

use std::ops::Range;

/// A contiguous index range `[start, start + count)` over the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub start: usize,
    pub count: usize,
}

impl Batch {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.count
    }
}

/// Splits `num_points` into ordered batches of at most `capacity` points.
///
/// All batches except the last hold exactly `capacity` points; the last holds
/// the remainder. Zero points yields an empty plan rather than a zero-length
/// batch. `capacity` must be at least 1.
pub fn plan_batches(num_points: usize, capacity: usize) -> Vec<Batch> {
    assert!(capacity > 0, "batch capacity must be at least 1");

    let num_batches = num_points.div_ceil(capacity);
    (0..num_batches)
        .map(|index| {
            let start = index * capacity;
            Batch {
                start,
                count: capacity.min(num_points - start),
            }
        })
        .collect()
}

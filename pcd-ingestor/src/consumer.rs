use std::error::Error;

use pcd_core::pointcloud::point::PointBatch;

/// Receives finished batches in ascending index order.
///
/// Ownership of each batch transfers to the consumer; the ingestor never
/// touches emitted data again.
pub trait GeometryConsumer {
    fn consume(&mut self, batch: PointBatch) -> Result<(), Box<dyn Error + Send + Sync>>;
}

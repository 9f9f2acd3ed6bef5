use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use pcd_core::pointcloud::point::PointBatch;
use pcd_ingestor::consumer::GeometryConsumer;

use crate::error::ExportError;
use crate::gltf::generate_glb;
use crate::manifest::{BatchEntry, BatchManifest};

/// Writes each emitted batch as `<source>_<index>.glb` and records it for
/// the run manifest.
pub struct GlbBatchWriter {
    dir: PathBuf,
    source_name: String,
    entries: Vec<BatchEntry>,
}

impl GlbBatchWriter {
    pub fn new(dir: &Path, source_name: &str) -> Result<Self, ExportError> {
        fs::create_dir_all(dir)?;
        Ok(GlbBatchWriter {
            dir: dir.to_path_buf(),
            source_name: source_name.to_string(),
            entries: Vec::new(),
        })
    }

    /// Finalizes the run by writing `manifest.json` next to the batch files.
    pub fn finish(
        self,
        num_points: usize,
        batch_capacity: usize,
    ) -> Result<BatchManifest, ExportError> {
        let manifest = BatchManifest {
            source: self.source_name,
            num_points,
            batch_capacity,
            batches: self.entries,
        };
        manifest.save(&self.dir)?;
        Ok(manifest)
    }
}

impl GeometryConsumer for GlbBatchWriter {
    fn consume(
        &mut self,
        batch: PointBatch,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let file_name = format!("{}_{}.glb", self.source_name, batch.index);
        let glb = generate_glb(&batch)?;

        let file = File::create(self.dir.join(&file_name))?;
        glb.to_writer(BufWriter::new(file))?;

        self.entries.push(BatchEntry {
            index: batch.index,
            file: file_name,
            count: batch.positions.len(),
        });
        Ok(())
    }
}

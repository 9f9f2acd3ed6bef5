/// Observational callbacks fired during the point and batch loops. They feed
/// nothing back into ingestion.
pub trait ProgressReporter {
    fn on_points(&mut self, processed: usize, total: usize) {
        let _ = (processed, total);
    }

    fn on_batches(&mut self, emitted: usize, total: usize) {
        let _ = (emitted, total);
    }
}

/// Reports progress through the `log` crate.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn on_points(&mut self, processed: usize, total: usize) {
        log::info!("{} out of {} points loaded", processed, total);
    }

    fn on_batches(&mut self, emitted: usize, total: usize) {
        log::info!("{} out of {} batches emitted", emitted, total);
    }
}

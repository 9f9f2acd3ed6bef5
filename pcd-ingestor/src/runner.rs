use pcd_colorizer::Colorizer;
use pcd_core::pointcloud::batching::planner::{plan_batches, Batch};
use pcd_core::pointcloud::point::{Dataset, MinCorner, PointBatch};
use pcd_parser::parsers::Parser;

use crate::config::IngestConfig;
use crate::consumer::GeometryConsumer;
use crate::error::IngestError;
use crate::progress::ProgressReporter;

/// Outcome of a completed ingestion run.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSummary {
    pub num_points: usize,
    pub num_batches: usize,
    /// The minimum corner subtracted from every emitted position; the zero
    /// vector when relocation is disabled.
    pub offset: [f64; 3],
}

pub struct PointCloudIngestor {
    parser: Box<dyn Parser>,
    colorizer: Colorizer,
    config: IngestConfig,
}

impl PointCloudIngestor {
    pub fn new(
        parser: Box<dyn Parser>,
        colorizer: Colorizer,
        config: IngestConfig,
    ) -> Result<Self, IngestError> {
        config.validate()?;
        Ok(PointCloudIngestor {
            parser,
            colorizer,
            config,
        })
    }

    /// Runs the full pipeline: fix the point count, stream-decode and color
    /// every record, then emit capacity-bounded batches in ascending order.
    ///
    /// Relocation needs the complete pass before the offset is known, so
    /// nothing reaches the consumer until the whole source has been read; a
    /// fatal error therefore never leaves a partial batch set behind.
    pub fn run(
        &self,
        consumer: &mut dyn GeometryConsumer,
        progress: &mut dyn ProgressReporter,
    ) -> Result<IngestSummary, IngestError> {
        let num_points = self.parser.count_points()?;

        let mut dataset = Dataset::with_capacity(num_points);
        let mut min_corner = MinCorner::new();
        let report_interval = (num_points / 20).max(1);

        for (index, result) in self.parser.records()?.enumerate() {
            let record = result?;
            let color = self
                .colorizer
                .colorize(&record)
                .map_err(|source| IngestError::Color {
                    line: index as u64 + 1,
                    source,
                })?;

            if self.config.relocate_to_origin {
                min_corner.update(record.position);
            }
            dataset.push(record.position, color);

            if index % report_interval == 0 {
                progress.on_points(index, num_points);
            }
        }

        if dataset.len() != num_points {
            return Err(IngestError::CountMismatch {
                expected: num_points,
                actual: dataset.len(),
            });
        }
        progress.on_points(num_points, num_points);

        let offset = if self.config.relocate_to_origin {
            min_corner.current().unwrap_or([0.0; 3])
        } else {
            [0.0; 3]
        };

        let batches = plan_batches(num_points, self.config.batch_capacity);
        let num_batches = batches.len();

        for (batch_index, batch) in batches.iter().enumerate() {
            consumer
                .consume(slice_batch(&dataset, batch_index, batch, offset))
                .map_err(|source| IngestError::Emit {
                    batch_index,
                    source,
                })?;

            if batch_index % 10 == 0 {
                progress.on_batches(batch_index, num_batches);
            }
        }
        progress.on_batches(num_batches, num_batches);

        Ok(IngestSummary {
            num_points,
            num_batches,
            offset,
        })
    }
}

fn slice_batch(dataset: &Dataset, index: usize, batch: &Batch, offset: [f64; 3]) -> PointBatch {
    let range = batch.range();
    let positions = dataset.positions()[range.clone()]
        .iter()
        .map(|position| {
            [
                position[0] - offset[0],
                position[1] - offset[1],
                position[2] - offset[2],
            ]
        })
        .collect();
    let colors = dataset.colors()[range].to_vec();

    PointBatch {
        index,
        positions,
        colors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::LogProgress;
    use pcd_colorizer::ColorMode;
    use pcd_core::gradient::Gradient;
    use pcd_core::pointcloud::point::{Color, PointRecord};
    use pcd_parser::error::ParseError;
    use pcd_parser::parsers::RecordStream;

    struct StubParser {
        records: Vec<PointRecord>,
        reported_count: Option<usize>,
        fail_at: Option<usize>,
    }

    impl StubParser {
        fn new(records: Vec<PointRecord>) -> Self {
            StubParser {
                records,
                reported_count: None,
                fail_at: None,
            }
        }
    }

    impl Parser for StubParser {
        fn count_points(&self) -> Result<usize, ParseError> {
            Ok(self.reported_count.unwrap_or(self.records.len()))
        }

        fn records(&self) -> Result<RecordStream, ParseError> {
            let fail_at = self.fail_at;
            Ok(Box::new(self.records.clone().into_iter().enumerate().map(
                move |(index, record)| {
                    if Some(index) == fail_at {
                        Err(ParseError::MalformedRecord {
                            line: index as u64 + 1,
                            reason: "injected failure".to_string(),
                        })
                    } else {
                        Ok(record)
                    }
                },
            )))
        }
    }

    #[derive(Default)]
    struct CollectingConsumer {
        batches: Vec<PointBatch>,
    }

    impl GeometryConsumer for CollectingConsumer {
        fn consume(
            &mut self,
            batch: PointBatch,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.batches.push(batch);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        points: Vec<(usize, usize)>,
        batches: Vec<(usize, usize)>,
    }

    impl ProgressReporter for RecordingProgress {
        fn on_points(&mut self, processed: usize, total: usize) {
            self.points.push((processed, total));
        }

        fn on_batches(&mut self, emitted: usize, total: usize) {
            self.batches.push((emitted, total));
        }
    }

    fn rgb_colorizer() -> Colorizer {
        Colorizer::new(
            ColorMode::Rgb,
            Color::new(1.0, 1.0, 1.0),
            Gradient::terrain(),
            false,
        )
        .unwrap()
    }

    fn record(position: [f64; 3], rgb: Option<[u8; 3]>) -> PointRecord {
        PointRecord {
            position,
            rgb,
            intensity: None,
        }
    }

    fn ingestor(parser: StubParser, config: IngestConfig) -> PointCloudIngestor {
        PointCloudIngestor::new(Box::new(parser), rgb_colorizer(), config).unwrap()
    }

    #[test]
    fn splits_points_into_capacity_bounded_batches() {
        let records = vec![
            record([0.0, 0.0, 0.0], Some([10, 0, 0])),
            record([1.0, 0.0, 0.0], Some([20, 0, 0])),
            record([2.0, 0.0, 0.0], Some([30, 0, 0])),
            record([3.0, 0.0, 0.0], Some([40, 0, 0])),
            record([4.0, 0.0, 0.0], Some([50, 0, 0])),
        ];
        let ingestor = ingestor(
            StubParser::new(records),
            IngestConfig {
                relocate_to_origin: false,
                batch_capacity: 2,
            },
        );

        let mut consumer = CollectingConsumer::default();
        let summary = ingestor.run(&mut consumer, &mut LogProgress).unwrap();

        assert_eq!(summary.num_points, 5);
        assert_eq!(summary.num_batches, 3);

        let counts: Vec<usize> = consumer.batches.iter().map(|b| b.positions.len()).collect();
        assert_eq!(counts, vec![2, 2, 1]);

        // Ordinal order survives batching, and colors stay index-aligned.
        assert_eq!(consumer.batches[1].positions[0], [2.0, 0.0, 0.0]);
        assert_eq!(consumer.batches[1].colors[0], Color::from_rgb8(30, 0, 0));
        assert_eq!(consumer.batches[2].index, 2);
        assert_eq!(consumer.batches[2].positions[0], [4.0, 0.0, 0.0]);
    }

    #[test]
    fn relocation_moves_the_minimum_corner_to_the_origin() {
        let records = vec![
            record([5.0, 6.0, 7.0], None),
            record([2.0, 9.0, 4.0], None),
            record([3.0, 1.0, 8.0], None),
        ];
        let ingestor = ingestor(
            StubParser::new(records),
            IngestConfig {
                relocate_to_origin: true,
                batch_capacity: 65000,
            },
        );

        let mut consumer = CollectingConsumer::default();
        let summary = ingestor.run(&mut consumer, &mut LogProgress).unwrap();

        assert_eq!(summary.offset, [2.0, 1.0, 4.0]);

        let mut emitted_min = [f64::MAX; 3];
        for batch in &consumer.batches {
            for position in &batch.positions {
                for axis in 0..3 {
                    emitted_min[axis] = emitted_min[axis].min(position[axis]);
                }
            }
        }
        for axis in 0..3 {
            assert!(emitted_min[axis].abs() < 1e-12);
        }
    }

    #[test]
    fn positions_are_untouched_without_relocation() {
        let records = vec![record([5.0, 6.0, 7.0], None)];
        let ingestor = ingestor(StubParser::new(records), IngestConfig::default());

        let mut consumer = CollectingConsumer::default();
        let summary = ingestor.run(&mut consumer, &mut LogProgress).unwrap();

        assert_eq!(summary.offset, [0.0; 3]);
        assert_eq!(consumer.batches[0].positions[0], [5.0, 6.0, 7.0]);
    }

    #[test]
    fn empty_source_emits_no_batches() {
        let ingestor = ingestor(StubParser::new(vec![]), IngestConfig::default());

        let mut consumer = CollectingConsumer::default();
        let summary = ingestor.run(&mut consumer, &mut LogProgress).unwrap();

        assert_eq!(summary.num_points, 0);
        assert_eq!(summary.num_batches, 0);
        assert!(consumer.batches.is_empty());
    }

    #[test]
    fn malformed_record_aborts_before_any_emission() {
        let mut parser = StubParser::new(vec![
            record([0.0, 0.0, 0.0], None),
            record([1.0, 1.0, 1.0], None),
            record([2.0, 2.0, 2.0], None),
        ]);
        parser.fail_at = Some(1);

        let ingestor = ingestor(
            parser,
            IngestConfig {
                relocate_to_origin: false,
                batch_capacity: 1,
            },
        );

        let mut consumer = CollectingConsumer::default();
        let result = ingestor.run(&mut consumer, &mut LogProgress);

        assert!(matches!(
            result,
            Err(IngestError::Parse(ParseError::MalformedRecord { line: 2, .. }))
        ));
        assert!(consumer.batches.is_empty());
    }

    #[test]
    fn count_mismatch_is_detected() {
        let mut parser = StubParser::new(vec![record([0.0, 0.0, 0.0], None)]);
        parser.reported_count = Some(3);

        let ingestor = ingestor(parser, IngestConfig::default());

        let mut consumer = CollectingConsumer::default();
        let result = ingestor.run(&mut consumer, &mut LogProgress);

        assert!(matches!(
            result,
            Err(IngestError::CountMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }

    #[test]
    fn missing_intensity_reports_the_line() {
        let colorizer = Colorizer::new(
            ColorMode::Intensity {
                min_intensity: 0.0,
                max_intensity: 1.0,
            },
            Color::default(),
            Gradient::terrain(),
            false,
        )
        .unwrap();
        let parser = StubParser::new(vec![record([0.0, 0.0, 0.0], None)]);
        let ingestor =
            PointCloudIngestor::new(Box::new(parser), colorizer, IngestConfig::default()).unwrap();

        let mut consumer = CollectingConsumer::default();
        let result = ingestor.run(&mut consumer, &mut LogProgress);

        assert!(matches!(result, Err(IngestError::Color { line: 1, .. })));
    }

    #[test]
    fn zero_batch_capacity_is_rejected() {
        let result = PointCloudIngestor::new(
            Box::new(StubParser::new(vec![])),
            rgb_colorizer(),
            IngestConfig {
                relocate_to_origin: false,
                batch_capacity: 0,
            },
        );

        assert!(matches!(result, Err(IngestError::Config(_))));
    }

    #[test]
    fn progress_ends_on_totals() {
        let records = (0..25)
            .map(|i| record([i as f64, 0.0, 0.0], None))
            .collect();
        let ingestor = ingestor(
            StubParser::new(records),
            IngestConfig {
                relocate_to_origin: false,
                batch_capacity: 10,
            },
        );

        let mut consumer = CollectingConsumer::default();
        let mut progress = RecordingProgress::default();
        ingestor.run(&mut consumer, &mut progress).unwrap();

        assert_eq!(progress.points.last(), Some(&(25, 25)));
        assert_eq!(progress.batches.last(), Some(&(3, 3)));
    }
}

use std::path::PathBuf;

use pcd_colorizer::{ColorMode, Colorizer};
use pcd_core::gradient::Gradient;
use pcd_core::pointcloud::point::Color;
use pcd_exporter::writer::GlbBatchWriter;
use pcd_ingestor::{IngestConfig, LogProgress, PointCloudIngestor};
use pcd_parser::parsers::{
    xyz::{ParseOptions, XyzParserProvider},
    ParserProvider as _,
};

fn main() {
    let provider = XyzParserProvider {
        filename: PathBuf::from("pcd-parser/examples/data/sample.xyz"),
        options: ParseOptions::default(),
    };
    let parser = provider.get_parser();

    let colorizer = Colorizer::new(
        ColorMode::Rgb,
        Color::new(1.0, 1.0, 1.0),
        Gradient::terrain(),
        false,
    )
    .unwrap();

    let ingestor = PointCloudIngestor::new(
        parser,
        colorizer,
        IngestConfig {
            relocate_to_origin: true,
            batch_capacity: 2,
        },
    )
    .unwrap();

    let output_path = PathBuf::from("output/sample");
    let mut writer = GlbBatchWriter::new(&output_path, "sample").unwrap();

    let summary = ingestor.run(&mut writer, &mut LogProgress).unwrap();
    println!(
        "Number of points: {num_points}",
        num_points = summary.num_points
    );
    println!("Number of batches: {}", summary.num_batches);

    let manifest = writer.finish(summary.num_points, 2).unwrap();
    for entry in &manifest.batches {
        println!("write GLB: {:?}", output_path.join(&entry.file));
    }
}

use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;

use pcd_colorizer::{ColorMode, Colorizer};
use pcd_core::gradient::Gradient;
use pcd_core::pointcloud::point::Color;
use pcd_exporter::manifest::BatchManifest;
use pcd_exporter::writer::GlbBatchWriter;
use pcd_ingestor::{IngestConfig, LogProgress, PointCloudIngestor};
use pcd_parser::parsers::{
    get_extension,
    xyz::{ParseOptions, XyzParserProvider},
    Extension, ParserProvider as _,
};

#[derive(Parser, Debug)]
#[command(
    name = "Point Batcher",
    about = "A tool for converting point cloud data into renderable point batches",
    version = "0.0.1"
)]
struct Cli {
    #[arg(short, long, required = true, value_name = "FILE")]
    input: String,

    #[arg(short, long, required = true, value_name = "DIR")]
    output: String,

    /// Uniform multiplier applied to all position components.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Swap the Y and Z fields of every record.
    #[arg(long)]
    invert_yz: bool,

    /// Move the dataset's minimum corner to the origin.
    #[arg(long)]
    relocate_to_origin: bool,

    #[arg(long, value_enum, default_value = "rgb")]
    color_by: ColorBy,

    /// Flat color used by 'default' mode and as the RGB fallback.
    #[arg(long, default_value = "255,255,255", value_name = "R,G,B")]
    default_color: String,

    #[arg(long, default_value_t = 0.0)]
    min_height: f64,

    #[arg(long, default_value_t = 0.0)]
    max_height: f64,

    #[arg(long, default_value_t = 0.0)]
    min_intensity: f64,

    #[arg(long, default_value_t = 0.0)]
    max_intensity: f64,

    #[arg(long, default_value_t = 65000)]
    batch_capacity: usize,

    /// Re-ingest even when finished batches already exist for the source.
    #[arg(long)]
    force_reload: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorBy {
    Default,
    Rgb,
    Height,
    Intensity,
}

fn parse_default_color(value: &str) -> Result<Color, String> {
    let channels: Vec<&str> = value.split(',').collect();
    if channels.len() != 3 {
        return Err(format!("expected 'R,G,B' bytes, got '{}'", value));
    }

    let mut rgb = [0u8; 3];
    for (slot, channel) in rgb.iter_mut().zip(&channels) {
        *slot = channel
            .trim()
            .parse()
            .map_err(|_| format!("invalid color channel '{}'", channel))?;
    }

    Ok(Color::from_rgb8(rgb[0], rgb[1], rgb[2]))
}

fn color_mode(args: &Cli) -> ColorMode {
    match args.color_by {
        ColorBy::Default => ColorMode::Default,
        ColorBy::Rgb => ColorMode::Rgb,
        ColorBy::Height => ColorMode::Height {
            min_height: args.min_height,
            max_height: args.max_height,
        },
        ColorBy::Intensity => ColorMode::Intensity {
            min_intensity: args.min_intensity,
            max_intensity: args.max_intensity,
        },
    }
}

fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    log::info!("input file: {}", args.input);
    log::info!("output folder: {}", args.output);
    log::info!("color mode: {:?}", args.color_by);
    log::info!("batch capacity: {}", args.batch_capacity);

    let start = std::time::Instant::now();

    let input_path = PathBuf::from(&args.input);
    let extension = input_path
        .extension()
        .and_then(OsStr::to_str)
        .ok_or("File extension is not found")?;
    let provider = match get_extension(extension)? {
        Extension::Xyz | Extension::Txt | Extension::Csv => XyzParserProvider {
            filename: input_path.clone(),
            options: ParseOptions {
                scale: args.scale,
                invert_yz: args.invert_yz,
            },
        },
    };

    let source_name = input_path
        .file_stem()
        .and_then(OsStr::to_str)
        .ok_or("File name is not found")?
        .to_string();
    let output_dir = Path::new(&args.output).join(&source_name);

    if BatchManifest::exists_in(&output_dir) {
        if args.force_reload {
            log::info!("force reload: removing {:?}", output_dir);
            fs::remove_dir_all(&output_dir)?;
        } else {
            let manifest = BatchManifest::load(&output_dir)?;
            log::info!(
                "Using previously generated batches: {} ({} batches, {} points)",
                manifest.source,
                manifest.batches.len(),
                manifest.num_points
            );
            return Ok(());
        }
    }

    let default_color = parse_default_color(&args.default_color)?;
    let colorizer = Colorizer::new(
        color_mode(&args),
        default_color,
        Gradient::terrain(),
        args.invert_yz,
    )?;

    let ingestor = PointCloudIngestor::new(
        provider.get_parser(),
        colorizer,
        IngestConfig {
            relocate_to_origin: args.relocate_to_origin,
            batch_capacity: args.batch_capacity,
        },
    )?;

    log::info!("start ingesting...");
    let start_local = std::time::Instant::now();

    let mut writer = GlbBatchWriter::new(&output_dir, &source_name)?;
    let summary = ingestor.run(&mut writer, &mut LogProgress)?;

    log::info!("finish ingesting in {:?}", start_local.elapsed());
    log::info!(
        "{} points in {} batches (offset {:?})",
        summary.num_points,
        summary.num_batches,
        summary.offset
    );

    let manifest = writer.finish(summary.num_points, args.batch_capacity)?;
    log::info!(
        "write manifest: {:?}",
        BatchManifest::path_in(&output_dir)
    );
    for entry in &manifest.batches {
        log::debug!("batch {}: {} ({} points)", entry.index, entry.file, entry.count);
    }

    log::info!("Elapsed: {:?}", start.elapsed());
    log::info!("Finish processing");

    Ok(())
}

fn main() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, LevelFilter::Info)
        .init();

    let args = Cli::parse();

    if let Err(e) = run(args) {
        log::error!("Failed to process point cloud: {}", e);
        std::process::exit(1);
    }
}

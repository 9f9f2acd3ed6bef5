use std::fs::File;
use std::path::PathBuf;

use csv::ReaderBuilder;

use pcd_core::pointcloud::point::PointRecord;

use super::{Parser, ParserProvider, RecordStream};
use crate::error::ParseError;

/// Coordinate adjustments applied while decoding each line.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Uniform multiplier for all three position components.
    pub scale: f64,
    /// Swap the second and third fields (x=f0, y=f2, z=f1).
    pub invert_yz: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            scale: 1.0,
            invert_yz: false,
        }
    }
}

pub struct XyzParserProvider {
    pub filename: PathBuf,
    pub options: ParseOptions,
}

impl ParserProvider for XyzParserProvider {
    fn get_parser(&self) -> Box<dyn Parser> {
        Box::new(XyzParser {
            filename: self.filename.clone(),
            options: self.options,
        })
    }
}

pub struct XyzParser {
    pub filename: PathBuf,
    pub options: ParseOptions,
}

impl XyzParser {
    fn open(&self) -> Result<csv::Reader<File>, ParseError> {
        let file = File::open(&self.filename).map_err(|source| ParseError::SourceNotFound {
            path: self.filename.clone(),
            source,
        })?;
        Ok(ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file))
    }
}

impl Parser for XyzParser {
    fn count_points(&self) -> Result<usize, ParseError> {
        let mut reader = self.open()?;
        let mut record = csv::StringRecord::new();
        let mut count = 0;
        while reader.read_record(&mut record).map_err(map_csv_error)? {
            count += 1;
        }
        Ok(count)
    }

    fn records(&self) -> Result<RecordStream, ParseError> {
        let reader = self.open()?;
        let options = self.options;
        Ok(Box::new(reader.into_records().map(move |result| {
            let record = result.map_err(map_csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            parse_record(&record, line, &options)
        })))
    }
}

fn map_csv_error(error: csv::Error) -> ParseError {
    let line = error.position().map(|p| p.line()).unwrap_or(0);
    let reason = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(source) => ParseError::Io(source),
        _ => ParseError::MalformedRecord { line, reason },
    }
}

/// Decodes one comma-delimited record into a `PointRecord`.
///
/// Fields 0..3 are the position (scale and Y/Z inversion applied here).
/// Records with at least 6 fields carry RGB in fields 3..6; a 7th field is
/// the intensity scalar. Shorter records leave those absent.
pub fn parse_record(
    record: &csv::StringRecord,
    line: u64,
    options: &ParseOptions,
) -> Result<PointRecord, ParseError> {
    let f0 = required_field(record, 0, "x", line)?;
    let f1 = required_field(record, 1, "y", line)?;
    let f2 = required_field(record, 2, "z", line)?;

    let (y, z) = if options.invert_yz { (f2, f1) } else { (f1, f2) };
    let position = [f0 * options.scale, y * options.scale, z * options.scale];

    let rgb = if record.len() >= 6 {
        Some([
            parse_channel(record, 3, "r", line)?,
            parse_channel(record, 4, "g", line)?,
            parse_channel(record, 5, "b", line)?,
        ])
    } else {
        None
    };

    let intensity = match record.get(6).map(str::trim) {
        Some(value) if !value.is_empty() => {
            Some(value.parse::<f64>().map_err(|_| malformed_value("intensity", value, line))?)
        }
        _ => None,
    };

    Ok(PointRecord {
        position,
        rgb,
        intensity,
    })
}

fn required_field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<f64, ParseError> {
    let value = record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ParseError::MalformedRecord {
            line,
            reason: format!("missing '{}' field", name),
        })?;
    value
        .parse()
        .map_err(|_| malformed_value(name, value, line))
}

fn parse_channel(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    line: u64,
) -> Result<u8, ParseError> {
    let value = record.get(index).unwrap_or("").trim();
    value
        .parse()
        .map_err(|_| malformed_value(name, value, line))
}

fn malformed_value(name: &str, value: &str, line: u64) -> ParseError {
    ParseError::MalformedRecord {
        line,
        reason: format!("failed to parse '{}' value '{}'", name, value),
    }
}

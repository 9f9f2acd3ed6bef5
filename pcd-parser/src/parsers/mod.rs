use pcd_core::pointcloud::point::PointRecord;

use crate::error::ParseError;

pub mod xyz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extension {
    Xyz,
    Txt,
    Csv,
}

pub fn get_extension(extension: &str) -> Result<Extension, ParseError> {
    match extension.to_ascii_lowercase().as_str() {
        "xyz" => Ok(Extension::Xyz),
        "txt" => Ok(Extension::Txt),
        "csv" => Ok(Extension::Csv),
        other => Err(ParseError::UnsupportedExtension(other.to_string())),
    }
}

pub type RecordStream = Box<dyn Iterator<Item = Result<PointRecord, ParseError>>>;

pub trait ParserProvider {
    fn get_parser(&self) -> Box<dyn Parser>;
}

pub trait Parser {
    /// Total record count of the source, determined in a pre-pass.
    fn count_points(&self) -> Result<usize, ParseError>;

    /// Streaming decode of the source in line order.
    fn records(&self) -> Result<RecordStream, ParseError>;
}

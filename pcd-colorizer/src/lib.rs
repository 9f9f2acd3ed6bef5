pub mod colorizer;
pub mod error;
pub mod mode;

pub use colorizer::Colorizer;
pub use error::{ColorConfigError, ColorError};
pub use mode::ColorMode;

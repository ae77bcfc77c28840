//! Error types for the pptxhtml library.

use std::io;
use thiserror::Error;

/// Result type alias for pptxhtml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Package-level and part-level failures.
///
/// Shape renderers never return these to the caller of a slide conversion;
/// a failing shape becomes fallback markup and the slide carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a file or writing a fixed chart part failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input is not a ZIP package.
    #[error("Unknown file format")]
    UnknownFormat,

    /// OOXML package of another kind (Word, Excel, ...).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Malformed values inside an otherwise readable part.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A part or required element is absent.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Chart part whose plot type has no renderer.
    #[error("Unsupported chart: {0}")]
    UnsupportedChart(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}

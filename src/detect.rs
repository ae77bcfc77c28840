//! Presentation format detection.

use crate::container::decode_xml_bytes;
use crate::error::{Error, Result};
use crate::xml::parse;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// ZIP file magic bytes: PK\x03\x04
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

const CONTENT_TYPE_PREFIX: &str = "application/vnd.openxmlformats-officedocument.";

/// Flavors of PresentationML package this crate converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationFormat {
    /// Presentation (.pptx)
    Presentation,
    /// Macro-enabled presentation (.pptm)
    MacroEnabled,
    /// Template (.potx)
    Template,
    /// Slide show (.ppsx)
    SlideShow,
}

impl PresentationFormat {
    /// Typical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            PresentationFormat::Presentation => "pptx",
            PresentationFormat::MacroEnabled => "pptm",
            PresentationFormat::Template => "potx",
            PresentationFormat::SlideShow => "ppsx",
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            PresentationFormat::Presentation => "PowerPoint Presentation",
            PresentationFormat::MacroEnabled => "PowerPoint Macro-Enabled Presentation",
            PresentationFormat::Template => "PowerPoint Template",
            PresentationFormat::SlideShow => "PowerPoint Slide Show",
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml" => {
                Some(PresentationFormat::Presentation)
            }
            "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml" => {
                Some(PresentationFormat::MacroEnabled)
            }
            "application/vnd.openxmlformats-officedocument.presentationml.template.main+xml" => {
                Some(PresentationFormat::Template)
            }
            "application/vnd.openxmlformats-officedocument.presentationml.slideshow.main+xml" => {
                Some(PresentationFormat::SlideShow)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for PresentationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Name of a non-presentation OOXML package, for error messages.
fn other_office_format(content_type: &str) -> Option<&'static str> {
    let rest = content_type.strip_prefix(CONTENT_TYPE_PREFIX)?;
    if rest.starts_with("wordprocessingml.") {
        Some("Word Document")
    } else if rest.starts_with("spreadsheetml.") {
        Some("Excel Workbook")
    } else {
        None
    }
}

/// Detect the format of a file.
///
/// # Example
///
/// ```no_run
/// use pptxhtml::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("deck.pptx")?;
/// println!("Detected format: {}", format);
/// # Ok::<(), pptxhtml::Error>(())
/// ```
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<PresentationFormat> {
    detect_format_from_bytes(&std::fs::read(path.as_ref())?)
}

/// Detect the format of an in-memory file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PresentationFormat> {
    if !is_zip_file(data) {
        return Err(Error::UnknownFormat);
    }
    detect_format_from_reader(Cursor::new(data))
}

/// Detect the format from a seekable reader over a ZIP archive.
///
/// Word and Excel packages are rejected with [`Error::UnsupportedFormat`].
pub fn detect_format_from_reader<R: Read + Seek>(reader: R) -> Result<PresentationFormat> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let bytes = {
        let mut file = archive
            .by_name("[Content_Types].xml")
            .map_err(|_| Error::MissingComponent("[Content_Types].xml".to_string()))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        bytes
    };
    let types = parse(&decode_xml_bytes(&bytes)?)?;

    let mut other = None;
    for node in types.children_named("Override") {
        let content_type = node.attr("ContentType").unwrap_or_default();
        if let Some(format) = PresentationFormat::from_content_type(content_type) {
            return Ok(format);
        }
        other = other.or_else(|| other_office_format(content_type));
    }
    if let Some(name) = other {
        return Err(Error::UnsupportedFormat(name.to_string()));
    }

    // Packages with a sparse content-type list still carry the main part.
    if archive.index_for_name("ppt/presentation.xml").is_some() {
        Ok(PresentationFormat::Presentation)
    } else {
        Err(Error::UnknownFormat)
    }
}

/// Check if data starts with ZIP magic bytes.
pub fn is_zip_file(data: &[u8]) -> bool {
    data.len() >= 4 && data[..4] == ZIP_MAGIC
}

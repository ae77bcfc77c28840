//! # pptxhtml
//!
//! PowerPoint (PPTX) slides to absolutely positioned HTML/CSS/SVG, plus a
//! post-fixer that normalizes chart XML styling.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pptxhtml::convert_file;
//!
//! let presentation = convert_file("deck.pptx")?;
//! println!("Slides: {}", presentation.slides.len());
//! std::fs::write("deck.html", presentation.to_html())?;
//! # Ok::<(), pptxhtml::Error>(())
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use pptxhtml::{convert_file_with_options, render::{ImageMode, RenderOptions}};
//!
//! let options = RenderOptions::default()
//!     .with_image_mode(ImageMode::Link)
//!     .with_image_prefix("assets/")
//!     .with_standalone(false);
//!
//! let presentation = convert_file_with_options("deck.pptx", &options)?;
//! # Ok::<(), pptxhtml::Error>(())
//! ```
//!
//! ## Chart XML fixer
//!
//! ```no_run
//! let report = pptxhtml::fixer::fix_charts_in_dir("unpacked/ppt");
//! println!("{}", serde_json::to_string(&report).unwrap());
//! ```
//!
//! ## Features
//!
//! - `async`: Tokio file I/O for the chart fixer

pub mod charts;
pub mod color;
pub mod container;
pub mod detect;
pub mod error;
pub mod fixer;
pub mod image;
pub mod model;
pub mod pptx;
pub mod render;
pub mod shape;
pub mod table;
pub mod text;
pub mod theme;
pub mod units;
pub mod xml;

// Re-exports
pub use container::{CoreProperties, Package, Relationship, Relationships};
pub use detect::{detect_format_from_bytes, detect_format_from_path, PresentationFormat};
pub use error::{Error, Result};
pub use fixer::{fix_chart_xml, fix_charts_in_dir, FixReport};
pub use pptx::{PptxConverter, Presentation, Slide};
pub use render::{ImageMode, RenderOptions};

use std::path::Path;

/// Convert a presentation file with default options.
///
/// # Example
///
/// ```no_run
/// let presentation = pptxhtml::convert_file("deck.pptx")?;
/// # Ok::<(), pptxhtml::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>) -> Result<Presentation> {
    convert_file_with_options(path, &RenderOptions::default())
}

/// Convert a presentation file.
pub fn convert_file_with_options(path: impl AsRef<Path>, options: &RenderOptions) -> Result<Presentation> {
    let path = path.as_ref();
    detect_format_from_path(path)?;
    PptxConverter::open(path)?
        .with_options(options.clone())
        .convert()
}

/// Convert a presentation held in memory with default options.
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("deck.pptx")?;
/// let presentation = pptxhtml::convert_bytes(&data)?;
/// # Ok::<(), pptxhtml::Error>(())
/// ```
pub fn convert_bytes(data: &[u8]) -> Result<Presentation> {
    convert_bytes_with_options(data, &RenderOptions::default())
}

/// Convert a presentation held in memory.
pub fn convert_bytes_with_options(data: &[u8], options: &RenderOptions) -> Result<Presentation> {
    detect_format_from_bytes(data)?;
    PptxConverter::from_bytes(data.to_vec())?
        .with_options(options.clone())
        .convert()
}

/// Plain text of every slide.
///
/// # Example
///
/// ```no_run
/// let text = pptxhtml::extract_text("deck.pptx")?;
/// println!("{}", text);
/// # Ok::<(), pptxhtml::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(convert_file(path)?.plain_text())
}

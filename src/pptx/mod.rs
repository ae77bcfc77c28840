//! PPTX (PowerPoint) presentation conversion.
//!
//! [`PptxConverter`] walks `presentation.xml` in slide order, resolves each
//! slide's layout, master, and theme, and renders the shape trees into
//! absolutely positioned HTML.

mod converter;
mod slide;

pub use converter::PptxConverter;
pub use slide::{
    background_css, placeholder, tree_text, Placeholders, Presentation, ShapeTreeRenderer, Slide,
};

//! Shared rendering context and HTML helpers.

mod html;
mod options;

pub use html::*;
pub use options::{ImageMode, RenderOptions};

use crate::theme::ColorContext;
use crate::xml::XmlNode;

/// Access to package parts referenced from a slide by relationship id.
///
/// The slide driver implements this over the open package; renderers only
/// see the trait, so they can be exercised with in-memory fixtures.
pub trait PartResolver {
    /// `src` value for a picture relationship (data URI or path).
    fn image_src(&self, rel_id: &str) -> Option<String>;

    /// Parsed chart part for a chart relationship.
    fn chart(&self, rel_id: &str) -> Option<XmlNode>;
}

/// A resolver with no parts, for fragments rendered outside a package.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParts;

impl PartResolver for NoParts {
    fn image_src(&self, _rel_id: &str) -> Option<String> {
        None
    }

    fn chart(&self, _rel_id: &str) -> Option<XmlNode> {
        None
    }
}

/// Read-only context handed to every renderer.
pub struct RenderContext<'a> {
    /// Theme palette and color map
    pub colors: &'a ColorContext,
    /// Rendering configuration
    pub options: &'a RenderOptions,
    /// Package parts reachable from the current slide
    pub parts: &'a dyn PartResolver,
}

impl<'a> RenderContext<'a> {
    /// Build a context.
    pub fn new(
        colors: &'a ColorContext,
        options: &'a RenderOptions,
        parts: &'a dyn PartResolver,
    ) -> Self {
        Self {
            colors,
            options,
            parts,
        }
    }
}

impl std::fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("colors", &self.colors.theme.name)
            .field("options", self.options)
            .finish()
    }
}

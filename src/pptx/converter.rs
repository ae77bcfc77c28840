//! Package-level PPTX conversion.

use super::slide::{background_css, slide_section, tree_text, Placeholders, Presentation, ShapeTreeRenderer, Slide};
use crate::container::{rel_types, CoreProperties, Package, Relationships};
use crate::error::{Error, Result};
use crate::image::data_uri;
use crate::render::{ImageMode, PartResolver, RenderContext, RenderOptions};
use crate::theme::{ColorContext, ColorMap, ThemeColors};
use crate::units::emu_to_px;
use crate::xml::XmlNode;
use std::path::Path;

/// Default slide size (16:9, 13.333 in × 7.5 in).
const DEFAULT_SLIDE_CX: i64 = 12_192_000;
const DEFAULT_SLIDE_CY: i64 = 6_858_000;

const DEFAULT_BACKGROUND: &str = "#FFFFFF";

/// A parsed part together with its relationships.
struct LoadedPart {
    path: String,
    root: XmlNode,
    rels: Relationships,
}

impl LoadedPart {
    fn load(package: &Package, path: &str) -> Result<Self> {
        Ok(Self {
            path: path.to_string(),
            root: package.read_part(path)?,
            rels: package.relationships(path)?,
        })
    }

    /// Load a related part, logging and dropping failures.
    fn related(&self, package: &Package, rel_type: &str) -> Option<LoadedPart> {
        let target = self.rels.first_of_type(rel_type)?;
        match LoadedPart::load(package, &target) {
            Ok(part) => Some(part),
            Err(err) => {
                tracing::warn!(part = %target, source = %self.path, error = %err, "related part skipped");
                None
            }
        }
    }

    fn sp_tree(&self) -> Option<&XmlNode> {
        self.root.get(&["p:cSld", "p:spTree"])
    }

    fn background(&self) -> Option<&XmlNode> {
        self.root.get(&["p:cSld", "p:bg"])
    }

    fn shows_master_shapes(&self) -> bool {
        self.root.attr_bool("showMasterSp").unwrap_or(true)
    }
}

/// Resolves `r:id` references of one part against the package.
struct PackageParts<'a> {
    package: &'a Package,
    rels: &'a Relationships,
    options: &'a RenderOptions,
}

impl PartResolver for PackageParts<'_> {
    fn image_src(&self, rel_id: &str) -> Option<String> {
        let rel = self.rels.get(rel_id)?;
        if rel.external {
            return Some(rel.target.clone());
        }
        let path = self.rels.target_path(rel_id)?;
        match self.options.image_mode {
            ImageMode::Embed => match self.package.read_binary(&path) {
                Ok(bytes) => Some(data_uri(&path, &bytes)),
                Err(err) => {
                    tracing::warn!(part = %path, error = %err, "image part unreadable");
                    None
                }
            },
            ImageMode::Link => {
                let file = path.rsplit('/').next().unwrap_or(&path);
                Some(format!("{}{}", self.options.image_path_prefix, file))
            }
        }
    }

    fn chart(&self, rel_id: &str) -> Option<XmlNode> {
        let path = self.rels.target_path(rel_id)?;
        match self.package.read_part(&path) {
            Ok(root) => Some(root),
            Err(err) => {
                tracing::warn!(part = %path, error = %err, "chart part unreadable");
                None
            }
        }
    }
}

/// Converter for PPTX presentations.
///
/// # Example
///
/// ```no_run
/// use pptxhtml::pptx::PptxConverter;
///
/// let converter = PptxConverter::open("deck.pptx")?;
/// let presentation = converter.convert()?;
/// std::fs::write("deck.html", presentation.to_html())?;
/// # Ok::<(), pptxhtml::Error>(())
/// ```
pub struct PptxConverter {
    package: Package,
    options: RenderOptions,
    slide_parts: Vec<String>,
    width: f64,
    height: f64,
}

impl PptxConverter {
    /// Open a PPTX file for conversion.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Create a converter from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let main = package
            .relationships("")?
            .first_of_type(rel_types::OFFICE_DOCUMENT)
            .unwrap_or_else(|| "ppt/presentation.xml".to_string());
        if !package.exists(&main) {
            return Err(Error::MissingComponent(main));
        }
        let presentation = package.read_part(&main)?;
        let rels = package.relationships(&main)?;

        let mut slide_parts = Vec::new();
        if let Some(list) = presentation.child("p:sldIdLst") {
            for sld_id in list.children_named("p:sldId") {
                let Some(rel_id) = sld_id.attr("r:id") else {
                    continue;
                };
                match rels.target_path(rel_id) {
                    Some(path) if package.exists(&path) => slide_parts.push(path),
                    _ => tracing::warn!(rel_id, "slide reference without a slide part"),
                }
            }
        }

        let size = presentation.child("p:sldSz");
        let dimension = |attr: &str, default: i64| {
            emu_to_px(size.and_then(|s| s.attr_i64(attr)).filter(|v| *v > 0).unwrap_or(default))
        };
        let width = dimension("cx", DEFAULT_SLIDE_CX);
        let height = dimension("cy", DEFAULT_SLIDE_CY);
        tracing::debug!(slides = slide_parts.len(), width, height, "opened presentation");

        Ok(Self {
            package,
            options: RenderOptions::default(),
            slide_parts,
            width,
            height,
        })
    }

    /// Replace the rendering options.
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Number of slides in presentation order.
    pub fn slide_count(&self) -> usize {
        self.slide_parts.len()
    }

    /// Slide size in px.
    pub fn slide_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Document properties.
    pub fn properties(&self) -> CoreProperties {
        self.package.core_properties()
    }

    /// Package paths of the media parts (`ppt/media/...`).
    pub fn media_parts(&self) -> Vec<String> {
        let mut parts = self.package.parts_with_prefix("ppt/media/");
        parts.sort();
        parts
    }

    /// Raw bytes of a package part.
    pub fn read_part_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.package.read_binary(path)
    }

    /// Convert every slide.
    ///
    /// A slide part that cannot be read is logged and left out; package-level
    /// failures are returned.
    pub fn convert(&self) -> Result<Presentation> {
        let mut slides = Vec::with_capacity(self.slide_parts.len());
        for index in 1..=self.slide_parts.len() {
            match self.convert_slide(index) {
                Ok(slide) => slides.push(slide),
                Err(err) => tracing::warn!(index, error = %err, "slide skipped"),
            }
        }
        Ok(Presentation {
            width: self.width,
            height: self.height,
            properties: self.properties(),
            slides,
            standalone: self.options.standalone,
            slide_gap: self.options.slide_gap,
        })
    }

    /// Convert one slide by 1-based index.
    pub fn convert_slide(&self, index: usize) -> Result<Slide> {
        let path = index
            .checked_sub(1)
            .and_then(|i| self.slide_parts.get(i))
            .ok_or_else(|| Error::InvalidData(format!("no slide {}", index)))?;
        let slide = LoadedPart::load(&self.package, path)?;
        let layout = slide.related(&self.package, rel_types::SLIDE_LAYOUT);
        let master = layout
            .as_ref()
            .and_then(|l| l.related(&self.package, rel_types::SLIDE_MASTER));
        let colors = self.color_context(&slide, layout.as_ref(), master.as_ref());

        let mut placeholders = Placeholders::default();
        for part in [layout.as_ref(), master.as_ref()].into_iter().flatten() {
            if let Some(tree) = part.sp_tree() {
                placeholders.extend(Placeholders::collect(tree));
            }
        }

        let mut body = String::new();
        if slide.shows_master_shapes() {
            if layout.as_ref().map_or(true, LoadedPart::shows_master_shapes) {
                if let Some(master) = &master {
                    body.push_str(&self.render_layer(master, &colors, &placeholders, true));
                }
            }
            if let Some(layout) = &layout {
                body.push_str(&self.render_layer(layout, &colors, &placeholders, true));
            }
        }
        body.push_str(&self.render_layer(&slide, &colors, &placeholders, false));

        let background = [Some(&slide), layout.as_ref(), master.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|part| part.background().and_then(|bg| background_css(bg, &colors)))
            .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string());

        Ok(Slide {
            index,
            part: path.clone(),
            name: slide
                .root
                .child("p:cSld")
                .and_then(|c| c.attr("name"))
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            hidden: slide.root.attr_bool("show") == Some(false),
            html: slide_section(index, self.width, self.height, &background, &body),
            text: slide.sp_tree().map(tree_text).unwrap_or_default(),
        })
    }

    /// Theme from the master, color map from the master with layout and
    /// slide overrides applied.
    fn color_context(
        &self,
        slide: &LoadedPart,
        layout: Option<&LoadedPart>,
        master: Option<&LoadedPart>,
    ) -> ColorContext {
        let theme = master
            .and_then(|m| m.related(&self.package, rel_types::THEME))
            .map(|t| ThemeColors::from_theme(&t.root))
            .unwrap_or_default();
        let mut color_map = master
            .and_then(|m| m.root.child("p:clrMap"))
            .map(ColorMap::from_node)
            .unwrap_or_default();
        for part in [layout, Some(slide)].into_iter().flatten() {
            if let Some(overrides) = part.root.get(&["p:clrMapOvr", "a:overrideClrMapping"]) {
                color_map.apply_overrides(overrides);
            }
        }
        ColorContext::new(theme, color_map)
    }

    fn render_layer(
        &self,
        part: &LoadedPart,
        colors: &ColorContext,
        placeholders: &Placeholders,
        decoration_only: bool,
    ) -> String {
        let Some(tree) = part.sp_tree() else {
            return String::new();
        };
        let parts = PackageParts {
            package: &self.package,
            rels: &part.rels,
            options: &self.options,
        };
        let ctx = RenderContext::new(colors, &self.options, &parts);
        let renderer = ShapeTreeRenderer::new(&ctx, placeholders);
        let renderer = if decoration_only {
            renderer.decoration_only()
        } else {
            renderer
        };
        renderer.render_tree(tree)
    }
}

impl std::fmt::Debug for PptxConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PptxConverter")
            .field("slides", &self.slide_parts.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

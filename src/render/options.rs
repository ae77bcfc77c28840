//! Rendering options configuration.

/// How pictures are referenced from the generated markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMode {
    /// Inline the image bytes as a `data:` URI
    #[default]
    Embed,
    /// Reference the package path (prefixed by `image_path_prefix`)
    Link,
}

/// Options for rendering presentations.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How pictures are referenced
    pub image_mode: ImageMode,

    /// Prefix for linked image paths (e.g., "assets/")
    pub image_path_prefix: String,

    /// Render chart legends when the chart declares one
    pub include_legend: bool,

    /// Desired number of value-axis ticks for bar/area charts
    pub tick_count: usize,

    /// Ignore `a:xfrm/@rot` on extruded hexagons
    pub hexagon_ignore_rotation: bool,

    /// Maximum number of samples used to approximate curved connectors
    pub curve_segments: usize,

    /// Wrap slides in a standalone HTML document
    pub standalone: bool,

    /// Vertical gap between slides in the standalone document (px)
    pub slide_gap: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_mode: ImageMode::Embed,
            image_path_prefix: String::new(),
            include_legend: true,
            tick_count: 10,
            hexagon_ignore_rotation: true,
            curve_segments: 150,
            standalone: true,
            slide_gap: 20.0,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how pictures are referenced.
    pub fn with_image_mode(mut self, mode: ImageMode) -> Self {
        self.image_mode = mode;
        self
    }

    /// Set the prefix for linked image paths.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Enable or disable chart legends.
    pub fn with_legend(mut self, include: bool) -> Self {
        self.include_legend = include;
        self
    }

    /// Set the desired value-axis tick count (at least 2).
    pub fn with_tick_count(mut self, count: usize) -> Self {
        self.tick_count = count.max(2);
        self
    }

    /// Set the curve sample count, capped at 150.
    pub fn with_curve_segments(mut self, segments: usize) -> Self {
        self.curve_segments = segments.clamp(2, 150);
        self
    }

    /// Emit a standalone document or bare slide fragments.
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }
}

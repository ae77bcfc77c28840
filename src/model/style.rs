//! Resolved paint for shapes and lines.

use crate::color::ResolvedColor;
use crate::theme::ColorContext;
use serde::{Deserialize, Serialize};

/// Resolved fill and outline paint of a shape.
///
/// `fill_color` is `#RRGGBB`, a CSS gradient, or `transparent`. The
/// `original_*` fields keep the theme linkage so the solid color can be
/// re-derived against another theme (see [`FillStyle::reresolve`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub fill_color: String,
    pub opacity: f64,
    pub stroke_color: String,
    pub stroke_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_theme_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_lum_mod: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_lum_off: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_alpha: Option<f64>,
}

impl Default for FillStyle {
    fn default() -> Self {
        Self {
            fill_color: "transparent".to_string(),
            opacity: 1.0,
            stroke_color: "transparent".to_string(),
            stroke_opacity: 1.0,
            original_theme_color: None,
            original_lum_mod: None,
            original_lum_off: None,
            original_alpha: None,
        }
    }
}

impl FillStyle {
    /// A solid fill from a resolved color, keeping its source values.
    pub fn solid(color: &ResolvedColor) -> Self {
        Self {
            fill_color: color.hex.clone(),
            opacity: color.alpha,
            original_theme_color: color.scheme.clone(),
            original_lum_mod: color.lum_mod,
            original_lum_off: color.lum_off,
            original_alpha: color.alpha_raw,
            ..Default::default()
        }
    }

    /// Whether the fill paints anything.
    pub fn is_visible(&self) -> bool {
        self.fill_color != "transparent" && self.opacity > 0.0
    }

    /// Whether the fill is a CSS gradient rather than a flat color.
    pub fn is_gradient(&self) -> bool {
        self.fill_color.contains("gradient(")
    }

    /// Rebuild the solid fill from the `original_*` fields against `ctx`.
    ///
    /// Returns `None` when the fill did not come from a scheme color.
    pub fn reresolve(&self, ctx: &ColorContext) -> Option<String> {
        let scheme = self.original_theme_color.as_ref()?;
        let mut node = crate::xml::XmlNode::new("a:schemeClr").with_attr("val", scheme.as_str());
        if let Some(lum_mod) = self.original_lum_mod {
            node = node.with_child(
                crate::xml::XmlNode::new("a:lumMod").with_attr("val", lum_mod.to_string()),
            );
        }
        if let Some(lum_off) = self.original_lum_off {
            node = node.with_child(
                crate::xml::XmlNode::new("a:lumOff").with_attr("val", lum_off.to_string()),
            );
        }
        crate::color::resolve_color(&node, ctx).map(|c| c.hex)
    }
}

/// Line-end decoration type (`a:headEnd` / `a:tailEnd`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineEndKind {
    #[default]
    None,
    Triangle,
    Arrow,
    Stealth,
    Oval,
    Diamond,
}

impl LineEndKind {
    /// Parse the `type` attribute value.
    pub fn parse(value: &str) -> Self {
        match value {
            "triangle" => LineEndKind::Triangle,
            "arrow" => LineEndKind::Arrow,
            "stealth" => LineEndKind::Stealth,
            "oval" => LineEndKind::Oval,
            "diamond" => LineEndKind::Diamond,
            _ => LineEndKind::None,
        }
    }
}

/// A line end with its size multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineEnd {
    pub kind: LineEndKind,
    /// Width multiplier of the stroke width (`sm`=2, `med`=3, `lg`=5)
    pub width_scale: f64,
    /// Length multiplier of the stroke width
    pub length_scale: f64,
}

impl Default for LineEnd {
    fn default() -> Self {
        Self {
            kind: LineEndKind::None,
            width_scale: 3.0,
            length_scale: 3.0,
        }
    }
}

/// Resolved outline (`a:ln`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// CSS color or `transparent`
    pub color: String,
    /// Width in px
    pub width: f64,
    /// Preset dash name (`solid`, `dash`, ...)
    pub dash: String,
    pub opacity: f64,
    pub head_end: LineEnd,
    pub tail_end: LineEnd,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: "transparent".to_string(),
            width: 0.0,
            dash: "solid".to_string(),
            opacity: 1.0,
            head_end: LineEnd::default(),
            tail_end: LineEnd::default(),
        }
    }
}

impl StrokeStyle {
    /// Whether the stroke draws anything.
    pub fn is_visible(&self) -> bool {
        self.color != "transparent" && self.width > 0.0
    }
}

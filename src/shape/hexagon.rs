//! Pseudo-3D extruded hexagon.
//!
//! The front face is the regular hexagon outline. A back copy is offset at a
//! fixed 30° isometric angle scaled by the extrusion depth, and the three
//! faces visible from the upper right are filled with lighting-adjusted
//! colors.

use crate::color::adjust_brightness;
use crate::model::{FillStyle, Position, StrokeStyle};
use crate::render::escape;
use crate::shape::preset::{hexagon, Adjustments, Outline};
use crate::shape::svg::{paint_attrs, svg_open, svg_paint};
use crate::units::{emu_to_px, fmt_num};
use crate::xml::XmlNode;
use std::fmt::Write as _;

/// Isometric projection angle of the back face.
const PROJECTION_DEG: f64 = 30.0;

/// Extrusion read from `a:sp3d` / `a:scene3d`.
#[derive(Debug, Clone, PartialEq)]
pub struct Extrusion {
    /// Depth in px
    pub depth: f64,
    /// `a:lightRig/@dir`
    pub light_dir: String,
}

impl Extrusion {
    /// Extrusion of a shape's `p:spPr`, if it has a positive `extrusionH`.
    pub fn from_properties(sp_pr: &XmlNode) -> Option<Self> {
        let depth = sp_pr
            .child("a:sp3d")
            .and_then(|s| s.attr_i64("extrusionH"))
            .filter(|h| *h > 0)
            .map(emu_to_px)?;
        let light_dir = sp_pr
            .get(&["a:scene3d", "a:lightRig"])
            .and_then(|l| l.attr("dir"))
            .unwrap_or("t")
            .to_string();
        Some(Self { depth, light_dir })
    }
}

/// Brightness factors for the (top, upper-right, lower-right) side faces.
pub fn light_factors(dir: &str) -> [f64; 3] {
    match dir {
        "t" => [1.2, 1.0, 0.8],
        "tr" => [1.1, 1.2, 0.9],
        "r" => [0.9, 1.1, 1.2],
        "br" => [0.75, 1.0, 1.15],
        "b" => [0.7, 0.85, 1.0],
        "bl" => [0.7, 0.8, 0.9],
        "l" => [1.0, 0.8, 0.7],
        "tl" => [1.25, 0.9, 0.75],
        _ => [1.15, 0.95, 0.8],
    }
}

/// Layout of an extruded hexagon: the enlarged box and its SVG.
#[derive(Debug, Clone)]
pub struct ExtrudedHexagon {
    /// Box covering front and back faces
    pub bounds: Position,
    pub svg: String,
}

/// Lay out an extruded hexagon for a shape at `pos`.
///
/// With `ignore_rotation` the shape's `rot` is dropped and the hexagon is
/// drawn axis-aligned.
pub fn render_extruded(
    pos: &Position,
    adj: &Adjustments,
    extrusion: &Extrusion,
    fill: &FillStyle,
    stroke: &StrokeStyle,
    ignore_rotation: bool,
) -> ExtrudedHexagon {
    let (w, h) = (pos.width, pos.height);
    let angle = PROJECTION_DEG.to_radians();
    let dx = extrusion.depth * angle.cos();
    let dy = extrusion.depth * angle.sin();

    let front: Vec<(f64, f64)> = match hexagon(adj, w, h) {
        Outline::Polygon { points, .. } => points
            .into_iter()
            .map(|(x, y)| (x / 100.0 * w, y / 100.0 * h + dy))
            .collect(),
        _ => Vec::new(),
    };
    let back: Vec<(f64, f64)> = front.iter().map(|(x, y)| (x + dx, y - dy)).collect();

    let base = svg_paint(&fill.fill_color);
    let factors = light_factors(&extrusion.light_dir);
    let edge = if stroke.is_visible() {
        format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape(&stroke.color),
            fmt_num(stroke.width, 2)
        )
    } else {
        String::new()
    };

    let mut svg = svg_open(w + dx, h + dy);
    if front.len() == 6 {
        // Faces visible from the upper right: edges 0-1, 1-2, 2-3.
        for (i, factor) in factors.iter().enumerate() {
            let (a, b) = (i, i + 1);
            let _ = write!(
                svg,
                "<polygon class=\"hex-side\" points=\"{}\" fill=\"{}\"{}/>",
                points_attr(&[front[a], back[a], back[b], front[b]]),
                escape(&adjust_brightness(&base, *factor)),
                edge
            );
        }
        let _ = write!(
            svg,
            "<polygon class=\"hex-front\" points=\"{}\" {}/>",
            points_attr(&front),
            paint_attrs(fill, stroke)
        );
    }
    svg.push_str("</svg>");

    let mut bounds = *pos;
    bounds.y -= dy;
    bounds.width = w + dx;
    bounds.height = h + dy;
    if ignore_rotation {
        bounds.rotation = 0.0;
    }
    ExtrudedHexagon { bounds, svg }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", fmt_num(*x, 2), fmt_num(*y, 2)))
        .collect::<Vec<_>>()
        .join(" ")
}

//! Lines and connectors (`p:cxnSp`, `line` / `*Connector*` presets).
//!
//! Connectors are drawn as positioned `<div>` segments in slide
//! coordinates. Curves are sampled into short segments. Line ends become
//! small clipped or rounded divs rotated to the local tangent.

use crate::model::{LineEnd, LineEndKind, Position, StrokeStyle};
use crate::render::{escape, DataAttrs, RenderContext, Style};
use crate::shape::fill::extract_stroke;
use crate::shape::position::element_xfrm;
use crate::shape::preset::Adjustments;
use crate::units::{fmt_num, px};
use crate::xml::XmlNode;
use serde::Serialize;
use std::fmt::Write as _;

/// Connector routing family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Straight,
    /// Orthogonal elbow with the preset's segment count (2–5)
    Bent(u8),
    /// Bézier curve with the preset's order (2–5)
    Curved(u8),
}

impl ConnectorKind {
    /// Classify a preset name.
    pub fn from_preset(name: &str) -> Self {
        let order = |prefix: &str| {
            name.strip_prefix(prefix)
                .and_then(|n| n.parse::<u8>().ok())
                .map(|n| n.clamp(2, 5))
        };
        if let Some(n) = order("bentConnector") {
            ConnectorKind::Bent(n)
        } else if let Some(n) = order("curvedConnector") {
            ConnectorKind::Curved(n)
        } else {
            ConnectorKind::Straight
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ConnectorKind::Straight => "straight",
            ConnectorKind::Bent(_) => "bent",
            ConnectorKind::Curved(_) => "curved",
        }
    }
}

/// Whether a preset name is drawn by this module.
pub fn is_connector_preset(name: &str) -> bool {
    name == "line"
        || name == "straightConnector1"
        || name.starts_with("bentConnector")
        || name.starts_with("curvedConnector")
}

/// Dash pattern as dash/gap lengths in multiples of the stroke width.
pub fn dash_pattern(dash: &str) -> Option<&'static [f64]> {
    match dash {
        "dot" | "sysDot" => Some(&[1.0, 1.0]),
        "dash" => Some(&[4.0, 3.0]),
        "lgDash" => Some(&[8.0, 3.0]),
        "dashDot" => Some(&[4.0, 3.0, 1.0, 3.0]),
        "lgDashDot" => Some(&[8.0, 3.0, 1.0, 3.0]),
        "lgDashDotDot" => Some(&[8.0, 3.0, 1.0, 3.0, 1.0, 3.0]),
        "sysDash" => Some(&[3.0, 1.0]),
        "sysDashDot" => Some(&[3.0, 1.0, 1.0, 1.0]),
        "sysDashDotDot" => Some(&[3.0, 1.0, 1.0, 1.0, 1.0, 1.0]),
        _ => None,
    }
}

/// CSS background painting a segment with `stroke`'s color and dash.
pub fn segment_background(stroke: &StrokeStyle) -> String {
    let Some(pattern) = dash_pattern(&stroke.dash) else {
        return stroke.color.clone();
    };
    let width = stroke.width.max(1.0);
    let mut stops = Vec::with_capacity(pattern.len() * 2);
    let mut offset = 0.0;
    for (i, len) in pattern.iter().enumerate() {
        let color = if i % 2 == 0 {
            stroke.color.as_str()
        } else {
            "transparent"
        };
        let end = offset + len * width;
        stops.push(format!("{} {}px", color, px(offset)));
        stops.push(format!("{} {}px", color, px(end)));
        offset = end;
    }
    format!("repeating-linear-gradient(90deg, {})", stops.join(", "))
}

fn rotate_about(p: (f64, f64), center: (f64, f64), deg: f64) -> (f64, f64) {
    if deg == 0.0 {
        return p;
    }
    let (s, c) = deg.to_radians().sin_cos();
    let (dx, dy) = (p.0 - center.0, p.1 - center.1);
    (center.0 + dx * c - dy * s, center.1 + dx * s + dy * c)
}

fn cubic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), p3: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

fn quadratic(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    (
        u * u * p0.0 + 2.0 * u * t * p1.0 + t * t * p2.0,
        u * u * p0.1 + 2.0 * u * t * p1.1 + t * t * p2.1,
    )
}

/// Polyline of a connector in slide px, honoring flips and rotation.
///
/// `samples` bounds the number of points used for curves.
pub fn connector_points(
    kind: ConnectorKind,
    adj: &Adjustments,
    pos: &Position,
    samples: usize,
) -> Vec<(f64, f64)> {
    let (w, h) = (pos.width, pos.height);
    let frac = |name: &str| adj.get(name, 50000.0) / 100000.0;

    let local: Vec<(f64, f64)> = match kind {
        ConnectorKind::Straight => vec![(0.0, 0.0), (w, h)],
        ConnectorKind::Bent(2) => vec![(0.0, 0.0), (w, 0.0), (w, h)],
        ConnectorKind::Bent(3) => {
            let x1 = frac("adj1") * w;
            vec![(0.0, 0.0), (x1, 0.0), (x1, h), (w, h)]
        }
        ConnectorKind::Bent(4) => {
            let (x1, y2) = (frac("adj1") * w, frac("adj2") * h);
            vec![(0.0, 0.0), (x1, 0.0), (x1, y2), (w, y2), (w, h)]
        }
        ConnectorKind::Bent(_) => {
            let (x1, y2, x3) = (frac("adj1") * w, frac("adj2") * h, frac("adj3") * w);
            vec![(0.0, 0.0), (x1, 0.0), (x1, y2), (x3, y2), (x3, h), (w, h)]
        }
        ConnectorKind::Curved(order) => {
            let n = samples.clamp(2, 150);
            (0..n)
                .map(|i| {
                    let t = i as f64 / (n - 1) as f64;
                    if order == 2 {
                        quadratic((0.0, 0.0), (w, 0.0), (w, h), t)
                    } else {
                        let x1 = frac("adj1") * w;
                        cubic((0.0, 0.0), (x1, 0.0), (x1, h), (w, h), t)
                    }
                })
                .collect()
        }
    };

    let center = (w / 2.0, h / 2.0);
    local
        .into_iter()
        .map(|(x, y)| {
            let x = if pos.flip_h { w - x } else { x };
            let y = if pos.flip_v { h - y } else { y };
            let (x, y) = rotate_about((x, y), center, pos.rotation);
            (pos.x + x, pos.y + y)
        })
        .collect()
}

fn segment_div(a: (f64, f64), b: (f64, f64), stroke: &StrokeStyle, thickness: f64) -> String {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx).to_degrees();
    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("left", format!("{}px", px(a.0)))
        .set("top", format!("{}px", px(a.1 - thickness / 2.0)))
        .set("width", format!("{}px", px(length)))
        .set("height", format!("{}px", px(thickness)))
        .set("background", segment_background(stroke))
        .set("transform-origin", format!("0 {}px", px(thickness / 2.0)))
        .set("transform", format!("rotate({}deg)", fmt_num(angle, 2)));
    if stroke.opacity < 1.0 {
        style.set("opacity", fmt_num(stroke.opacity, 3));
    }
    format!("<div class=\"pptx-line-segment\" style=\"{}\"></div>", style.to_attr())
}

/// A line-end marker whose tip sits at `tip`, pointing along `angle` degrees.
pub fn marker_div(end: &LineEnd, tip: (f64, f64), angle: f64, stroke: &StrokeStyle) -> Option<String> {
    let base = stroke.width.max(1.0);
    let length = end.length_scale * base;
    let width = end.width_scale * base;
    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("width", format!("{}px", px(length)))
        .set("height", format!("{}px", px(width)))
        .set("background", stroke.color.as_str());

    let centered = match end.kind {
        LineEndKind::None => return None,
        LineEndKind::Triangle => {
            style.set("clip-path", "polygon(0 0, 100% 50%, 0 100%)");
            false
        }
        LineEndKind::Stealth => {
            style.set("clip-path", "polygon(0 0, 100% 50%, 0 100%, 30% 50%)");
            false
        }
        LineEndKind::Arrow => {
            style.set(
                "clip-path",
                "polygon(0 0, 100% 50%, 0 100%, 0 80%, 65% 50%, 0 20%)",
            );
            false
        }
        LineEndKind::Oval => {
            style.set("border-radius", "50%");
            true
        }
        LineEndKind::Diamond => {
            style.set("clip-path", "polygon(50% 0, 100% 50%, 50% 100%, 0 50%)");
            true
        }
    };

    let (left, origin) = if centered {
        (tip.0 - length / 2.0, "50% 50%")
    } else {
        (tip.0 - length, "100% 50%")
    };
    style
        .set("left", format!("{}px", px(left)))
        .set("top", format!("{}px", px(tip.1 - width / 2.0)))
        .set("transform-origin", origin)
        .set("transform", format!("rotate({}deg)", fmt_num(angle, 2)));
    if stroke.opacity < 1.0 {
        style.set("opacity", fmt_num(stroke.opacity, 3));
    }
    Some(format!(
        "<div class=\"pptx-line-end\" style=\"{}\"></div>",
        style.to_attr()
    ))
}

/// Connection site reference (`a:stCxn` / `a:endCxn`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionRef {
    pub id: String,
    pub idx: i64,
}

impl ConnectionRef {
    fn from_node(node: Option<&XmlNode>) -> Option<Self> {
        let node = node?;
        Some(Self {
            id: node.attr("id")?.to_string(),
            idx: node.attr_i64("idx").unwrap_or(0),
        })
    }
}

/// Payload of the `data-connector-info` attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub stroke: String,
    pub stroke_width: f64,
    pub dash: String,
    pub head_end: LineEndKind,
    pub tail_end: LineEndKind,
    pub start_connection: Option<ConnectionRef>,
    pub end_connection: Option<ConnectionRef>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Render a line or connector element placed at `pos`.
pub fn render_connector(element: &XmlNode, pos: &Position, ctx: &RenderContext) -> String {
    let sp_pr = element.child("p:spPr");
    let geom = sp_pr.and_then(|s| s.child("a:prstGeom"));
    let kind = geom
        .and_then(|g| g.attr("prst"))
        .map(ConnectorKind::from_preset)
        .unwrap_or(ConnectorKind::Straight);
    let adj = Adjustments::from_node(geom);
    let stroke = extract_stroke(sp_pr, element.child("p:style"), ctx.colors);

    // Flat lines have a zero extent on one axis; keep it instead of the 1px clamp.
    let mut pos = *pos;
    let ext = element_xfrm(element).and_then(|x| x.child("a:ext"));
    if ext.and_then(|e| e.attr_i64("cx")) == Some(0) {
        pos.width = 0.0;
    }
    if ext.and_then(|e| e.attr_i64("cy")) == Some(0) {
        pos.height = 0.0;
    }

    let points = connector_points(kind, &adj, &pos, ctx.options.curve_segments);
    let (first, last) = match (points.first(), points.last()) {
        (Some(f), Some(l)) => (*f, *l),
        _ => return String::new(),
    };

    let nv = element.get(&["p:nvCxnSpPr", "p:cNvPr"]).or_else(|| element.get(&["p:nvSpPr", "p:cNvPr"]));
    let cxn = element.get(&["p:nvCxnSpPr", "p:cNvCxnSpPr"]);
    let info = ConnectorInfo {
        kind: kind.label().to_string(),
        start_x: round2(first.0),
        start_y: round2(first.1),
        end_x: round2(last.0),
        end_y: round2(last.1),
        stroke: stroke.color.clone(),
        stroke_width: round2(stroke.width),
        dash: stroke.dash.clone(),
        head_end: stroke.head_end.kind,
        tail_end: stroke.tail_end.kind,
        start_connection: ConnectionRef::from_node(cxn.and_then(|c| c.child("a:stCxn"))),
        end_connection: ConnectionRef::from_node(cxn.and_then(|c| c.child("a:endCxn"))),
    };
    let info_json = serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string());

    let attrs = DataAttrs {
        name: nv.and_then(|n| n.attr("name")),
        shape_id: nv.and_then(|n| n.attr("id")),
        rel_id: None,
    };
    let mut html = format!(
        "<div class=\"pptx-connector\"{} data-connector-info=\"{}\" style=\"position: absolute; left: 0; top: 0; width: 0; height: 0; overflow: visible;\">",
        attrs.render(),
        escape(&info_json)
    );

    if stroke.is_visible() {
        let thickness = stroke.width.max(1.0);
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if (b.0 - a.0).abs() < f64::EPSILON && (b.1 - a.1).abs() < f64::EPSILON {
                continue;
            }
            html.push_str(&segment_div(a, b, &stroke, thickness));
        }
        let n = points.len();
        if n >= 2 {
            let head_angle = (points[0].1 - points[1].1).atan2(points[0].0 - points[1].0);
            let tail_angle = (points[n - 1].1 - points[n - 2].1).atan2(points[n - 1].0 - points[n - 2].0);
            for (end, tip, angle) in [
                (&stroke.head_end, first, head_angle),
                (&stroke.tail_end, last, tail_angle),
            ] {
                if let Some(marker) = marker_div(end, tip, angle.to_degrees(), &stroke) {
                    let _ = write!(html, "{}", marker);
                }
            }
        }
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NoParts, RenderOptions};
    use crate::theme::ColorContext;
    use crate::xml::parse;

    #[test]
    fn test_kind_from_preset() {
        assert_eq!(ConnectorKind::from_preset("line"), ConnectorKind::Straight);
        assert_eq!(ConnectorKind::from_preset("straightConnector1"), ConnectorKind::Straight);
        assert_eq!(ConnectorKind::from_preset("bentConnector3"), ConnectorKind::Bent(3));
        assert_eq!(ConnectorKind::from_preset("curvedConnector2"), ConnectorKind::Curved(2));
        assert!(is_connector_preset("curvedConnector5"));
        assert!(!is_connector_preset("rect"));
    }

    #[test]
    fn test_straight_with_flips() {
        let mut pos = Position::new(10.0, 20.0, 100.0, 50.0);
        let adj = Adjustments::default();
        assert_eq!(
            connector_points(ConnectorKind::Straight, &adj, &pos, 150),
            vec![(10.0, 20.0), (110.0, 70.0)]
        );
        pos.flip_h = true;
        assert_eq!(
            connector_points(ConnectorKind::Straight, &adj, &pos, 150),
            vec![(110.0, 20.0), (10.0, 70.0)]
        );
        pos.flip_h = false;
        pos.flip_v = true;
        assert_eq!(
            connector_points(ConnectorKind::Straight, &adj, &pos, 150),
            vec![(10.0, 70.0), (110.0, 20.0)]
        );
    }

    #[test]
    fn test_rotation_about_center() {
        let mut pos = Position::new(0.0, 0.0, 100.0, 0.0);
        pos.height = 0.0;
        pos.rotation = 90.0;
        let pts = connector_points(ConnectorKind::Straight, &Adjustments::default(), &pos, 150);
        assert!((pts[0].0 - 50.0).abs() < 1e-9);
        assert!((pts[0].1 + 50.0).abs() < 1e-9);
        assert!((pts[1].0 - 50.0).abs() < 1e-9);
        assert!((pts[1].1 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_bent_elbow() {
        let pos = Position::new(0.0, 0.0, 100.0, 40.0);
        let mut adj = Adjustments::default();
        adj.set("adj1", 25000.0);
        assert_eq!(
            connector_points(ConnectorKind::Bent(3), &adj, &pos, 150),
            vec![(0.0, 0.0), (25.0, 0.0), (25.0, 40.0), (100.0, 40.0)]
        );
    }

    #[test]
    fn test_curve_sample_cap() {
        let pos = Position::new(0.0, 0.0, 100.0, 100.0);
        let pts = connector_points(ConnectorKind::Curved(3), &Adjustments::default(), &pos, 1000);
        assert_eq!(pts.len(), 150);
        assert_eq!(pts[0], (0.0, 0.0));
        assert_eq!(pts[149], (100.0, 100.0));
    }

    #[test]
    fn test_dash_background() {
        let stroke = StrokeStyle {
            color: "#000000".to_string(),
            width: 2.0,
            dash: "dash".to_string(),
            ..Default::default()
        };
        assert_eq!(
            segment_background(&stroke),
            "repeating-linear-gradient(90deg, #000000 0px, #000000 8px, transparent 8px, transparent 14px)"
        );
        let solid = StrokeStyle {
            color: "#000000".to_string(),
            ..Default::default()
        };
        assert_eq!(segment_background(&solid), "#000000");
    }

    #[test]
    fn test_marker_shapes() {
        let stroke = StrokeStyle {
            color: "#FF0000".to_string(),
            width: 1.0,
            ..Default::default()
        };
        let tri = LineEnd {
            kind: LineEndKind::Triangle,
            ..Default::default()
        };
        let html = marker_div(&tri, (100.0, 50.0), 0.0, &stroke).unwrap();
        assert!(html.contains("clip-path: polygon(0 0, 100% 50%, 0 100%);"));
        assert!(html.contains("left: 97px;"));
        let oval = LineEnd {
            kind: LineEndKind::Oval,
            ..Default::default()
        };
        assert!(marker_div(&oval, (0.0, 0.0), 0.0, &stroke)
            .unwrap()
            .contains("border-radius: 50%;"));
        assert!(marker_div(&LineEnd::default(), (0.0, 0.0), 0.0, &stroke).is_none());
    }

    #[test]
    fn test_render_connector_info() {
        let element = parse(
            r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="7" name="Connector 6"/><p:cNvCxnSpPr><a:stCxn id="2" idx="3"/><a:endCxn id="5" idx="1"/></p:cNvCxnSpPr><p:nvPr/></p:nvCxnSpPr>
               <p:spPr><a:xfrm><a:off x="127000" y="127000"/><a:ext cx="1270000" cy="0"/></a:xfrm><a:prstGeom prst="straightConnector1"><a:avLst/></a:prstGeom>
               <a:ln w="12700"><a:solidFill><a:srgbClr val="112233"/></a:solidFill><a:tailEnd type="triangle"/></a:ln></p:spPr></p:cxnSp>"#,
        )
        .unwrap();
        let colors = ColorContext::default();
        let options = RenderOptions::default();
        let ctx = RenderContext::new(&colors, &options, &NoParts);
        let pos = crate::shape::position::element_position(&element);
        let html = render_connector(&element, &pos, &ctx);

        assert!(html.contains("data-name=\"Connector 6\""));
        assert!(html.contains("data-shape-id=\"7\""));
        assert!(html.contains("&quot;type&quot;:&quot;straight&quot;"));
        assert!(html.contains("&quot;endY&quot;:10.0"));
        assert!(html.contains("&quot;startConnection&quot;:{&quot;id&quot;:&quot;2&quot;,&quot;idx&quot;:3}"));
        assert!(html.contains("&quot;tailEnd&quot;:&quot;triangle&quot;"));
        assert_eq!(html.matches("pptx-line-segment").count(), 1);
        assert_eq!(html.matches("pptx-line-end").count(), 1);
    }
}

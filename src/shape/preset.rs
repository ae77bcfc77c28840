//! Preset geometry table.
//!
//! Maps `a:prstGeom/@prst` names to an outline: a static polygon in
//! percentages, a generator reading adjust values from `a:avLst`, a
//! border-radius, or an SVG silhouette. Names missing from the table render
//! as plain rectangles.

use crate::shape::svg::SvgShape;
use crate::units::{fmt_num, PERCENT_UNIT};
use crate::xml::XmlNode;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Adjust values (`a:avLst/a:gd`), raw 0–100000 units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustments {
    values: HashMap<String, f64>,
}

impl Adjustments {
    /// Read `a:gd name="adj1" fmla="val 50000"` entries from a `prstGeom`
    /// (or directly from an `avLst`).
    pub fn from_node(node: Option<&XmlNode>) -> Self {
        let mut adj = Self::default();
        let Some(node) = node else {
            return adj;
        };
        let av_lst = if node.is("avLst") {
            Some(node)
        } else {
            node.child("a:avLst")
        };
        for gd in av_lst.into_iter().flat_map(|l| l.children_named("a:gd")) {
            let (Some(name), Some(fmla)) = (gd.attr("name"), gd.attr("fmla")) else {
                continue;
            };
            if let Some(value) = fmla
                .strip_prefix("val ")
                .and_then(|v| v.trim().parse::<f64>().ok())
            {
                adj.values.insert(name.to_string(), value);
            }
        }
        adj
    }

    /// Set a value (raw units).
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    /// Raw value or `default`. A lone `adj` and `adj1` are interchangeable.
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.values
            .get(name)
            .or_else(|| match name {
                "adj" => self.values.get("adj1"),
                "adj1" => self.values.get("adj"),
                _ => None,
            })
            .copied()
            .unwrap_or(default)
    }

    /// Value as a percentage (0–100).
    pub fn percent(&self, name: &str, default: f64) -> f64 {
        self.get(name, default) / PERCENT_UNIT * 100.0
    }
}

/// A resolved shape outline in the box's own percentage space.
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Plain rectangle
    Rect,
    /// Polygon points in percent; `even_odd` cuts holes
    Polygon { points: Vec<(f64, f64)>, even_odd: bool },
    /// Rectangle with CSS `border-radius`
    Rounded(String),
    /// Inline SVG silhouette
    Svg(SvgShape),
}

impl Outline {
    fn polygon(points: Vec<(f64, f64)>) -> Self {
        Outline::Polygon {
            points,
            even_odd: false,
        }
    }

    /// CSS `clip-path` value for polygon outlines.
    pub fn clip_path(&self) -> Option<String> {
        match self {
            Outline::Polygon { points, even_odd } => {
                let body: Vec<String> = points
                    .iter()
                    .map(|(x, y)| format!("{}% {}%", fmt_num(*x, 2), fmt_num(*y, 2)))
                    .collect();
                Some(format!(
                    "polygon({}{})",
                    if *even_odd { "evenodd, " } else { "" },
                    body.join(", ")
                ))
            }
            _ => None,
        }
    }

    /// SVG `points` attribute scaled to a `width`×`height` box.
    pub fn svg_points(&self, width: f64, height: f64) -> Option<String> {
        match self {
            Outline::Polygon { points, .. } => Some(
                points
                    .iter()
                    .map(|(x, y)| {
                        format!(
                            "{},{}",
                            fmt_num(x / 100.0 * width, 2),
                            fmt_num(y / 100.0 * height, 2)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

/// Generator reading adjust values; `w`/`h` are the box size in px.
pub type OutlineFn = fn(&Adjustments, f64, f64) -> Outline;

/// How a preset's outline is produced.
#[derive(Clone, Copy)]
pub enum Geometry {
    Rect,
    Static(&'static [(f64, f64)]),
    Parametric(OutlineFn),
    Svg(SvgShape),
}

impl std::fmt::Debug for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Geometry::Rect => write!(f, "Rect"),
            Geometry::Static(points) => write!(f, "Static({} points)", points.len()),
            Geometry::Parametric(_) => write!(f, "Parametric"),
            Geometry::Svg(shape) => write!(f, "Svg({:?})", shape),
        }
    }
}

/// One entry of the preset table.
#[derive(Debug, Clone, Copy)]
pub struct PresetShape {
    pub name: &'static str,
    pub geometry: Geometry,
}

impl PresetShape {
    /// Resolve the outline for a box of `w`×`h` px.
    pub fn outline(&self, adj: &Adjustments, w: f64, h: f64) -> Outline {
        match self.geometry {
            Geometry::Rect => Outline::Rect,
            Geometry::Static(points) => Outline::polygon(points.to_vec()),
            Geometry::Parametric(f) => f(adj, w, h),
            Geometry::Svg(shape) => Outline::Svg(shape),
        }
    }
}

/// Fraction of `ss` (shorter side) expressed as a percent of `side`.
fn ss_percent(adj: f64, w: f64, h: f64, side: f64) -> f64 {
    let ss = w.min(h);
    if side <= 0.0 {
        return 0.0;
    }
    (adj / PERCENT_UNIT * ss / side * 100.0).clamp(0.0, 100.0)
}

fn right_arrow(adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    let shaft = adj.percent("adj1", 50000.0).clamp(0.0, 100.0);
    let head = adj.percent("adj2", 50000.0).clamp(0.0, 100.0);
    let top = 50.0 - shaft / 2.0;
    let bottom = 50.0 + shaft / 2.0;
    let start = 100.0 - head;
    Outline::polygon(vec![
        (0.0, top),
        (start, top),
        (start, 0.0),
        (100.0, 50.0),
        (start, 100.0),
        (start, bottom),
        (0.0, bottom),
    ])
}

fn left_arrow(adj: &Adjustments, w: f64, h: f64) -> Outline {
    mirror_x(right_arrow(adj, w, h))
}

fn down_arrow(adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    let shaft = adj.percent("adj1", 50000.0).clamp(0.0, 100.0);
    let head = adj.percent("adj2", 50000.0).clamp(0.0, 100.0);
    let left = 50.0 - shaft / 2.0;
    let right = 50.0 + shaft / 2.0;
    let start = 100.0 - head;
    Outline::polygon(vec![
        (left, 0.0),
        (right, 0.0),
        (right, start),
        (100.0, start),
        (50.0, 100.0),
        (0.0, start),
        (left, start),
    ])
}

fn up_arrow(adj: &Adjustments, w: f64, h: f64) -> Outline {
    mirror_y(down_arrow(adj, w, h))
}

fn left_right_arrow(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let shaft = adj.percent("adj1", 50000.0).clamp(0.0, 100.0);
    let head = ss_percent(adj.get("adj2", 50000.0), w, h, w).min(50.0);
    let top = 50.0 - shaft / 2.0;
    let bottom = 50.0 + shaft / 2.0;
    Outline::polygon(vec![
        (0.0, 50.0),
        (head, 0.0),
        (head, top),
        (100.0 - head, top),
        (100.0 - head, 0.0),
        (100.0, 50.0),
        (100.0 - head, 100.0),
        (100.0 - head, bottom),
        (head, bottom),
        (head, 100.0),
    ])
}

fn up_down_arrow(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let shaft = adj.percent("adj1", 50000.0).clamp(0.0, 100.0);
    let head = ss_percent(adj.get("adj2", 50000.0), w, h, h).min(50.0);
    let left = 50.0 - shaft / 2.0;
    let right = 50.0 + shaft / 2.0;
    Outline::polygon(vec![
        (50.0, 0.0),
        (100.0, head),
        (right, head),
        (right, 100.0 - head),
        (100.0, 100.0 - head),
        (50.0, 100.0),
        (0.0, 100.0 - head),
        (left, 100.0 - head),
        (left, head),
        (0.0, head),
    ])
}

fn notched_right_arrow(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let Outline::Polygon { mut points, .. } = right_arrow(adj, w, h) else {
        return Outline::Rect;
    };
    let shaft = adj.percent("adj1", 50000.0).clamp(0.0, 100.0);
    // Notch depth follows the head slope over half the shaft thickness.
    let head = adj.percent("adj2", 50000.0).clamp(0.0, 100.0);
    let notch = head * (shaft / 2.0) / 50.0;
    points.push((notch, 50.0));
    Outline::polygon(points)
}

fn chevron(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let o = ss_percent(adj.get("adj", 50000.0), w, h, w).min(100.0);
    Outline::polygon(vec![
        (0.0, 0.0),
        (100.0 - o, 0.0),
        (100.0, 50.0),
        (100.0 - o, 100.0),
        (0.0, 100.0),
        (o, 50.0),
    ])
}

fn home_plate(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let o = ss_percent(adj.get("adj", 50000.0), w, h, w).min(100.0);
    Outline::polygon(vec![
        (0.0, 0.0),
        (100.0 - o, 0.0),
        (100.0, 50.0),
        (100.0 - o, 100.0),
        (0.0, 100.0),
    ])
}

fn triangle(adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    let apex = adj.percent("adj", 50000.0).clamp(0.0, 100.0);
    Outline::polygon(vec![(apex, 0.0), (100.0, 100.0), (0.0, 100.0)])
}

fn parallelogram(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let o = ss_percent(adj.get("adj", 25000.0), w, h, w).min(100.0);
    Outline::polygon(vec![(o, 0.0), (100.0, 0.0), (100.0 - o, 100.0), (0.0, 100.0)])
}

fn trapezoid(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let o = ss_percent(adj.get("adj", 25000.0), w, h, w).min(50.0);
    Outline::polygon(vec![(o, 0.0), (100.0 - o, 0.0), (100.0, 100.0), (0.0, 100.0)])
}

/// Hexagon outline; also the front face of the extruded variant.
pub fn hexagon(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let o = ss_percent(adj.get("adj", 25000.0), w, h, w).min(50.0);
    Outline::polygon(vec![
        (o, 0.0),
        (100.0 - o, 0.0),
        (100.0, 50.0),
        (100.0 - o, 100.0),
        (o, 100.0),
        (0.0, 50.0),
    ])
}

fn octagon(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let a = adj.get("adj", 29289.0);
    let ox = ss_percent(a, w, h, w).min(50.0);
    let oy = ss_percent(a, w, h, h).min(50.0);
    Outline::polygon(vec![
        (ox, 0.0),
        (100.0 - ox, 0.0),
        (100.0, oy),
        (100.0, 100.0 - oy),
        (100.0 - ox, 100.0),
        (ox, 100.0),
        (0.0, 100.0 - oy),
        (0.0, oy),
    ])
}

fn plus(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let a = adj.get("adj", 25000.0);
    let ox = ss_percent(a, w, h, w).min(50.0);
    let oy = ss_percent(a, w, h, h).min(50.0);
    Outline::polygon(vec![
        (ox, 0.0),
        (100.0 - ox, 0.0),
        (100.0 - ox, oy),
        (100.0, oy),
        (100.0, 100.0 - oy),
        (100.0 - ox, 100.0 - oy),
        (100.0 - ox, 100.0),
        (ox, 100.0),
        (ox, 100.0 - oy),
        (0.0, 100.0 - oy),
        (0.0, oy),
        (ox, oy),
    ])
}

fn frame(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let a = adj.get("adj1", 12500.0);
    let ox = ss_percent(a, w, h, w).min(50.0);
    let oy = ss_percent(a, w, h, h).min(50.0);
    Outline::Polygon {
        points: vec![
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
            (0.0, 0.0),
            (ox, oy),
            (ox, 100.0 - oy),
            (100.0 - ox, 100.0 - oy),
            (100.0 - ox, oy),
            (ox, oy),
        ],
        even_odd: true,
    }
}

fn snip1_rect(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let a = adj.get("adj", 16667.0);
    let ox = ss_percent(a, w, h, w).min(50.0);
    let oy = ss_percent(a, w, h, h).min(50.0);
    Outline::polygon(vec![
        (0.0, 0.0),
        (100.0 - ox, 0.0),
        (100.0, oy),
        (100.0, 100.0),
        (0.0, 100.0),
    ])
}

fn plaque(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let a = adj.get("adj", 16667.0);
    let ox = ss_percent(a, w, h, w).min(50.0);
    let oy = ss_percent(a, w, h, h).min(50.0);
    Outline::polygon(vec![
        (ox, 0.0),
        (100.0 - ox, 0.0),
        (100.0 - ox * 0.3, oy * 0.3),
        (100.0, oy),
        (100.0, 100.0 - oy),
        (100.0 - ox * 0.3, 100.0 - oy * 0.3),
        (100.0 - ox, 100.0),
        (ox, 100.0),
        (ox * 0.3, 100.0 - oy * 0.3),
        (0.0, 100.0 - oy),
        (0.0, oy),
        (ox * 0.3, oy * 0.3),
    ])
}

fn round_rect(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let r = adj.get("adj", 16667.0) / PERCENT_UNIT * w.min(h);
    Outline::Rounded(format!("{}px", fmt_num(r, 2)))
}

fn round1_rect(adj: &Adjustments, w: f64, h: f64) -> Outline {
    let r = adj.get("adj", 16667.0) / PERCENT_UNIT * w.min(h);
    Outline::Rounded(format!("0 {}px 0 0", fmt_num(r, 2)))
}

fn ellipse(_adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    Outline::Rounded("50%".to_string())
}

fn capsule(_adj: &Adjustments, w: f64, h: f64) -> Outline {
    Outline::Rounded(format!("{}px", fmt_num(w.min(h) / 2.0, 2)))
}

fn wedge_rect_callout(adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    let tip_x = 50.0 + adj.percent("adj1", -20833.0);
    let tip_y = 50.0 + adj.percent("adj2", 62500.0);
    let (b1, b2) = if tip_x < 50.0 { (20.0, 35.0) } else { (65.0, 80.0) };
    if tip_y >= 100.0 {
        Outline::polygon(vec![
            (0.0, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (b2, 100.0),
            (tip_x, tip_y),
            (b1, 100.0),
            (0.0, 100.0),
        ])
    } else if tip_y <= 0.0 {
        Outline::polygon(vec![
            (0.0, 0.0),
            (b1, 0.0),
            (tip_x, tip_y),
            (b2, 0.0),
            (100.0, 0.0),
            (100.0, 100.0),
            (0.0, 100.0),
        ])
    } else {
        Outline::Rect
    }
}

/// Star with `n` points; `adj` is the inner radius as a fraction of 50000.
fn star_points(n: usize, inner: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(n * 2);
    for i in 0..n * 2 {
        let radius = if i % 2 == 0 { 50.0 } else { 50.0 * inner };
        let angle = -PI / 2.0 + i as f64 * PI / n as f64;
        points.push((50.0 + radius * angle.cos(), 50.0 + radius * angle.sin()));
    }
    points
}

macro_rules! star {
    ($name:ident, $n:expr, $default:expr) => {
        fn $name(adj: &Adjustments, _w: f64, _h: f64) -> Outline {
            let inner = (adj.get("adj", $default) / 50000.0).clamp(0.0, 1.0);
            Outline::polygon(star_points($n, inner))
        }
    };
}

star!(star4, 4, 12500.0);
star!(star5, 5, 19098.0);
star!(star6, 6, 28868.0);
star!(star8, 8, 37500.0);
star!(star10, 10, 42533.0);
star!(star12, 12, 37500.0);

/// Regular polygon with a vertex at the top.
fn regular_points(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let angle = -PI / 2.0 + i as f64 * 2.0 * PI / n as f64;
            (50.0 + 50.0 * angle.cos(), 50.0 + 50.0 * angle.sin())
        })
        .collect()
}

fn decagon(_adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    Outline::polygon(regular_points(10))
}

fn dodecagon(_adj: &Adjustments, _w: f64, _h: f64) -> Outline {
    Outline::polygon(regular_points(12))
}

fn mirror_x(outline: Outline) -> Outline {
    match outline {
        Outline::Polygon { points, even_odd } => Outline::Polygon {
            points: points.into_iter().map(|(x, y)| (100.0 - x, y)).collect(),
            even_odd,
        },
        other => other,
    }
}

fn mirror_y(outline: Outline) -> Outline {
    match outline {
        Outline::Polygon { points, even_odd } => Outline::Polygon {
            points: points.into_iter().map(|(x, y)| (x, 100.0 - y)).collect(),
            even_odd,
        },
        other => other,
    }
}

const RT_TRIANGLE: &[(f64, f64)] = &[(0.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
const DIAMOND: &[(f64, f64)] = &[(50.0, 0.0), (100.0, 50.0), (50.0, 100.0), (0.0, 50.0)];
const PENTAGON: &[(f64, f64)] = &[
    (50.0, 0.0),
    (100.0, 38.0),
    (82.0, 100.0),
    (18.0, 100.0),
    (0.0, 38.0),
];
const HEPTAGON: &[(f64, f64)] = &[
    (50.0, 0.0),
    (90.0, 20.0),
    (100.0, 60.0),
    (75.0, 100.0),
    (25.0, 100.0),
    (0.0, 60.0),
    (10.0, 20.0),
];
const FLOW_INPUT_OUTPUT: &[(f64, f64)] = &[(20.0, 0.0), (100.0, 0.0), (80.0, 100.0), (0.0, 100.0)];
const FLOW_DOCUMENT: &[(f64, f64)] = &[
    (0.0, 0.0),
    (100.0, 0.0),
    (100.0, 80.0),
    (87.5, 76.0),
    (75.0, 73.0),
    (62.5, 73.5),
    (50.0, 78.0),
    (37.5, 84.0),
    (25.0, 88.5),
    (12.5, 88.0),
    (0.0, 83.0),
];
const FLOW_MANUAL_INPUT: &[(f64, f64)] = &[(0.0, 20.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
const FLOW_MANUAL_OPERATION: &[(f64, f64)] =
    &[(0.0, 0.0), (100.0, 0.0), (80.0, 100.0), (20.0, 100.0)];
const FLOW_PREPARATION: &[(f64, f64)] = &[
    (20.0, 0.0),
    (80.0, 0.0),
    (100.0, 50.0),
    (80.0, 100.0),
    (20.0, 100.0),
    (0.0, 50.0),
];
const FLOW_OFFPAGE: &[(f64, f64)] = &[(0.0, 0.0), (100.0, 0.0), (100.0, 80.0), (50.0, 100.0), (0.0, 80.0)];
const FLOW_PUNCHED_CARD: &[(f64, f64)] =
    &[(20.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 20.0)];
const FLOW_MERGE: &[(f64, f64)] = &[(0.0, 0.0), (100.0, 0.0), (50.0, 100.0)];
const FLOW_EXTRACT: &[(f64, f64)] = &[(50.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
const LIGHTNING_BOLT: &[(f64, f64)] = &[
    (39.16, 0.0),
    (0.0, 18.16),
    (35.02, 38.96),
    (23.12, 45.0),
    (56.47, 64.37),
    (44.47, 69.14),
    (100.0, 100.0),
    (68.39, 60.14),
    (79.1, 55.03),
    (48.1, 36.67),
    (56.3, 31.93),
];

const fn entry(name: &'static str, geometry: Geometry) -> PresetShape {
    PresetShape { name, geometry }
}

static PRESETS: &[PresetShape] = &[
    entry("rect", Geometry::Rect),
    entry("flowChartProcess", Geometry::Rect),
    entry("flowChartAlternateProcess", Geometry::Parametric(round_rect)),
    entry("roundRect", Geometry::Parametric(round_rect)),
    entry("round1Rect", Geometry::Parametric(round1_rect)),
    entry("snip1Rect", Geometry::Parametric(snip1_rect)),
    entry("plaque", Geometry::Parametric(plaque)),
    entry("ellipse", Geometry::Parametric(ellipse)),
    entry("flowChartConnector", Geometry::Parametric(ellipse)),
    entry("flowChartTerminator", Geometry::Parametric(capsule)),
    entry("triangle", Geometry::Parametric(triangle)),
    entry("rtTriangle", Geometry::Static(RT_TRIANGLE)),
    entry("parallelogram", Geometry::Parametric(parallelogram)),
    entry("trapezoid", Geometry::Parametric(trapezoid)),
    entry("diamond", Geometry::Static(DIAMOND)),
    entry("flowChartDecision", Geometry::Static(DIAMOND)),
    entry("pentagon", Geometry::Static(PENTAGON)),
    entry("hexagon", Geometry::Parametric(hexagon)),
    entry("heptagon", Geometry::Static(HEPTAGON)),
    entry("octagon", Geometry::Parametric(octagon)),
    entry("decagon", Geometry::Parametric(decagon)),
    entry("dodecagon", Geometry::Parametric(dodecagon)),
    entry("star4", Geometry::Parametric(star4)),
    entry("star5", Geometry::Parametric(star5)),
    entry("star6", Geometry::Parametric(star6)),
    entry("star8", Geometry::Parametric(star8)),
    entry("star10", Geometry::Parametric(star10)),
    entry("star12", Geometry::Parametric(star12)),
    entry("plus", Geometry::Parametric(plus)),
    entry("cross", Geometry::Parametric(plus)),
    entry("frame", Geometry::Parametric(frame)),
    entry("chevron", Geometry::Parametric(chevron)),
    entry("homePlate", Geometry::Parametric(home_plate)),
    entry("rightArrow", Geometry::Parametric(right_arrow)),
    entry("leftArrow", Geometry::Parametric(left_arrow)),
    entry("upArrow", Geometry::Parametric(up_arrow)),
    entry("downArrow", Geometry::Parametric(down_arrow)),
    entry("leftRightArrow", Geometry::Parametric(left_right_arrow)),
    entry("upDownArrow", Geometry::Parametric(up_down_arrow)),
    entry("notchedRightArrow", Geometry::Parametric(notched_right_arrow)),
    entry("wedgeRectCallout", Geometry::Parametric(wedge_rect_callout)),
    entry("flowChartInputOutput", Geometry::Static(FLOW_INPUT_OUTPUT)),
    entry("flowChartDocument", Geometry::Static(FLOW_DOCUMENT)),
    entry("flowChartManualInput", Geometry::Static(FLOW_MANUAL_INPUT)),
    entry("flowChartManualOperation", Geometry::Static(FLOW_MANUAL_OPERATION)),
    entry("flowChartPreparation", Geometry::Static(FLOW_PREPARATION)),
    entry("flowChartOffpageConnector", Geometry::Static(FLOW_OFFPAGE)),
    entry("flowChartPunchedCard", Geometry::Static(FLOW_PUNCHED_CARD)),
    entry("flowChartMerge", Geometry::Static(FLOW_MERGE)),
    entry("flowChartExtract", Geometry::Static(FLOW_EXTRACT)),
    entry("lightningBolt", Geometry::Static(LIGHTNING_BOLT)),
    entry("heart", Geometry::Svg(SvgShape::Heart)),
    entry("cloud", Geometry::Svg(SvgShape::Cloud)),
    entry("teardrop", Geometry::Svg(SvgShape::Teardrop)),
    entry("smileyFace", Geometry::Svg(SvgShape::Smiley)),
    entry("cube", Geometry::Svg(SvgShape::Cube)),
    entry("can", Geometry::Svg(SvgShape::Can)),
    entry("donut", Geometry::Svg(SvgShape::Donut)),
    entry("noSmoking", Geometry::Svg(SvgShape::NoSmoking)),
    entry("moon", Geometry::Svg(SvgShape::Moon)),
    entry("sun", Geometry::Svg(SvgShape::Sun)),
];

/// Look up a preset by name.
pub fn lookup(name: &str) -> Option<&'static PresetShape> {
    PRESETS.iter().find(|p| p.name == name)
}

/// All preset names the table knows.
pub fn known_presets() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}

/// Outline for a preset name; unknown names are rectangles.
pub fn outline_for(name: &str, adj: &Adjustments, w: f64, h: f64) -> Outline {
    match lookup(name) {
        Some(preset) => preset.outline(adj, w, h),
        None => {
            tracing::debug!(preset = name, "unknown preset geometry, rendering rectangle");
            Outline::Rect
        }
    }
}

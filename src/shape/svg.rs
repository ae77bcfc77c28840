//! Inline SVG silhouettes for presets that a polygon cannot express.

use crate::color::adjust_brightness;
use crate::model::{FillStyle, StrokeStyle};
use crate::render::escape;
use crate::shape::preset::Adjustments;
use crate::units::{fmt_num, PERCENT_UNIT};
use std::fmt::Write as _;

/// Presets drawn as SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvgShape {
    Heart,
    Cloud,
    Teardrop,
    Smiley,
    Cube,
    Can,
    Donut,
    NoSmoking,
    Moon,
    Sun,
}

fn n(v: f64) -> String {
    fmt_num(v, 2)
}

/// A flat SVG paint for a CSS fill value.
///
/// SVG `fill` cannot take a CSS gradient, so gradients use their first stop.
pub fn svg_paint(css: &str) -> String {
    if !css.contains("gradient(") {
        return css.to_string();
    }
    if let Some(start) = css.find("rgba(") {
        if let Some(end) = css[start..].find(')') {
            return css[start..start + end + 1].to_string();
        }
    }
    if let Some(start) = css.find('#') {
        let hex: String = css[start..].chars().take(7).collect();
        if hex.len() == 7 {
            return hex;
        }
    }
    "transparent".to_string()
}

/// Shared `fill`/`stroke` attributes.
pub fn paint_attrs(fill: &FillStyle, stroke: &StrokeStyle) -> String {
    let mut out = format!("fill=\"{}\"", escape(&svg_paint(&fill.fill_color)));
    if fill.opacity < 1.0 {
        let _ = write!(out, " fill-opacity=\"{}\"", n(fill.opacity));
    }
    if stroke.is_visible() {
        let _ = write!(
            out,
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape(&stroke.color),
            n(stroke.width)
        );
        if stroke.opacity < 1.0 {
            let _ = write!(out, " stroke-opacity=\"{}\"", n(stroke.opacity));
        }
    } else {
        out.push_str(" stroke=\"none\"");
    }
    out
}

/// Open an SVG element filling a `w`×`h` box.
pub fn svg_open(w: f64, h: f64) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" style=\"position: absolute; left: 0; top: 0; overflow: visible;\">",
        w = n(w),
        h = n(h)
    )
}

/// Render `shape` into a `w`×`h` SVG element.
pub fn render_svg(
    shape: SvgShape,
    adj: &Adjustments,
    w: f64,
    h: f64,
    fill: &FillStyle,
    stroke: &StrokeStyle,
) -> String {
    let paint = paint_attrs(fill, stroke);
    let body = match shape {
        SvgShape::Heart => format!(
            "<path d=\"M{cx},{y0} C{cx},{y1} {x0},{y1} {x0},{y2} C{x0},{y3} {cx},{y4} {cx},{h} C{cx},{y4} {w},{y3} {w},{y2} C{w},{y1} {cx},{y1} {cx},{y0} Z\" {paint}/>",
            cx = n(w / 2.0),
            x0 = 0,
            y0 = n(h * 0.25),
            y1 = n(-h * 0.1),
            y2 = n(h * 0.3),
            y3 = n(h * 0.6),
            y4 = n(h * 0.8),
            w = n(w),
            h = n(h),
            paint = paint,
        ),
        SvgShape::Cloud => cloud(w, h, &paint),
        SvgShape::Teardrop => {
            let a = (adj.get("adj", 100000.0) / PERCENT_UNIT).clamp(0.0, 2.0);
            let tip_x = w / 2.0 + w / 2.0 * a;
            let tip_y = h / 2.0 - h / 2.0 * a;
            format!(
                "<path d=\"M0,{cy} A{rx},{ry} 0 1 0 {cx},0 L{tx},{ty} L{w},{cy} A{rx},{ry} 0 0 1 0,{cy} Z\" {paint}/>",
                cx = n(w / 2.0),
                cy = n(h / 2.0),
                rx = n(w / 2.0),
                ry = n(h / 2.0),
                tx = n(tip_x.min(w)),
                ty = n(tip_y.max(0.0)),
                w = n(w),
                paint = paint,
            )
        }
        SvgShape::Smiley => smiley(adj, w, h, fill, stroke, &paint),
        SvgShape::Cube => cube(adj, w, h, fill, stroke),
        SvgShape::Can => can(adj, w, h, fill, stroke),
        SvgShape::Donut => {
            let t = adj.get("adj", 25000.0) / PERCENT_UNIT * w.min(h);
            let (rx, ry) = (w / 2.0, h / 2.0);
            let (irx, iry) = ((rx - t).max(0.0), (ry - t).max(0.0));
            format!(
                "<path fill-rule=\"evenodd\" d=\"{} {}\" {}/>",
                ellipse_path(rx, ry, rx, ry),
                ellipse_path(rx, ry, irx, iry),
                paint
            )
        }
        SvgShape::NoSmoking => {
            let t = adj.get("adj", 18750.0) / PERCENT_UNIT * w.min(h);
            let (rx, ry) = (w / 2.0, h / 2.0);
            let (irx, iry) = ((rx - t).max(0.0), (ry - t).max(0.0));
            let dx = irx * std::f64::consts::FRAC_1_SQRT_2;
            let dy = iry * std::f64::consts::FRAC_1_SQRT_2;
            format!(
                "<path fill-rule=\"evenodd\" d=\"{} {}\" {}/><line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
                ellipse_path(rx, ry, rx, ry),
                ellipse_path(rx, ry, irx, iry),
                paint,
                n(rx - dx),
                n(ry - dy),
                n(rx + dx),
                n(ry + dy),
                escape(&svg_paint(&fill.fill_color)),
                n(t)
            )
        }
        SvgShape::Moon => {
            let a = (adj.get("adj", 50000.0) / PERCENT_UNIT).clamp(0.0, 0.875);
            let inner = w * a;
            format!(
                "<path d=\"M{w},0 A{w},{ry} 0 0 0 {w},{h} A{ix},{ry} 0 0 1 {w},0 Z\" {paint}/>",
                w = n(w),
                h = n(h),
                ry = n(h / 2.0),
                ix = n((w - inner).max(0.0)),
                paint = paint,
            )
        }
        SvgShape::Sun => sun(adj, w, h, &paint),
    };
    format!("{}{}</svg>", svg_open(w, h), body)
}

fn ellipse_path(cx: f64, cy: f64, rx: f64, ry: f64) -> String {
    format!(
        "M{},{} A{},{} 0 1 0 {},{} A{},{} 0 1 0 {},{} Z",
        n(cx - rx),
        n(cy),
        n(rx),
        n(ry),
        n(cx + rx),
        n(cy),
        n(rx),
        n(ry),
        n(cx - rx),
        n(cy)
    )
}

fn cloud(w: f64, h: f64, paint: &str) -> String {
    // Overlapping lobes as (cx, cy, rx, ry) fractions of the box.
    const LOBES: [(f64, f64, f64, f64); 7] = [
        (0.22, 0.55, 0.2, 0.25),
        (0.35, 0.32, 0.2, 0.25),
        (0.55, 0.25, 0.22, 0.25),
        (0.75, 0.38, 0.2, 0.25),
        (0.8, 0.62, 0.18, 0.22),
        (0.58, 0.74, 0.22, 0.24),
        (0.35, 0.75, 0.2, 0.22),
    ];
    let mut out = format!("<g {}>", paint);
    for (cx, cy, rx, ry) in LOBES {
        let _ = write!(
            out,
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"/>",
            n(cx * w),
            n(cy * h),
            n(rx * w),
            n(ry * h)
        );
    }
    out.push_str("</g>");
    out
}

fn smiley(
    adj: &Adjustments,
    w: f64,
    h: f64,
    fill: &FillStyle,
    stroke: &StrokeStyle,
    paint: &str,
) -> String {
    let feature = if stroke.is_visible() {
        stroke.color.clone()
    } else {
        adjust_brightness(&svg_paint(&fill.fill_color), 0.4)
    };
    // adj ranges -4653..4653 (frown..smile)
    let curve = adj.get("adj", 4653.0) / 4653.0 * 0.1 * h;
    let mouth_y = h * 0.72;
    format!(
        "<ellipse cx=\"{cx}\" cy=\"{cy}\" rx=\"{cx}\" ry=\"{cy}\" {paint}/>\
<ellipse cx=\"{ex1}\" cy=\"{ey}\" rx=\"{er}\" ry=\"{er}\" fill=\"{f}\"/>\
<ellipse cx=\"{ex2}\" cy=\"{ey}\" rx=\"{er}\" ry=\"{er}\" fill=\"{f}\"/>\
<path d=\"M{mx1},{my} Q{cx},{mc} {mx2},{my}\" fill=\"none\" stroke=\"{f}\" stroke-width=\"{sw}\"/>",
        cx = n(w / 2.0),
        cy = n(h / 2.0),
        ex1 = n(w * 0.35),
        ex2 = n(w * 0.65),
        ey = n(h * 0.38),
        er = n(w.min(h) * 0.05),
        mx1 = n(w * 0.3),
        mx2 = n(w * 0.7),
        my = n(mouth_y - curve),
        mc = n(mouth_y + curve),
        sw = n((w.min(h) * 0.03).max(1.0)),
        f = feature,
        paint = paint,
    )
}

fn cube(adj: &Adjustments, w: f64, h: f64, fill: &FillStyle, stroke: &StrokeStyle) -> String {
    let d = (adj.get("adj", 25000.0) / PERCENT_UNIT * w.min(h)).clamp(0.0, w.min(h));
    let base = svg_paint(&fill.fill_color);
    let top = face(fill, &adjust_brightness(&base, 1.2));
    let side = face(fill, &adjust_brightness(&base, 0.8));
    let stroke_attrs = stroke_only(stroke);
    format!(
        "<polygon points=\"0,{d} {fw},{d} {fw},{h} 0,{h}\" {front}/>\
<polygon points=\"0,{d} {d},0 {w},0 {fw},{d}\" {top} {s}/>\
<polygon points=\"{fw},{d} {w},0 {w},{bh} {fw},{h}\" {side} {s}/>",
        d = n(d),
        fw = n(w - d),
        w = n(w),
        h = n(h),
        bh = n(h - d),
        front = paint_attrs(fill, stroke),
        top = top,
        side = side,
        s = stroke_attrs,
    )
}

fn can(adj: &Adjustments, w: f64, h: f64, fill: &FillStyle, stroke: &StrokeStyle) -> String {
    let ry = (adj.get("adj", 25000.0) / PERCENT_UNIT * w.min(h) / 2.0).clamp(0.0, h / 2.0);
    let rx = w / 2.0;
    let base = svg_paint(&fill.fill_color);
    let top = face(fill, &adjust_brightness(&base, 1.2));
    format!(
        "<path d=\"M0,{ry} L0,{by} A{rx},{ry} 0 0 0 {w},{by} L{w},{ry} Z\" {body}/>\
<ellipse cx=\"{rx}\" cy=\"{ry}\" rx=\"{rx}\" ry=\"{ry}\" {top} {s}/>",
        ry = n(ry),
        by = n(h - ry),
        rx = n(rx),
        w = n(w),
        body = paint_attrs(fill, stroke),
        top = top,
        s = stroke_only(stroke),
    )
}

fn sun(adj: &Adjustments, w: f64, h: f64, paint: &str) -> String {
    let ratio = (adj.get("adj", 25000.0) / PERCENT_UNIT).clamp(0.125, 0.46875);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let core = 0.5 - ratio;
    let mut out = format!(
        "<g {}><ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\"/>",
        paint,
        n(cx),
        n(cy),
        n(w * core * 0.8),
        n(h * core * 0.8)
    );
    for i in 0..8 {
        let angle = i as f64 * std::f64::consts::PI / 4.0;
        let spread = 0.12;
        let tip = (cx + cx * angle.cos(), cy + cy * angle.sin());
        let inner = |a: f64| (cx + cx * core * a.cos(), cy + cy * core * a.sin());
        let (l, r) = (inner(angle - spread), inner(angle + spread));
        let _ = write!(
            out,
            "<polygon points=\"{},{} {},{} {},{}\"/>",
            n(l.0),
            n(l.1),
            n(tip.0),
            n(tip.1),
            n(r.0),
            n(r.1)
        );
    }
    out.push_str("</g>");
    out
}

fn face(fill: &FillStyle, color: &str) -> String {
    if fill.opacity < 1.0 {
        format!("fill=\"{}\" fill-opacity=\"{}\"", escape(color), n(fill.opacity))
    } else {
        format!("fill=\"{}\"", escape(color))
    }
}

fn stroke_only(stroke: &StrokeStyle) -> String {
    if stroke.is_visible() {
        format!("stroke=\"{}\" stroke-width=\"{}\"", escape(&stroke.color), n(stroke.width))
    } else {
        "stroke=\"none\"".to_string()
    }
}

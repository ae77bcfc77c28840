//! Doughnut and pie charts as CSS conic gradients.

use super::{chart_container, decorate, legend_slot, palette_color, ChartLayout};
use crate::model::{ChartData, Position};
use crate::render::{DataAttrs, RenderContext, Style};
use crate::theme::ColorContext;
use crate::units::{fmt_num, px};
use std::f64::consts::PI;
use std::fmt::Write as _;

/// Smallest visible gap between slices, in degrees.
const MIN_GAP_DEG: f64 = 0.5;

/// One slice, in degrees clockwise from the first-slice angle.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub start: f64,
    pub end: f64,
    pub value: f64,
    pub color: String,
}

impl Slice {
    /// Angular span in degrees.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }
}

/// Angular width of a slice border of `border_px` on a ring of `radius_px`.
pub fn gap_angle(border_px: f64, radius_px: f64) -> f64 {
    if radius_px <= 0.0 || !border_px.is_finite() {
        return MIN_GAP_DEG;
    }
    (border_px / radius_px * 180.0 / PI).max(MIN_GAP_DEG)
}

/// Lay out slices for `values`, leaving `gap` degrees after each slice.
///
/// Non-positive values get no slice. Returns nothing when the total is not
/// positive. Spans plus gaps always sum to 360°.
pub fn doughnut_slices(values: &[f64], colors: &[String], gap: f64) -> Vec<Slice> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }
    let visible = values.iter().filter(|v| **v > 0.0).count();
    let gap = if visible > 1 { gap.max(0.0) } else { 0.0 };
    let available = (360.0 - visible as f64 * gap).max(0.0);

    let mut slices = Vec::with_capacity(visible);
    let mut angle = 0.0;
    for (i, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        let span = value / total * available;
        let color = colors
            .get(i)
            .cloned()
            .unwrap_or_else(|| palette_color(i).to_string());
        slices.push(Slice {
            start: angle,
            end: angle + span,
            value,
            color,
        });
        angle += span + gap;
    }
    slices
}

/// Slice colors: `c:dPt` overrides, else theme accents in order.
pub fn slice_colors(data: &ChartData, colors: &ColorContext) -> Vec<String> {
    let Some(series) = data.series.first() else {
        return Vec::new();
    };
    (0..series.values.len())
        .map(|i| {
            series
                .point_colors
                .get(i)
                .cloned()
                .flatten()
                .or_else(|| {
                    colors
                        .theme
                        .get(&format!("accent{}", i % 6 + 1))
                        .map(|hex| format!("#{}", hex))
                })
                .unwrap_or_else(|| palette_color(i).to_string())
        })
        .collect()
}

/// CSS `conic-gradient` for the slices; gaps show `gap_color`.
pub fn conic_gradient(slices: &[Slice], first_angle: f64, gap_color: &str) -> String {
    let mut stops = Vec::new();
    let mut cursor = 0.0;
    for slice in slices {
        if slice.start > cursor + 1e-9 {
            stops.push(format!(
                "{} {}deg {}deg",
                gap_color,
                fmt_num(cursor, 3),
                fmt_num(slice.start, 3)
            ));
        }
        stops.push(format!(
            "{} {}deg {}deg",
            slice.color,
            fmt_num(slice.start, 3),
            fmt_num(slice.end, 3)
        ));
        cursor = slice.end;
    }
    if cursor < 360.0 - 1e-9 {
        stops.push(format!("{} {}deg 360deg", gap_color, fmt_num(cursor, 3)));
    }
    format!(
        "conic-gradient(from {}deg, {})",
        fmt_num(first_angle, 3),
        stops.join(", ")
    )
}

/// Render a doughnut (or pie, with no hole). Nothing to draw gives an empty
/// container.
pub fn render_doughnut_chart(
    data: &ChartData,
    pos: &Position,
    attrs: &DataAttrs,
    ctx: &RenderContext,
) -> String {
    let layout = ChartLayout::new(pos.width, pos.height, data.title.is_some(), legend_slot(data, ctx));
    let body = layout.body;
    let diameter = body.width.min(body.height);
    let radius = diameter / 2.0;

    let series = data.series.first();
    let values = series.map(|s| s.values.as_slice()).unwrap_or(&[]);
    let colors = slice_colors(data, ctx.colors);
    let border = series.and_then(|s| s.border.as_ref());
    let gap = border.map(|b| gap_angle(b.width, radius)).unwrap_or(0.0);
    let slices = doughnut_slices(values, &colors, gap);
    if slices.is_empty() {
        tracing::debug!("doughnut chart has no positive values");
        return chart_container(pos, "doughnut", attrs, "");
    }

    let gap_color = border.map(|b| b.color.as_str()).unwrap_or("#FFFFFF");
    let mut ring = Style::new();
    ring.set("position", "absolute")
        .set("left", format!("{}px", px(body.x + (body.width - diameter) / 2.0)))
        .set("top", format!("{}px", px(body.y + (body.height - diameter) / 2.0)))
        .set("width", format!("{}px", px(diameter)))
        .set("height", format!("{}px", px(diameter)))
        .set("border-radius", "50%")
        .set(
            "background",
            conic_gradient(&slices, data.first_slice_angle, gap_color),
        );
    if data.hole_size > 0.0 {
        let hole = fmt_num(data.hole_size, 2);
        let mask = format!(
            "radial-gradient(circle closest-side, transparent {hole}%, #000 {hole}%)"
        );
        ring.set("-webkit-mask", mask.clone()).set("mask", mask);
    }

    let legend = slices_legend(data, &slices);
    let mut inner = decorate(data, &layout, &legend, ctx);
    let _ = write!(
        inner,
        "<div class=\"pptx-doughnut-ring\" data-slices=\"{}\" style=\"{}\"></div>",
        slices.len(),
        ring.to_attr()
    );
    let kind = if data.hole_size > 0.0 { "doughnut" } else { "pie" };
    chart_container(pos, kind, attrs, &inner)
}

fn slices_legend(data: &ChartData, slices: &[Slice]) -> Vec<(String, String)> {
    let categories = data.categories();
    let values = data.series.first().map(|s| s.values.as_slice()).unwrap_or(&[]);
    let mut slice_iter = slices.iter();
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .filter_map(|(i, _)| {
            let slice = slice_iter.next()?;
            let label = categories
                .get(i)
                .filter(|c| !c.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("{}", i + 1));
            Some((label, slice.color.clone()))
        })
        .collect()
}

//! 2D area charts.

use super::bar::{plotted_values, value_ticks};
use super::{
    chart_container, decorate, format_value, legend_slot, svg_body_open, svg_line, svg_text,
    text_width, ChartLayout, Rect, LABEL_FONT,
};
use crate::model::{ChartData, Grouping, Position, TickInfo};
use crate::render::{escape, DataAttrs, RenderContext};
use crate::units::px;
use std::fmt::Write as _;

const AXIS_GAP: f64 = 6.0;
const PLOT_PADDING: f64 = 8.0;
const GRIDLINE_COLOR: &str = "#D9D9D9";

/// Filled outline of one series in plot-local px.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaPolygon {
    pub series: usize,
    pub points: Vec<(f64, f64)>,
    pub color: String,
}

/// X position of category `c` out of `count`.
fn category_x(plot: &Rect, c: usize, count: usize) -> f64 {
    if count <= 1 {
        plot.x + plot.width / 2.0
    } else {
        plot.x + plot.width * c as f64 / (count - 1) as f64
    }
}

/// Polygons for every series, in drawing order.
///
/// Standard areas close against the zero line; stacked areas close against
/// the series below.
pub fn area_polygons(data: &ChartData, ticks: &TickInfo, plot: &Rect) -> Vec<AreaPolygon> {
    let values = plotted_values(data);
    let count = data.category_count();
    if count == 0 {
        return Vec::new();
    }
    let stacked = data.grouping.is_stacked();
    let y_of = |v: f64| plot.y + plot.height - ticks.ratio(v.clamp(ticks.min, ticks.max)) * plot.height;
    let zero = 0.0f64.clamp(ticks.min, ticks.max);

    let mut base = vec![zero; count];
    let mut polygons = Vec::with_capacity(values.len());
    for (si, series) in values.iter().enumerate() {
        let top: Vec<f64> = if stacked {
            series.iter().zip(&base).map(|(v, b)| b + v).collect()
        } else {
            series.clone()
        };
        let bottom: Vec<f64> = if stacked { base.clone() } else { vec![zero; count] };

        let mut points: Vec<(f64, f64)> = (0..count)
            .map(|c| (category_x(plot, c, count), y_of(top[c])))
            .collect();
        points.extend((0..count).rev().map(|c| (category_x(plot, c, count), y_of(bottom[c]))));

        polygons.push(AreaPolygon {
            series: si,
            points,
            color: data.series[si].color.clone(),
        });
        if stacked {
            base = top;
        }
    }
    polygons
}

/// Render an area chart. Degenerate data gives an empty container.
pub fn render_area_chart(
    data: &ChartData,
    pos: &Position,
    attrs: &DataAttrs,
    ctx: &RenderContext,
) -> String {
    if data.is_degenerate() || data.category_count() == 0 {
        tracing::debug!("area chart has no values");
        return chart_container(pos, "area", attrs, "");
    }

    let layout = ChartLayout::new(pos.width, pos.height, data.title.is_some(), legend_slot(data, ctx));
    let ticks = value_ticks(data, ctx.options.tick_count);
    let format_code = data
        .value_axis
        .format_code
        .as_deref()
        .or((data.grouping == Grouping::PercentStacked).then_some("0%"));
    let tick_labels: Vec<String> = ticks.ticks.iter().map(|t| format_value(*t, format_code)).collect();

    let left_band = if data.value_axis.display {
        tick_labels
            .iter()
            .map(|l| text_width(l, LABEL_FONT))
            .fold(0.0, f64::max)
            + AXIS_GAP
    } else {
        0.0
    };
    let bottom_band = if data.category_axis.display {
        LABEL_FONT + AXIS_GAP
    } else {
        0.0
    };
    let body = layout.body;
    let plot = Rect {
        x: left_band + PLOT_PADDING,
        y: PLOT_PADDING,
        width: (body.width - left_band - 2.0 * PLOT_PADDING).max(1.0),
        height: (body.height - bottom_band - 2.0 * PLOT_PADDING).max(1.0),
    };

    let mut svg = svg_body_open(&body);
    for (tick, label) in ticks.ticks.iter().zip(&tick_labels) {
        let y = plot.y + plot.height - ticks.ratio(*tick) * plot.height;
        if data.value_axis.major_gridlines {
            svg_line(&mut svg, plot.x, y, plot.x + plot.width, y, GRIDLINE_COLOR, 0.75);
        }
        if data.value_axis.display {
            svg_text(&mut svg, plot.x - AXIS_GAP, y, "end", &data.value_axis.color, label);
        }
    }

    for polygon in area_polygons(data, &ticks, &plot) {
        let points: Vec<String> = polygon
            .points
            .iter()
            .map(|(x, y)| format!("{},{}", px(*x), px(*y)))
            .collect();
        let _ = write!(
            svg,
            "<polygon points=\"{}\" fill=\"{}\" data-series=\"{}\"/>",
            points.join(" "),
            escape(&polygon.color),
            polygon.series
        );
    }

    if data.category_axis.display {
        let count = data.category_count();
        let categories = data.categories();
        for c in 0..count {
            let label = categories.get(c).map(String::as_str).unwrap_or("");
            if label.is_empty() {
                continue;
            }
            let x = category_x(&plot, c, count);
            let y = plot.y + plot.height + AXIS_GAP + LABEL_FONT / 2.0;
            svg_text(&mut svg, x, y, "middle", &data.category_axis.color, label);
        }
    }
    svg.push_str("</svg>");

    let legend: Vec<(String, String)> = data
        .series
        .iter()
        .map(|s| (s.label.clone(), s.color.clone()))
        .collect();
    let mut inner = decorate(data, &layout, &legend, ctx);
    inner.push_str(&svg);
    chart_container(pos, "area", attrs, &inner)
}

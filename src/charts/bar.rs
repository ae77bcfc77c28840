//! Bar and column charts.

use super::ticks::compute_ticks_with_samples;
use super::{
    chart_container, decorate, format_value, legend_slot, palette_color, svg_body_open, svg_line,
    svg_text, text_width, ChartLayout, Rect, LABEL_FONT,
};
use crate::model::{BarDirection, ChartData, Grouping, Position, SeriesData, TickInfo};
use crate::render::{escape, DataAttrs, RenderContext};
use crate::units::px;
use std::fmt::Write as _;

const AXIS_GAP: f64 = 6.0;
const PLOT_PADDING: f64 = 8.0;
const GRIDLINE_COLOR: &str = "#D9D9D9";
const AXIS_LINE_COLOR: &str = "#BFBFBF";

/// Values drawn when a bar chart has nothing to plot.
pub const SAMPLE_SERIES: [[f64; 4]; 3] = [
    [4.3, 2.5, 3.5, 4.5],
    [2.4, 4.4, 1.8, 2.8],
    [2.0, 2.0, 3.0, 5.0],
];

/// A copy of `base` carrying the sample dataset.
pub fn sample_chart(base: &ChartData) -> ChartData {
    let mut data = base.clone();
    data.series = SAMPLE_SERIES
        .iter()
        .enumerate()
        .map(|(i, values)| SeriesData {
            label: format!("Series {}", i + 1),
            categories: (1..=values.len()).map(|c| format!("Category {}", c)).collect(),
            values: values.to_vec(),
            color: palette_color(i).to_string(),
            point_colors: Vec::new(),
            border: None,
        })
        .collect();
    data.value_axis.major_gridlines = true;
    data
}

/// One bar in plot-local px.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRect {
    pub series: usize,
    pub category: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub value: f64,
    pub color: String,
}

/// Width of one bar inside a category slot.
///
/// `gap_width` and `overlap` are percentages as stored in the part.
pub fn bar_width(slot: f64, series_count: usize, gap_width: f64, overlap: f64) -> f64 {
    let s = series_count.max(1) as f64;
    let ov = overlap / 100.0;
    let g = gap_width / 100.0;
    slot / (s - (s - 1.0) * ov + g)
}

/// Series values as plotted: percent-stacked charts use each category's share.
pub(super) fn plotted_values(data: &ChartData) -> Vec<Vec<f64>> {
    let count = data.category_count();
    let mut values: Vec<Vec<f64>> = data
        .series
        .iter()
        .map(|s| {
            let mut v = s.values.clone();
            v.resize(count, 0.0);
            v
        })
        .collect();
    if data.grouping == Grouping::PercentStacked {
        for c in 0..count {
            let total: f64 = values.iter().map(|s| s[c].abs()).sum();
            if total > 0.0 {
                for series in values.iter_mut() {
                    series[c] /= total;
                }
            }
        }
    }
    values
}

/// Data range on the value axis, after stacking.
pub(super) fn value_range(data: &ChartData, values: &[Vec<f64>]) -> (f64, f64) {
    let count = data.category_count();
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    if data.grouping.is_stacked() {
        for c in 0..count {
            let pos: f64 = values.iter().map(|s| s[c].max(0.0)).sum();
            let neg: f64 = values.iter().map(|s| s[c].min(0.0)).sum();
            hi = hi.max(pos);
            lo = lo.min(neg);
        }
    } else {
        let all = values.iter().flatten().copied();
        lo = all.clone().fold(f64::INFINITY, f64::min);
        hi = all.fold(f64::NEG_INFINITY, f64::max);
        if !lo.is_finite() || !hi.is_finite() {
            return (0.0, 0.0);
        }
    }
    (lo, hi)
}

/// Value ticks for a bar or area chart, after stacking.
pub fn value_ticks(data: &ChartData, desired: usize) -> TickInfo {
    let values = plotted_values(data);
    let (lo, hi) = value_range(data, &values);
    let mut axis = data.value_axis.clone();
    if data.grouping == Grouping::PercentStacked && axis.major_unit.is_none() {
        axis.major_unit = Some(0.1);
    }
    let samples: Vec<f64> = values.iter().flatten().copied().collect();
    compute_ticks_with_samples(&axis, lo, hi, desired, &samples)
}

/// Lay out every bar inside `plot`.
pub fn layout_bars(data: &ChartData, ticks: &TickInfo, plot: &Rect) -> Vec<BarRect> {
    let values = plotted_values(data);
    let count = data.category_count();
    if count == 0 {
        return Vec::new();
    }
    let horizontal = data.bar_direction == BarDirection::Bar;
    let stacked = data.grouping.is_stacked();
    let category_len = if horizontal { plot.height } else { plot.width };
    let value_len = if horizontal { plot.width } else { plot.height };
    let slot = category_len / count as f64;
    let lanes = if stacked { 1 } else { data.series.len() };
    let bw = bar_width(slot, lanes, data.gap_width, data.overlap);
    let step = bw * (1.0 - data.overlap / 100.0);
    let gap = bw * data.gap_width / 100.0 / 2.0;
    let offset = |v: f64| ticks.ratio(v.clamp(ticks.min, ticks.max)) * value_len;

    let mut bars = Vec::new();
    let mut pos_base = vec![0.0; count];
    let mut neg_base = vec![0.0; count];
    for (si, series) in data.series.iter().enumerate() {
        for (c, &value) in values[si].iter().enumerate() {
            let (from, to) = if stacked {
                let base = if value >= 0.0 { &mut pos_base[c] } else { &mut neg_base[c] };
                let from = *base;
                *base += value;
                (from, *base)
            } else {
                (0.0, value)
            };
            let lane = if stacked { 0 } else { si };
            let along = c as f64 * slot + gap + lane as f64 * step;
            let (a, b) = (offset(from.min(to)), offset(from.max(to)));
            let color = series
                .point_colors
                .get(c)
                .cloned()
                .flatten()
                .unwrap_or_else(|| series.color.clone());
            let bar = if horizontal {
                // First category sits at the bottom.
                BarRect {
                    series: si,
                    category: c,
                    x: plot.x + a,
                    y: plot.y + plot.height - along - bw,
                    width: b - a,
                    height: bw,
                    value,
                    color,
                }
            } else {
                BarRect {
                    series: si,
                    category: c,
                    x: plot.x + along,
                    y: plot.y + plot.height - b,
                    width: bw,
                    height: b - a,
                    value,
                    color,
                }
            };
            bars.push(bar);
        }
    }
    bars
}

/// Render a bar/column chart. Degenerate data draws the sample dataset.
pub fn render_bar_chart(
    data: &ChartData,
    pos: &Position,
    attrs: &DataAttrs,
    ctx: &RenderContext,
) -> String {
    let sample;
    let data = if data.is_degenerate() || data.category_count() == 0 {
        tracing::debug!("bar chart has no values, drawing sample data");
        sample = sample_chart(data);
        &sample
    } else {
        data
    };

    let horizontal = data.bar_direction == BarDirection::Bar;
    let layout = ChartLayout::new(pos.width, pos.height, data.title.is_some(), legend_slot(data, ctx));
    let ticks = value_ticks(data, ctx.options.tick_count);
    let format_code = data.value_axis.format_code.as_deref().or(
        (data.grouping == Grouping::PercentStacked).then_some("0%"),
    );
    let tick_labels: Vec<String> = ticks.ticks.iter().map(|t| format_value(*t, format_code)).collect();
    let categories: Vec<String> = (0..data.category_count())
        .map(|c| data.categories().get(c).cloned().unwrap_or_default())
        .collect();

    // Axis label bands inside the body.
    let value_band = if data.value_axis.display {
        if horizontal {
            LABEL_FONT + AXIS_GAP
        } else {
            tick_labels
                .iter()
                .map(|l| text_width(l, LABEL_FONT))
                .fold(0.0, f64::max)
                + AXIS_GAP
        }
    } else {
        0.0
    };
    let category_band = if data.category_axis.display {
        if horizontal {
            categories
                .iter()
                .map(|l| text_width(l, LABEL_FONT))
                .fold(0.0, f64::max)
                + AXIS_GAP
        } else {
            LABEL_FONT + AXIS_GAP
        }
    } else {
        0.0
    };
    let (left_band, bottom_band) = if horizontal {
        (category_band, value_band)
    } else {
        (value_band, category_band)
    };
    let body = layout.body;
    let plot = Rect {
        x: left_band + PLOT_PADDING,
        y: PLOT_PADDING,
        width: (body.width - left_band - 2.0 * PLOT_PADDING).max(1.0),
        height: (body.height - bottom_band - 2.0 * PLOT_PADDING).max(1.0),
    };

    let mut svg = svg_body_open(&body);
    let value_color = data.value_axis.color.as_str();
    for (tick, label) in ticks.ticks.iter().zip(&tick_labels) {
        let r = ticks.ratio(*tick);
        if horizontal {
            let x = plot.x + r * plot.width;
            if data.value_axis.major_gridlines {
                svg_line(&mut svg, x, plot.y, x, plot.y + plot.height, GRIDLINE_COLOR, 0.75);
            }
            if data.value_axis.display {
                svg_text(&mut svg, x, plot.y + plot.height + AXIS_GAP + LABEL_FONT / 2.0, "middle", value_color, label);
            }
        } else {
            let y = plot.y + plot.height - r * plot.height;
            if data.value_axis.major_gridlines {
                svg_line(&mut svg, plot.x, y, plot.x + plot.width, y, GRIDLINE_COLOR, 0.75);
            }
            if data.value_axis.display {
                svg_text(&mut svg, plot.x - AXIS_GAP, y, "end", value_color, label);
            }
        }
    }

    for bar in layout_bars(data, &ticks, &plot) {
        if bar.width <= 0.0 || bar.height <= 0.0 {
            continue;
        }
        let _ = write!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" data-series=\"{}\" data-category=\"{}\"/>",
            px(bar.x),
            px(bar.y),
            px(bar.width),
            px(bar.height),
            escape(&bar.color),
            bar.series,
            bar.category
        );
    }

    // Category axis line at the zero crossing.
    let zero = ticks.ratio(0.0f64.clamp(ticks.min, ticks.max));
    if horizontal {
        let x = plot.x + zero * plot.width;
        svg_line(&mut svg, x, plot.y, x, plot.y + plot.height, AXIS_LINE_COLOR, 1.0);
    } else {
        let y = plot.y + plot.height - zero * plot.height;
        svg_line(&mut svg, plot.x, y, plot.x + plot.width, y, AXIS_LINE_COLOR, 1.0);
    }

    if data.category_axis.display && !categories.is_empty() {
        let color = data.category_axis.color.as_str();
        let n = categories.len() as f64;
        for (c, label) in categories.iter().enumerate() {
            if horizontal {
                let slot = plot.height / n;
                let y = plot.y + plot.height - (c as f64 + 0.5) * slot;
                svg_text(&mut svg, plot.x - AXIS_GAP, y, "end", color, label);
            } else {
                let slot = plot.width / n;
                let x = plot.x + (c as f64 + 0.5) * slot;
                svg_text(&mut svg, x, plot.y + plot.height + AXIS_GAP + LABEL_FONT / 2.0, "middle", color, label);
            }
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
    chart_container(pos, "bar", attrs, &inner)
}

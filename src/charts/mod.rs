//! Chart parts (`c:chartSpace`) rendered as HTML/SVG.
//!
//! Extraction turns the chart XML into [`ChartData`]; each chart family has
//! its own renderer. Values are read from the cached points stored in the
//! part, so no workbook is needed.

pub mod area;
pub mod bar;
pub mod doughnut;
pub mod ticks;

pub use ticks::{compute_value_ticks, detect_step_preference, nice_step};

use crate::color::resolve_color;
use crate::error::{Error, Result};
use crate::model::{
    AxisConfig, BarDirection, ChartData, ChartKind, Grouping, LegendPosition, Position, SeriesBorder,
    SeriesData,
};
use crate::render::{escape, DataAttrs, RenderContext, Style};
use crate::theme::ColorContext;
use crate::units::{emu_attr_px, fmt_num, px};
use crate::xml::XmlNode;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

/// Series colors used when the part declares none.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#4472C4", "#ED7D31", "#A5A5A5", "#FFC000", "#5B9BD5", "#70AD47", "#264478", "#9E480E",
    "#636363", "#997300",
];

/// Height reserved for a chart title.
const TITLE_HEIGHT: f64 = 28.0;
/// Height reserved for a bottom/top legend.
const LEGEND_HEIGHT: f64 = 24.0;
/// Width reserved for a left/right legend.
const LEGEND_WIDTH: f64 = 100.0;

/// Palette color for a series or point index.
pub fn palette_color(index: usize) -> &'static str {
    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
}

/// The plot node of a chart part and its kind.
pub fn detect_kind(chart_space: &XmlNode) -> Option<(ChartKind, &XmlNode)> {
    let plot_area = chart_space.get(&["c:chart", "c:plotArea"])?;
    plot_area
        .children
        .iter()
        .find_map(|c| ChartKind::from_element(c.local_name()).map(|k| (k, c)))
}

/// Points of the first cache (or literal) under `node`, as `(idx, text)`,
/// plus the declared point count.
fn cache_points(node: Option<&XmlNode>) -> (Vec<(usize, String)>, usize) {
    let Some(node) = node else {
        return (Vec::new(), 0);
    };
    let cache = ["c:numCache", "c:strCache", "c:numLit", "c:strLit", "c:multiLvlStrCache"]
        .iter()
        .find_map(|name| node.find(name));
    let Some(cache) = cache else {
        return (Vec::new(), 0);
    };
    let declared = cache
        .child("c:ptCount")
        .and_then(|c| c.attr_i64("val"))
        .filter(|n| *n >= 0)
        .map(|n| n as usize)
        .unwrap_or(0);
    // Multi-level categories keep only the innermost level.
    let level = cache.child("c:lvl").unwrap_or(cache);
    let points = level
        .children_named("c:pt")
        .enumerate()
        .filter_map(|(i, pt)| {
            let idx = pt
                .attr_i64("idx")
                .filter(|i| *i >= 0)
                .map(|i| usize::try_from(i).unwrap_or(usize::MAX))
                .unwrap_or(i);
            if idx >= MAX_POINTS {
                tracing::debug!(idx, "ignoring chart point beyond the point limit");
                return None;
            }
            let text = pt.child("c:v").map(|v| v.text.clone()).unwrap_or_default();
            Some((idx, text))
        })
        .collect();
    (points, declared)
}

/// Upper bound on points per series; damaged parts can declare any count.
const MAX_POINTS: usize = 100_000;

fn slot_count(points: &[(usize, String)], declared: usize) -> usize {
    let by_idx = points.iter().map(|(i, _)| i + 1).max().unwrap_or(0);
    declared.max(by_idx).min(MAX_POINTS)
}

/// Numeric values of a `c:val` (or `c:yVal`) node, aligned by `idx`.
///
/// Missing or unparseable points are exactly `0.0`.
pub fn numeric_values(node: Option<&XmlNode>) -> Vec<f64> {
    let (points, declared) = cache_points(node);
    let mut values = vec![0.0; slot_count(&points, declared)];
    for (idx, text) in points {
        if let Some(slot) = values.get_mut(idx) {
            *slot = text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0);
        }
    }
    values
}

/// Category labels of a `c:cat` node, aligned by `idx`; missing are `""`.
pub fn string_values(node: Option<&XmlNode>) -> Vec<String> {
    let (points, declared) = cache_points(node);
    let mut values = vec![String::new(); slot_count(&points, declared)];
    for (idx, text) in points {
        if let Some(slot) = values.get_mut(idx) {
            *slot = text;
        }
    }
    values
}

fn series_label(ser: &XmlNode, index: usize) -> String {
    let tx = ser.child("c:tx");
    let label = tx
        .and_then(|t| t.child("c:v").map(|v| v.text.clone()))
        .or_else(|| {
            let labels = string_values(tx);
            labels.into_iter().find(|l| !l.is_empty())
        })
        .unwrap_or_default();
    if label.is_empty() {
        format!("Series {}", index + 1)
    } else {
        label
    }
}

fn series_color(sp_pr: Option<&XmlNode>, colors: &ColorContext) -> Option<String> {
    let sp_pr = sp_pr?;
    sp_pr
        .child("a:solidFill")
        .or_else(|| sp_pr.get(&["a:gradFill", "a:gsLst", "a:gs"]))
        .and_then(|f| resolve_color(f, colors))
        .map(|c| c.hex)
}

/// Default outline width (0.75pt).
const DEFAULT_BORDER_EMU: i64 = 9525;

fn series_border(sp_pr: Option<&XmlNode>, colors: &ColorContext) -> Option<SeriesBorder> {
    let ln = sp_pr?.child("a:ln")?;
    let color = resolve_color(ln.child("a:solidFill")?, colors)?;
    Some(SeriesBorder {
        color: color.hex,
        width: emu_attr_px(Some(ln), "w", DEFAULT_BORDER_EMU),
    })
}

/// Read every `c:ser` of a plot node.
pub fn extract_series(plot: &XmlNode, colors: &ColorContext) -> Vec<SeriesData> {
    plot.children_named("c:ser")
        .enumerate()
        .map(|(i, ser)| {
            let values = numeric_values(ser.child("c:val").or_else(|| ser.child("c:yVal")));
            let mut categories = string_values(ser.child("c:cat").or_else(|| ser.child("c:xVal")));
            if !categories.is_empty() && categories.len() < values.len() {
                categories.resize(values.len(), String::new());
            }
            let order = ser
                .child("c:idx")
                .and_then(|n| n.attr_i64("val"))
                .filter(|n| *n >= 0)
                .map(|n| n as usize)
                .unwrap_or(i);
            let color = series_color(ser.child("c:spPr"), colors)
                .unwrap_or_else(|| palette_color(order).to_string());

            let mut point_colors = Vec::new();
            for dpt in ser.children_named("c:dPt") {
                let Some(idx) = dpt.child("c:idx").and_then(|n| n.attr_i64("val")) else {
                    continue;
                };
                let Some(color) = series_color(dpt.child("c:spPr"), colors) else {
                    continue;
                };
                let idx = idx.max(0) as usize;
                if idx < values.len().max(1) {
                    if point_colors.len() <= idx {
                        point_colors.resize(idx + 1, None);
                    }
                    point_colors[idx] = Some(color);
                }
            }

            SeriesData {
                label: series_label(ser, i),
                categories,
                values,
                color,
                point_colors,
                border: series_border(ser.child("c:spPr"), colors),
            }
        })
        .collect()
}

fn axis_config(axis: Option<&XmlNode>, colors: &ColorContext) -> AxisConfig {
    let mut config = AxisConfig::default();
    let Some(axis) = axis else {
        return config;
    };
    let scaling = axis.child("c:scaling");
    config.min = scaling.and_then(|s| s.child("c:min")).and_then(|m| m.attr_f64("val"));
    config.max = scaling.and_then(|s| s.child("c:max")).and_then(|m| m.attr_f64("val"));
    config.major_unit = axis.child("c:majorUnit").and_then(|m| m.attr_f64("val"));
    config.minor_unit = axis.child("c:minorUnit").and_then(|m| m.attr_f64("val"));
    config.format_code = axis
        .child("c:numFmt")
        .and_then(|f| f.attr("formatCode"))
        .filter(|f| !f.eq_ignore_ascii_case("General"))
        .map(str::to_string);
    config.display = axis.child("c:delete").and_then(|d| d.attr_bool("val")) != Some(true);
    config.major_gridlines = axis.child("c:majorGridlines").is_some();
    if let Some(color) = axis
        .get(&["c:txPr", "a:p", "a:pPr", "a:defRPr", "a:solidFill"])
        .and_then(|f| resolve_color(f, colors))
    {
        config.color = color.hex;
    }
    config
}

/// Title text of a chart, if it shows one.
pub fn chart_title(chart: &XmlNode) -> Option<String> {
    if chart.child("c:autoTitleDeleted").and_then(|d| d.attr_bool("val")) == Some(true) {
        return None;
    }
    let title = chart.child("c:title")?;
    let paragraphs: Vec<String> = title
        .descendants_named("a:p")
        .into_iter()
        .map(|p| p.descendants_named("a:t").iter().map(|t| t.text.as_str()).collect())
        .collect();
    let text = paragraphs.join(" ");
    let text = text.trim();
    if text.is_empty() {
        // A title without rich text uses the series name.
        title
            .find("c:v")
            .map(|v| v.text.trim().to_string())
            .filter(|t| !t.is_empty())
    } else {
        Some(text.to_string())
    }
}

/// Extract everything a renderer needs from a chart part.
pub fn extract_chart(chart_space: &XmlNode, colors: &ColorContext) -> Result<ChartData> {
    let chart = chart_space
        .child("c:chart")
        .ok_or_else(|| Error::MissingComponent("c:chart".into()))?;
    let plot_area = chart
        .child("c:plotArea")
        .ok_or_else(|| Error::MissingComponent("c:plotArea".into()))?;
    let (kind, plot) = detect_kind(chart_space).ok_or_else(|| {
        let names: Vec<&str> = plot_area
            .children
            .iter()
            .map(|c| c.local_name())
            .filter(|n| n.ends_with("Chart"))
            .collect();
        Error::UnsupportedChart(format!("chart type {}", names.join(", ")))
    })?;

    let mut data = ChartData::new(kind);
    data.title = chart_title(chart);
    data.series = extract_series(plot, colors);
    data.grouping = plot
        .child("c:grouping")
        .and_then(|g| g.val())
        .map(Grouping::parse)
        .unwrap_or_default();
    if plot.child("c:barDir").and_then(|d| d.val()) == Some("bar") {
        data.bar_direction = BarDirection::Bar;
    }
    if let Some(gap) = plot.child("c:gapWidth").and_then(|g| g.attr_f64("val")) {
        data.gap_width = gap.clamp(0.0, 500.0);
    }
    if let Some(overlap) = plot.child("c:overlap").and_then(|o| o.attr_f64("val")) {
        data.overlap = overlap.clamp(-100.0, 100.0);
    }
    if let Some(hole) = plot.child("c:holeSize").and_then(|h| h.attr_f64("val")) {
        data.hole_size = hole.clamp(10.0, 90.0);
    }
    if kind == ChartKind::Pie {
        data.hole_size = 0.0;
    }
    if let Some(angle) = plot.child("c:firstSliceAng").and_then(|a| a.attr_f64("val")) {
        data.first_slice_angle = angle.rem_euclid(360.0);
    }

    // Category axis first, value axis second, whatever the element names.
    data.category_axis = axis_config(
        plot_area.child("c:catAx").or_else(|| plot_area.child("c:dateAx")),
        colors,
    );
    data.value_axis = axis_config(plot_area.child("c:valAx"), colors);

    if let Some(legend) = chart.child("c:legend") {
        data.show_legend = true;
        data.legend_position = legend
            .child("c:legendPos")
            .and_then(|p| p.val())
            .map(LegendPosition::parse)
            .unwrap_or_default();
    }
    Ok(data)
}

/// Format an axis or data label value.
pub fn format_value(value: f64, format_code: Option<&str>) -> String {
    match format_code {
        Some(code) if code.contains('%') => {
            let decimals = code
                .split_once('.')
                .map(|(_, rest)| rest.chars().take_while(|c| *c == '0').count())
                .unwrap_or(0);
            format!("{}%", fmt_num(value * 100.0, decimals))
        }
        Some(code) if code.contains('.') => {
            let decimals = code
                .split_once('.')
                .map(|(_, rest)| rest.chars().take_while(|c| *c == '0' || *c == '#').count())
                .unwrap_or(0);
            format!("{:.*}", decimals, value)
        }
        _ => fmt_num(value, 6),
    }
}

/// The areas of a chart box after reserving title and legend space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Body (plot + axis labels) in chart-local px
    pub body: Rect,
}

/// A chart-local rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartLayout {
    /// Reserve title and legend bands inside a `width`×`height` box.
    pub fn new(width: f64, height: f64, has_title: bool, legend: Option<LegendPosition>) -> Self {
        let mut body = Rect {
            x: 0.0,
            y: 0.0,
            width,
            height,
        };
        if has_title {
            body.y += TITLE_HEIGHT;
            body.height -= TITLE_HEIGHT;
        }
        match legend {
            Some(LegendPosition::Bottom) => body.height -= LEGEND_HEIGHT,
            Some(LegendPosition::Top) => {
                body.y += LEGEND_HEIGHT;
                body.height -= LEGEND_HEIGHT;
            }
            Some(LegendPosition::Left) => {
                body.x += LEGEND_WIDTH;
                body.width -= LEGEND_WIDTH;
            }
            Some(LegendPosition::Right) => body.width -= LEGEND_WIDTH,
            None => {}
        }
        body.width = body.width.max(1.0);
        body.height = body.height.max(1.0);
        Self {
            width,
            height,
            body,
        }
    }
}

/// Title band markup.
pub fn render_title(title: &str, width: f64) -> String {
    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("left", "0")
        .set("top", "0")
        .set("width", format!("{}px", px(width)))
        .set("height", format!("{}px", px(TITLE_HEIGHT)))
        .set("line-height", format!("{}px", px(TITLE_HEIGHT)))
        .set("text-align", "center")
        .set("font-size", "14px")
        .set("color", "#595959");
    format!(
        "<div class=\"pptx-chart-title\" style=\"{}\">{}</div>",
        style.to_attr(),
        escape(title)
    )
}

/// Legend markup for `(label, color)` entries.
pub fn render_legend(entries: &[(String, String)], position: LegendPosition, layout: &ChartLayout) -> String {
    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("display", "flex")
        .set("gap", "4px 12px")
        .set("font-size", "11px")
        .set("color", "#595959");
    match position {
        LegendPosition::Bottom | LegendPosition::Top => {
            let top = if position == LegendPosition::Top {
                layout.body.y - LEGEND_HEIGHT
            } else {
                layout.body.y + layout.body.height
            };
            style
                .set("left", "0")
                .set("top", format!("{}px", px(top)))
                .set("width", format!("{}px", px(layout.width)))
                .set("height", format!("{}px", px(LEGEND_HEIGHT)))
                .set("justify-content", "center")
                .set("align-items", "center")
                .set("flex-wrap", "wrap");
        }
        LegendPosition::Left | LegendPosition::Right => {
            let left = if position == LegendPosition::Left {
                0.0
            } else {
                layout.body.x + layout.body.width
            };
            style
                .set("left", format!("{}px", px(left)))
                .set("top", format!("{}px", px(layout.body.y)))
                .set("width", format!("{}px", px(LEGEND_WIDTH)))
                .set("height", format!("{}px", px(layout.body.height)))
                .set("flex-direction", "column")
                .set("justify-content", "center");
        }
    }
    let mut html = format!("<div class=\"pptx-chart-legend\" style=\"{}\">", style.to_attr());
    for (label, color) in entries {
        let _ = write!(
            html,
            "<span class=\"pptx-legend-entry\" style=\"display: inline-flex; align-items: center; gap: 4px;\"><span style=\"display: inline-block; width: 8px; height: 8px; background: {};\"></span>{}</span>",
            escape(color),
            escape(label)
        );
    }
    html.push_str("</div>");
    html
}

/// Positioned container wrapping a chart body.
pub fn chart_container(pos: &Position, kind: &str, attrs: &DataAttrs, inner: &str) -> String {
    let mut style = Style::positioned(pos);
    style.set("font-family", "Calibri, Arial, sans-serif");
    format!(
        "<div class=\"pptx-chart pptx-chart-{}\"{} style=\"{}\">{}</div>",
        kind,
        attrs.render(),
        style.to_attr(),
        inner
    )
}

/// Render a chart part into a positioned fragment.
///
/// Unsupported chart types and parts without a plot area return an error;
/// callers turn it into an inline placeholder.
pub fn render_chart(
    chart_space: &XmlNode,
    pos: &Position,
    attrs: &DataAttrs,
    ctx: &RenderContext,
) -> Result<String> {
    let data = extract_chart(chart_space, ctx.colors)?;
    tracing::debug!(kind = ?data.kind, series = data.series.len(), "rendering chart");
    Ok(match data.kind {
        ChartKind::Bar => bar::render_bar_chart(&data, pos, attrs, ctx),
        ChartKind::Doughnut | ChartKind::Pie => doughnut::render_doughnut_chart(&data, pos, attrs, ctx),
        ChartKind::Area => area::render_area_chart(&data, pos, attrs, ctx),
    })
}

/// Shared title + legend chrome around a chart body.
pub(crate) fn decorate(
    data: &ChartData,
    layout: &ChartLayout,
    legend_entries: &[(String, String)],
    ctx: &RenderContext,
) -> String {
    let mut html = String::new();
    if let Some(title) = &data.title {
        html.push_str(&render_title(title, layout.width));
    }
    if data.show_legend && ctx.options.include_legend && !legend_entries.is_empty() {
        html.push_str(&render_legend(legend_entries, data.legend_position, layout));
    }
    html
}

/// Font size of axis and data labels.
pub(crate) const LABEL_FONT: f64 = 10.0;

/// Approximate rendered width of a label, counting wide glyphs double.
pub(crate) fn text_width(text: &str, font_px: f64) -> f64 {
    UnicodeWidthStr::width(text) as f64 * font_px * 0.6
}

/// Append an SVG `<text>` label.
pub(crate) fn svg_text(out: &mut String, x: f64, y: f64, anchor: &str, color: &str, text: &str) {
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" text-anchor=\"{}\" dominant-baseline=\"middle\" font-size=\"{}\" fill=\"{}\">{}</text>",
        px(x),
        px(y),
        anchor,
        px(LABEL_FONT),
        escape(color),
        escape(text)
    );
}

/// Append a 1-unit SVG line.
pub(crate) fn svg_line(out: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
    let _ = write!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        px(x1),
        px(y1),
        px(x2),
        px(y2),
        escape(color),
        px(width)
    );
}

/// Open an SVG element covering `rect` inside the chart container.
pub(crate) fn svg_body_open(rect: &Rect) -> String {
    format!(
        "<svg class=\"pptx-chart-body\" xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" style=\"position: absolute; left: {x}px; top: {y}px; overflow: visible;\">",
        w = px(rect.width),
        h = px(rect.height),
        x = px(rect.x),
        y = px(rect.y)
    )
}

/// Legend position to reserve, honoring options.
pub(crate) fn legend_slot(data: &ChartData, ctx: &RenderContext) -> Option<LegendPosition> {
    (data.show_legend && ctx.options.include_legend).then_some(data.legend_position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    const BAR_XML: &str = r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">
      <c:chart>
        <c:title><c:tx><c:rich><a:p><a:r><a:t>Sales</a:t></a:r></a:p></c:rich></c:tx></c:title>
        <c:autoTitleDeleted val="0"/>
        <c:plotArea>
          <c:barChart>
            <c:barDir val="col"/><c:grouping val="clustered"/>
            <c:ser>
              <c:idx val="0"/><c:order val="0"/>
              <c:tx><c:strRef><c:strCache><c:ptCount val="1"/><c:pt idx="0"><c:v>East</c:v></c:pt></c:strCache></c:strRef></c:tx>
              <c:spPr><a:solidFill><a:srgbClr val="112233"/></a:solidFill></c:spPr>
              <c:cat><c:strRef><c:strCache><c:ptCount val="4"/>
                <c:pt idx="0"><c:v>Q1</c:v></c:pt><c:pt idx="1"><c:v>Q2</c:v></c:pt><c:pt idx="3"><c:v>Q4</c:v></c:pt>
              </c:strCache></c:strRef></c:cat>
              <c:val><c:numRef><c:numCache><c:ptCount val="4"/>
                <c:pt idx="0"><c:v>4.3</c:v></c:pt><c:pt idx="1"><c:v>oops</c:v></c:pt><c:pt idx="3"><c:v>4.5</c:v></c:pt>
              </c:numCache></c:numRef></c:val>
            </c:ser>
            <c:gapWidth val="150"/><c:overlap val="-27"/>
          </c:barChart>
          <c:catAx><c:axId val="1"/><c:delete val="0"/></c:catAx>
          <c:valAx><c:axId val="2"/><c:majorGridlines/><c:numFmt formatCode="General" sourceLinked="1"/></c:valAx>
        </c:plotArea>
        <c:legend><c:legendPos val="r"/></c:legend>
      </c:chart>
    </c:chartSpace>"#;

    #[test]
    fn test_extract_bar() {
        let space = parse(BAR_XML).unwrap();
        let data = extract_chart(&space, &ColorContext::default()).unwrap();
        assert_eq!(data.kind, ChartKind::Bar);
        assert_eq!(data.title.as_deref(), Some("Sales"));
        assert_eq!(data.series.len(), 1);
        let series = &data.series[0];
        assert_eq!(series.label, "East");
        assert_eq!(series.color, "#112233");
        assert_eq!(series.values, vec![4.3, 0.0, 0.0, 4.5]);
        assert_eq!(series.categories, vec!["Q1", "Q2", "", "Q4"]);
        assert_eq!(data.overlap, -27.0);
        assert!(data.value_axis.major_gridlines);
        assert_eq!(data.value_axis.format_code, None);
        assert!(data.show_legend);
        assert_eq!(data.legend_position, LegendPosition::Right);
    }

    #[test]
    fn test_value_safety_lengths() {
        let val = parse(
            r#"<c:val><c:numRef><c:numCache><c:ptCount val="3"/><c:pt idx="0"><c:v>NaN</c:v></c:pt><c:pt idx="1"/><c:pt idx="2"><c:v>inf</c:v></c:pt></c:numCache></c:numRef></c:val>"#,
        )
        .unwrap();
        assert_eq!(numeric_values(Some(&val)), vec![0.0, 0.0, 0.0]);
        assert!(numeric_values(None).is_empty());
    }

    #[test]
    fn test_out_of_range_point_index() {
        let val = parse(
            r#"<c:val><c:numRef><c:numCache><c:ptCount val="2"/><c:pt idx="0"><c:v>1</c:v></c:pt><c:pt idx="9223372036854775806"><c:v>2</c:v></c:pt><c:pt idx="1"><c:v>3</c:v></c:pt></c:numCache></c:numRef></c:val>"#,
        )
        .unwrap();
        assert_eq!(numeric_values(Some(&val)), vec![1.0, 3.0]);

        let cat = parse(
            r#"<c:cat><c:strRef><c:strCache><c:ptCount val="999999999"/><c:pt idx="100000"><c:v>far</c:v></c:pt><c:pt idx="0"><c:v>Q1</c:v></c:pt></c:strCache></c:strRef></c:cat>"#,
        )
        .unwrap();
        let labels = string_values(Some(&cat));
        assert_eq!(labels.len(), MAX_POINTS);
        assert_eq!(labels[0], "Q1");
        assert!(!labels.contains(&"far".to_string()));
    }

    #[test]
    fn test_missing_plot_area() {
        let space = parse(r#"<c:chartSpace><c:chart/></c:chartSpace>"#).unwrap();
        assert!(matches!(
            extract_chart(&space, &ColorContext::default()),
            Err(Error::MissingComponent(_))
        ));
    }

    #[test]
    fn test_unsupported_kind() {
        let space = parse(
            r#"<c:chartSpace><c:chart><c:plotArea><c:radarChart/></c:plotArea></c:chart></c:chartSpace>"#,
        )
        .unwrap();
        let err = extract_chart(&space, &ColorContext::default()).unwrap_err();
        assert!(err.to_string().contains("radarChart"));
    }

    #[test]
    fn test_palette_fallback_uses_series_index() {
        let space = parse(
            r#"<c:chartSpace><c:chart><c:plotArea><c:areaChart>
              <c:ser><c:idx val="0"/><c:val><c:numLit><c:pt idx="0"><c:v>1</c:v></c:pt></c:numLit></c:val></c:ser>
              <c:ser><c:idx val="1"/><c:val><c:numLit><c:pt idx="0"><c:v>2</c:v></c:pt></c:numLit></c:val></c:ser>
            </c:areaChart></c:plotArea></c:chart></c:chartSpace>"#,
        )
        .unwrap();
        let data = extract_chart(&space, &ColorContext::default()).unwrap();
        assert_eq!(data.series[0].color, "#4472C4");
        assert_eq!(data.series[1].color, "#ED7D31");
        assert_eq!(data.series[1].label, "Series 2");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.25, Some("0%")), "25%");
        assert_eq!(format_value(0.125, Some("0.0%")), "12.5%");
        assert_eq!(format_value(3.0, Some("0.00")), "3.00");
        assert_eq!(format_value(2.5, None), "2.5");
    }

    #[test]
    fn test_layout_reserves_bands() {
        let layout = ChartLayout::new(400.0, 300.0, true, Some(LegendPosition::Bottom));
        assert_eq!(layout.body.y, TITLE_HEIGHT);
        assert_eq!(layout.body.height, 300.0 - TITLE_HEIGHT - LEGEND_HEIGHT);
        let side = ChartLayout::new(400.0, 300.0, false, Some(LegendPosition::Left));
        assert_eq!(side.body.x, LEGEND_WIDTH);
    }
}

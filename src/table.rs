//! Tables (`a:tbl` inside a `p:graphicFrame`).

use crate::color::resolve_color;
use crate::model::{Position, StrokeStyle};
use crate::render::{DataAttrs, RenderContext, Style};
use crate::shape::fill::fill_from_properties;
use crate::shape::{css_border, css_paint};
use crate::text::{has_text, render_paragraphs};
use crate::units::{emu_to_px, px};
use crate::xml::XmlNode;
use std::fmt::Write as _;

/// Default left/right cell margin (0.1 in).
const DEFAULT_LR_MARGIN_EMU: i64 = 91440;
/// Default top/bottom cell margin (0.05 in).
const DEFAULT_TB_MARGIN_EMU: i64 = 45720;

/// Vertical alignment of cell content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    fn parse(anchor: Option<&str>) -> Self {
        match anchor {
            Some("ctr") => VerticalAlignment::Middle,
            Some("b") => VerticalAlignment::Bottom,
            _ => VerticalAlignment::Top,
        }
    }

    fn css(&self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Middle => "middle",
            VerticalAlignment::Bottom => "bottom",
        }
    }
}

/// One `a:tc` that starts a cell (merged continuations are dropped).
#[derive(Debug, Clone)]
pub struct TableCell<'a> {
    pub col: usize,
    pub col_span: usize,
    pub row_span: usize,
    pub vertical_alignment: VerticalAlignment,
    pub node: &'a XmlNode,
}

/// Column widths, row heights, and the origin cells of a table.
#[derive(Debug, Clone, Default)]
pub struct TableGrid<'a> {
    pub columns: Vec<f64>,
    pub rows: Vec<f64>,
    pub cells: Vec<Vec<TableCell<'a>>>,
}

impl TableGrid<'_> {
    /// Total width of the grid columns in px.
    pub fn width(&self) -> f64 {
        self.columns.iter().sum()
    }

    /// Total height of the rows in px.
    pub fn height(&self) -> f64 {
        self.rows.iter().sum()
    }
}

fn span_attr(node: &XmlNode, attr: &str) -> usize {
    node.attr_i64(attr).filter(|v| *v > 1).map(|v| v as usize).unwrap_or(1)
}

/// Read grid and cells from an `a:tbl`.
pub fn table_grid(tbl: &XmlNode) -> TableGrid<'_> {
    let columns = tbl
        .child("a:tblGrid")
        .map(|g| {
            g.children_named("a:gridCol")
                .map(|c| emu_to_px(c.attr_i64("w").unwrap_or(0).max(0)))
                .collect()
        })
        .unwrap_or_default();

    let mut rows = Vec::new();
    let mut cells = Vec::new();
    for tr in tbl.children_named("a:tr") {
        rows.push(emu_to_px(tr.attr_i64("h").unwrap_or(0).max(0)));
        let mut row = Vec::new();
        for (col, tc) in tr.children_named("a:tc").enumerate() {
            if tc.attr_bool("hMerge") == Some(true) || tc.attr_bool("vMerge") == Some(true) {
                continue;
            }
            row.push(TableCell {
                col,
                col_span: span_attr(tc, "gridSpan"),
                row_span: span_attr(tc, "rowSpan"),
                vertical_alignment: VerticalAlignment::parse(
                    tc.child("a:tcPr").and_then(|p| p.attr("anchor")),
                ),
                node: tc,
            });
        }
        cells.push(row);
    }
    TableGrid { columns, rows, cells }
}

/// Border of one cell edge (`a:lnL`, `a:lnR`, `a:lnT`, `a:lnB`).
fn edge_stroke(ln: &XmlNode, ctx: &RenderContext) -> Option<StrokeStyle> {
    if ln.child("a:noFill").is_some() {
        return None;
    }
    let color = ln
        .child("a:solidFill")
        .and_then(|f| resolve_color(f, ctx.colors))?;
    let mut stroke = StrokeStyle {
        color: color.hex,
        opacity: color.alpha,
        width: emu_to_px(ln.attr_i64("w").unwrap_or(12700)),
        ..Default::default()
    };
    if let Some(dash) = ln.child("a:prstDash").and_then(|d| d.val()) {
        stroke.dash = dash.to_string();
    }
    stroke.is_visible().then_some(stroke)
}

fn cell_style(cell: &TableCell, ctx: &RenderContext) -> Style {
    let tc_pr = cell.node.child("a:tcPr");
    let margin = |attr: &str, default: i64| {
        px(emu_to_px(tc_pr.and_then(|p| p.attr_i64(attr)).unwrap_or(default)))
    };

    let mut style = Style::new();
    style
        .set(
            "padding",
            format!(
                "{}px {}px {}px {}px",
                margin("marT", DEFAULT_TB_MARGIN_EMU),
                margin("marR", DEFAULT_LR_MARGIN_EMU),
                margin("marB", DEFAULT_TB_MARGIN_EMU),
                margin("marL", DEFAULT_LR_MARGIN_EMU)
            ),
        )
        .set("vertical-align", cell.vertical_alignment.css())
        .set("overflow", "hidden");

    if let Some(props) = tc_pr {
        if let Some(fill) = fill_from_properties(props, ctx.colors).filter(|f| f.is_visible()) {
            style.set("background", css_paint(&fill.fill_color, fill.opacity));
        }
        for (tag, side) in [
            ("a:lnL", "border-left"),
            ("a:lnR", "border-right"),
            ("a:lnT", "border-top"),
            ("a:lnB", "border-bottom"),
        ] {
            if let Some(stroke) = props.child(tag).and_then(|ln| edge_stroke(ln, ctx)) {
                style.set(side, css_border(&stroke));
            }
        }
    }
    style
}

/// Render a table frame placed at `pos`.
pub fn render_table(tbl: &XmlNode, pos: &Position, attrs: &DataAttrs, ctx: &RenderContext) -> String {
    let grid = table_grid(tbl);
    let table_width = if grid.columns.is_empty() { pos.width } else { grid.width() };

    let mut html = String::new();
    let _ = write!(
        html,
        "<table style=\"border-collapse: collapse; table-layout: fixed; width: {}px;\">",
        px(table_width)
    );
    if !grid.columns.is_empty() {
        html.push_str("<colgroup>");
        for width in &grid.columns {
            let _ = write!(html, "<col style=\"width: {}px;\">", px(*width));
        }
        html.push_str("</colgroup>");
    }

    for (height, row) in grid.rows.iter().zip(&grid.cells) {
        let _ = write!(html, "<tr style=\"height: {}px;\">", px(*height));
        for cell in row {
            html.push_str("<td");
            if cell.col_span > 1 {
                let _ = write!(html, " colspan=\"{}\"", cell.col_span);
            }
            if cell.row_span > 1 {
                let _ = write!(html, " rowspan=\"{}\"", cell.row_span);
            }
            let _ = write!(html, " style=\"{}\">", cell_style(cell, ctx).to_attr());
            if let Some(body) = cell.node.child("a:txBody").filter(|b| has_text(b)) {
                html.push_str(&render_paragraphs(body, ctx.colors, None));
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    let style = Style::positioned(pos);
    format!(
        "<div class=\"pptx-table\"{} data-rows=\"{}\" data-cols=\"{}\" style=\"{}\">{}</div>",
        attrs.render(),
        grid.rows.len(),
        grid.columns.len(),
        style.to_attr(),
        html
    )
}

/// Plain text of every cell, row by row, tab separated.
pub fn table_text(tbl: &XmlNode) -> String {
    table_grid(tbl)
        .cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|c| {
                    c.node
                        .child("a:txBody")
                        .map(crate::text::body_text)
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NoParts, RenderOptions};
    use crate::theme::ColorContext;
    use crate::xml::parse;

    const TABLE: &str = r#"<a:tbl>
        <a:tblPr firstRow="1"/>
        <a:tblGrid><a:gridCol w="1270000"/><a:gridCol w="1270000"/><a:gridCol w="635000"/></a:tblGrid>
        <a:tr h="381000">
          <a:tc gridSpan="2"><a:txBody><a:bodyPr/><a:p><a:r><a:t>Header</a:t></a:r></a:p></a:txBody>
            <a:tcPr anchor="ctr"><a:lnB w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:lnB>
            <a:solidFill><a:srgbClr val="4472C4"/></a:solidFill></a:tcPr></a:tc>
          <a:tc hMerge="1"><a:txBody><a:bodyPr/><a:p/></a:txBody><a:tcPr/></a:tc>
          <a:tc rowSpan="2"><a:txBody><a:bodyPr/><a:p><a:r><a:t>Tall</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc>
        </a:tr>
        <a:tr h="381000">
          <a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>A &amp; B</a:t></a:r></a:p></a:txBody><a:tcPr marL="0"/></a:tc>
          <a:tc><a:txBody><a:bodyPr/><a:p/></a:txBody><a:tcPr><a:noFill/></a:tcPr></a:tc>
          <a:tc vMerge="1"><a:txBody><a:bodyPr/><a:p/></a:txBody><a:tcPr/></a:tc>
        </a:tr>
      </a:tbl>"#;

    fn render(xml: &str) -> String {
        let tbl = parse(xml).unwrap();
        let colors = ColorContext::default();
        let options = RenderOptions::default();
        let ctx = RenderContext::new(&colors, &options, &NoParts);
        render_table(&tbl, &Position::new(10.0, 20.0, 250.0, 60.0), &DataAttrs::default(), &ctx)
    }

    #[test]
    fn test_grid_and_merges() {
        let tbl = parse(TABLE).unwrap();
        let grid = table_grid(&tbl);
        assert_eq!(grid.columns, vec![100.0, 100.0, 50.0]);
        assert_eq!(grid.rows, vec![30.0, 30.0]);
        assert_eq!(grid.width(), 250.0);
        assert_eq!(grid.cells[0].len(), 2);
        assert_eq!(grid.cells[0][0].col_span, 2);
        assert_eq!(grid.cells[0][1].col, 2);
        assert_eq!(grid.cells[0][1].row_span, 2);
        assert_eq!(grid.cells[1].len(), 2);
        assert_eq!(grid.cells[0][0].vertical_alignment, VerticalAlignment::Middle);
    }

    #[test]
    fn test_render_table() {
        let html = render(TABLE);
        assert!(html.starts_with("<div class=\"pptx-table\" data-rows=\"2\" data-cols=\"3\""));
        assert!(html.contains("left: 10px; top: 20px;"));
        assert!(html.contains("<col style=\"width: 100px;\">"));
        assert!(html.contains("<td colspan=\"2\""));
        assert!(html.contains("<td rowspan=\"2\""));
        assert!(html.contains("background: #4472C4;"));
        assert!(html.contains("border-bottom: 1px solid #000000;"));
        assert!(html.contains("vertical-align: middle;"));
        assert!(html.contains("padding: 3.6px 7.2px 3.6px 0px;"));
        assert!(html.contains("A &amp; B"));
        assert_eq!(html.matches("<td").count(), 4);
    }

    #[test]
    fn test_table_text() {
        let tbl = parse(TABLE).unwrap();
        assert_eq!(table_text(&tbl), "Header\tTall\nA & B\t");
    }

    #[test]
    fn test_grid_without_columns_uses_frame_width() {
        let html = render(r#"<a:tbl><a:tr h="0"><a:tc><a:txBody><a:p/></a:txBody></a:tc></a:tr></a:tbl>"#);
        assert!(html.contains("width: 250px;"));
        assert!(!html.contains("<colgroup>"));
    }
}

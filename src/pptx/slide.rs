//! Slide shape trees and the converted presentation model.

use crate::charts::render_chart;
use crate::color::resolve_color;
use crate::container::CoreProperties;
use crate::image::render_picture;
use crate::model::Position;
use crate::render::{error_placeholder, escape, RenderContext};
use crate::shape::fill::fill_from_properties;
use crate::shape::position::position_from_xfrm;
use crate::shape::{
    css_paint, data_attrs, element_position, render_connector, render_shape,
    GroupTransform,
};
use crate::table::{render_table, table_text};
use crate::text::body_text;
use crate::theme::ColorContext;
use crate::units::px;
use crate::xml::XmlNode;
use serde::Serialize;
use std::fmt::Write as _;

/// One converted slide.
#[derive(Debug, Clone, Serialize)]
pub struct Slide {
    /// 1-based position in the deck
    pub index: usize,
    /// Package path of the slide part
    pub part: String,
    /// `p:cSld/@name`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Slide is hidden in the slide show (`show="0"`)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
    /// Positioned HTML fragment (`<section class="pptx-slide">`)
    pub html: String,
    /// Plain text of shapes and tables, in drawing order
    pub text: String,
}

/// A converted presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Presentation {
    /// Slide width in px
    pub width: f64,
    /// Slide height in px
    pub height: f64,
    pub properties: CoreProperties,
    pub slides: Vec<Slide>,
    #[serde(skip)]
    pub(crate) standalone: bool,
    #[serde(skip)]
    pub(crate) slide_gap: f64,
}

impl Presentation {
    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slide fragments back to back.
    pub fn to_fragments(&self) -> String {
        self.slides
            .iter()
            .map(|s| s.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Complete HTML document with every slide stacked vertically.
    pub fn to_document(&self) -> String {
        let title = self.properties.title.as_deref().unwrap_or("Presentation");
        let gap = px(self.slide_gap);
        let mut html = String::new();
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n\
             body {{ margin: 0; background: #E7E6E6; }}\n\
             .pptx-deck {{ display: flex; flex-direction: column; align-items: center; gap: {gap}px; padding: {gap}px 0; }}\n\
             .pptx-slide {{ flex: none; box-shadow: 0 1px 4px rgba(0, 0, 0, 0.3); font-family: Calibri, Arial, sans-serif; }}\n\
             .pptx-slide p {{ margin: 0; }}\n\
             </style>\n</head>\n<body>\n<div class=\"pptx-deck\">\n",
            escape(title)
        );
        for slide in &self.slides {
            html.push_str(&slide.html);
            html.push('\n');
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    /// Output as configured: a standalone document or bare fragments.
    pub fn to_html(&self) -> String {
        if self.standalone {
            self.to_document()
        } else {
            self.to_fragments()
        }
    }

    /// Plain text of every slide, separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.slides
            .iter()
            .map(|s| s.text.as_str())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Placeholder geometry inherited from layouts and masters.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    entries: Vec<PlaceholderEntry>,
}

#[derive(Debug, Clone)]
struct PlaceholderEntry {
    kind: String,
    idx: Option<String>,
    pos: Position,
}

/// `p:nvPr/p:ph` of a slide element.
pub fn placeholder(element: &XmlNode) -> Option<&XmlNode> {
    element
        .children
        .iter()
        .find(|c| c.local_name().starts_with("nv"))
        .and_then(|nv| nv.get(&["p:nvPr", "p:ph"]))
}

fn placeholder_kind(ph: &XmlNode) -> &str {
    match ph.attr("type").unwrap_or("body") {
        "ctrTitle" => "title",
        "subTitle" | "obj" => "body",
        other => other,
    }
}

impl Placeholders {
    /// Collect positioned placeholders of a layout or master shape tree.
    pub fn collect(sp_tree: &XmlNode) -> Self {
        let entries = sp_tree
            .children
            .iter()
            .filter_map(|element| {
                let ph = placeholder(element)?;
                let xfrm = crate::shape::position::element_xfrm(element)?;
                Some(PlaceholderEntry {
                    kind: placeholder_kind(ph).to_string(),
                    idx: ph.attr("idx").map(str::to_string),
                    pos: position_from_xfrm(Some(xfrm)),
                })
            })
            .collect();
        Self { entries }
    }

    /// Append entries from a lower-priority source (layout first, then master).
    pub fn extend(&mut self, other: Placeholders) {
        self.entries.extend(other.entries);
    }

    /// Inherited position for a `p:ph`: index match first, then type.
    pub fn lookup(&self, ph: &XmlNode) -> Option<Position> {
        let kind = placeholder_kind(ph);
        ph.attr("idx")
            .and_then(|idx| {
                self.entries
                    .iter()
                    .find(|e| e.idx.as_deref() == Some(idx))
            })
            .or_else(|| self.entries.iter().find(|e| e.kind == kind))
            .map(|e| e.pos)
    }

    /// Number of collected placeholders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no placeholder was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks a `p:spTree` and renders its elements.
pub struct ShapeTreeRenderer<'a> {
    ctx: &'a RenderContext<'a>,
    placeholders: &'a Placeholders,
    skip_placeholders: bool,
}

impl<'a> ShapeTreeRenderer<'a> {
    pub fn new(ctx: &'a RenderContext<'a>, placeholders: &'a Placeholders) -> Self {
        Self {
            ctx,
            placeholders,
            skip_placeholders: false,
        }
    }

    /// Leave out placeholders (layout and master layers only show decoration).
    pub fn decoration_only(mut self) -> Self {
        self.skip_placeholders = true;
        self
    }

    /// Render every element of a shape tree in document order.
    pub fn render_tree(&self, sp_tree: &XmlNode) -> String {
        self.render_children(sp_tree, &GroupTransform::default())
    }

    fn render_children(&self, parent: &XmlNode, transform: &GroupTransform) -> String {
        parent
            .children
            .iter()
            .map(|element| self.render_element(element, transform))
            .collect()
    }

    fn position(&self, element: &XmlNode, transform: &GroupTransform) -> Position {
        let own = crate::shape::position::element_xfrm(element)
            .filter(|x| x.child("a:off").is_some() || x.child("a:ext").is_some())
            .map(|x| position_from_xfrm(Some(x)));
        let pos = own
            .or_else(|| placeholder(element).and_then(|ph| self.placeholders.lookup(ph)))
            .unwrap_or_else(|| element_position(element));
        transform.apply(&pos)
    }

    /// Render one slide element.
    pub fn render_element(&self, element: &XmlNode, transform: &GroupTransform) -> String {
        if self.skip_placeholders && placeholder(element).is_some() {
            return String::new();
        }
        match element.local_name() {
            "sp" => render_shape(element, &self.position(element, transform), self.ctx),
            "cxnSp" => render_connector(element, &self.position(element, transform), self.ctx),
            "pic" => render_picture(element, &self.position(element, transform), self.ctx),
            "graphicFrame" => self.render_graphic_frame(element, &self.position(element, transform)),
            "grpSp" => {
                let group = GroupTransform::from_xfrm(element.get(&["p:grpSpPr", "a:xfrm"]));
                self.render_children(element, &transform.then(&group))
            }
            "AlternateContent" => element
                .child("mc:Fallback")
                .or_else(|| element.child("mc:Choice"))
                .map(|branch| self.render_children(branch, transform))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }

    fn render_graphic_frame(&self, element: &XmlNode, pos: &Position) -> String {
        let Some(data) = element.get(&["a:graphic", "a:graphicData"]) else {
            return String::new();
        };
        if let Some(chart_ref) = data.child("c:chart") {
            let rel_id = chart_ref.attr("r:id");
            let attrs = data_attrs(element, rel_id);
            let Some(chart_space) = rel_id.and_then(|id| self.ctx.parts.chart(id)) else {
                tracing::warn!(rel_id = rel_id.unwrap_or_default(), "chart part not found");
                return error_placeholder(Some(pos), "chart", "chart part not found");
            };
            return render_chart(&chart_space, pos, &attrs, self.ctx).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "chart skipped");
                error_placeholder(Some(pos), "chart", &err.to_string())
            });
        }
        if let Some(tbl) = data.child("a:tbl") {
            return render_table(tbl, pos, &data_attrs(element, None), self.ctx);
        }
        tracing::debug!(
            uri = data.attr("uri").unwrap_or_default(),
            "unsupported graphic frame content"
        );
        String::new()
    }
}

/// Plain text of a shape tree: text bodies and table cells.
pub fn tree_text(sp_tree: &XmlNode) -> String {
    let mut lines = Vec::new();
    collect_text(sp_tree, &mut lines);
    lines.join("\n")
}

fn collect_text(parent: &XmlNode, lines: &mut Vec<String>) {
    for element in &parent.children {
        match element.local_name() {
            "sp" => {
                if let Some(body) = element.child("p:txBody") {
                    let text = body_text(body);
                    if !text.trim().is_empty() {
                        lines.push(text);
                    }
                }
            }
            "graphicFrame" => {
                if let Some(tbl) = element.get(&["a:graphic", "a:graphicData", "a:tbl"]) {
                    lines.push(table_text(tbl));
                }
            }
            "grpSp" => collect_text(element, lines),
            _ => {}
        }
    }
}

/// CSS background of a `p:bg`, if it declares a visible one.
pub fn background_css(bg: &XmlNode, colors: &ColorContext) -> Option<String> {
    if let Some(props) = bg.child("p:bgPr") {
        return fill_from_properties(props, colors)
            .filter(|f| f.is_visible())
            .map(|f| css_paint(&f.fill_color, f.opacity));
    }
    bg.child("p:bgRef")
        .and_then(|r| resolve_color(r, colors))
        .map(|c| c.to_css())
}

/// Wrap rendered elements in a slide `<section>`.
pub fn slide_section(index: usize, width: f64, height: f64, background: &str, body: &str) -> String {
    format!(
        "<section class=\"pptx-slide\" data-slide=\"{}\" style=\"position: relative; width: {}px; height: {}px; overflow: hidden; background: {};\">{}</section>",
        index,
        px(width),
        px(height),
        escape(background),
        body
    )
}

//! Small HTML building helpers.

use crate::model::Position;
use crate::units::px;
use std::fmt::Write as _;

/// Escape text for HTML content or a double-quoted attribute value.
pub fn escape(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// Ordered inline CSS declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    decls: Vec<(String, String)>,
}

impl Style {
    /// Empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absolute placement for a shape box, including its transform.
    pub fn positioned(pos: &Position) -> Self {
        let mut style = Self::new();
        style
            .set("position", "absolute")
            .set("left", format!("{}px", px(pos.x)))
            .set("top", format!("{}px", px(pos.y)))
            .set("width", format!("{}px", px(pos.width)))
            .set("height", format!("{}px", px(pos.height)));
        if let Some(transform) = pos.css_transform() {
            style.set("transform", transform);
        }
        style
    }

    /// Set a declaration, replacing an existing one with the same property.
    pub fn set(&mut self, prop: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if let Some(slot) = self.decls.iter_mut().find(|(p, _)| p == prop) {
            slot.1 = value;
        } else {
            self.decls.push((prop.to_string(), value));
        }
        self
    }

    /// Value of a declaration.
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Render as `prop: value; ...` (escaped for a double-quoted attribute).
    pub fn to_attr(&self) -> String {
        let mut out = String::new();
        for (i, (prop, value)) in self.decls.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{}: {};", prop, value);
        }
        escape(&out)
    }
}

/// `data-*` attributes identifying a rendered element.
#[derive(Debug, Clone, Default)]
pub struct DataAttrs<'a> {
    pub name: Option<&'a str>,
    pub shape_id: Option<&'a str>,
    pub rel_id: Option<&'a str>,
}

impl DataAttrs<'_> {
    /// Render as a leading-space attribute list.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(name) = self.name {
            let _ = write!(out, " data-name=\"{}\"", escape(name));
        }
        if let Some(id) = self.shape_id {
            let _ = write!(out, " data-shape-id=\"{}\"", escape(id));
        }
        if let Some(rel) = self.rel_id {
            let _ = write!(out, " data-rel-id=\"{}\"", escape(rel));
        }
        out
    }
}

/// Inline placeholder emitted when an element cannot be rendered.
pub fn error_placeholder(pos: Option<&Position>, what: &str, message: &str) -> String {
    let mut style = match pos {
        Some(p) => Style::positioned(p),
        None => Style::new(),
    };
    style
        .set("border", "1px dashed #C00000")
        .set("color", "#C00000")
        .set("font-size", "10px")
        .set("overflow", "hidden");
    format!(
        "<div class=\"pptx-render-error\" style=\"{}\">Could not render {}: {}</div>",
        style.to_attr(),
        escape(what),
        escape(message)
    )
}

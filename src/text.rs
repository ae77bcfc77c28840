//! Text bodies (`p:txBody` / `a:txBody`) rendered as HTML.

use crate::color::resolve_color;
use crate::render::{escape, Style};
use crate::theme::ColorContext;
use crate::units::{emu_to_px, fmt_num, font_size_to_px, px};
use crate::xml::XmlNode;
use std::fmt::Write as _;

/// Default left/right inset (0.1in).
const DEFAULT_LR_INSET_EMU: i64 = 91440;
/// Default top/bottom inset (0.05in).
const DEFAULT_TB_INSET_EMU: i64 = 45720;

/// Whether a text body contains any visible characters.
pub fn has_text(tx_body: &XmlNode) -> bool {
    tx_body
        .children_named("a:p")
        .any(|p| !paragraph_text(p).trim().is_empty())
}

/// Plain text of a paragraph (runs, fields, line breaks).
pub fn paragraph_text(p: &XmlNode) -> String {
    let mut out = String::new();
    for child in &p.children {
        match child.local_name() {
            "r" | "fld" => {
                if let Some(t) = child.child("a:t") {
                    out.push_str(&t.text);
                }
            }
            "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Plain text of a whole body, one line per paragraph.
pub fn body_text(tx_body: &XmlNode) -> String {
    tx_body
        .children_named("a:p")
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

fn run_style(r_pr: Option<&XmlNode>, colors: &ColorContext, default_color: Option<&str>) -> Style {
    let mut style = Style::new();
    let Some(r_pr) = r_pr else {
        if let Some(color) = default_color {
            style.set("color", color);
        }
        return style;
    };
    if let Some(sz) = r_pr.attr_f64("sz") {
        style.set("font-size", format!("{}px", px(font_size_to_px(sz))));
    }
    if r_pr.attr_bool("b") == Some(true) {
        style.set("font-weight", "bold");
    }
    if r_pr.attr_bool("i") == Some(true) {
        style.set("font-style", "italic");
    }
    let mut decorations = Vec::new();
    if r_pr.attr("u").is_some_and(|u| u != "none") {
        decorations.push("underline");
    }
    if r_pr.attr("strike").is_some_and(|s| s != "noStrike") {
        decorations.push("line-through");
    }
    if !decorations.is_empty() {
        style.set("text-decoration", decorations.join(" "));
    }
    let color = r_pr
        .child("a:solidFill")
        .and_then(|f| resolve_color(f, colors))
        .map(|c| c.to_css())
        .or_else(|| default_color.map(str::to_string));
    if let Some(color) = color {
        style.set("color", color);
    }
    if let Some(face) = r_pr.child("a:latin").and_then(|l| l.attr("typeface")) {
        if !face.starts_with('+') {
            style.set("font-family", format!("'{}', sans-serif", face));
        }
    }
    if let Some(baseline) = r_pr.attr_f64("baseline").filter(|b| *b != 0.0) {
        style.set("vertical-align", if baseline > 0.0 { "super" } else { "sub" });
    }
    style
}

fn render_paragraph(p: &XmlNode, colors: &ColorContext, default_color: Option<&str>) -> String {
    let p_pr = p.child("a:pPr");
    let mut style = Style::new();
    style.set("margin", "0");
    let align = match p_pr.and_then(|pr| pr.attr("algn")) {
        Some("ctr") => "center",
        Some("r") => "right",
        Some("just") | Some("dist") => "justify",
        _ => "left",
    };
    style.set("text-align", align);
    if let Some(mar_l) = p_pr.and_then(|pr| pr.attr_i64("marL")).filter(|m| *m > 0) {
        style.set("padding-left", format!("{}px", px(emu_to_px(mar_l))));
    }
    if let Some(pct) = p_pr
        .and_then(|pr| pr.get(&["a:lnSpc", "a:spcPct"]))
        .and_then(|s| s.attr_f64("val"))
    {
        style.set("line-height", fmt_num(pct / 100000.0, 2));
    }

    let mut inner = String::new();
    if let Some(bullet) = p_pr
        .and_then(|pr| pr.child("a:buChar"))
        .and_then(|b| b.attr("char"))
    {
        let _ = write!(inner, "<span class=\"pptx-bullet\">{} </span>", escape(bullet));
    }
    for child in &p.children {
        match child.local_name() {
            "r" | "fld" => {
                let text = child.child("a:t").map(|t| t.text.as_str()).unwrap_or("");
                if text.is_empty() {
                    continue;
                }
                let run = run_style(child.child("a:rPr"), colors, default_color);
                let attr = run.to_attr();
                if attr.is_empty() {
                    let _ = write!(inner, "<span>{}</span>", escape(text));
                } else {
                    let _ = write!(inner, "<span style=\"{}\">{}</span>", attr, escape(text));
                }
            }
            "br" => inner.push_str("<br>"),
            _ => {}
        }
    }
    if inner.is_empty() {
        // Keep the line height of empty paragraphs.
        inner.push_str("<br>");
    }
    format!("<p style=\"{}\">{}</p>", style.to_attr(), inner)
}

/// Render a text body filling its shape box.
///
/// Returns `None` when the body has no visible text. `default_color` is the
/// shape's `a:fontRef` color, used for runs without an explicit fill.
pub fn render_text_body(
    tx_body: &XmlNode,
    colors: &ColorContext,
    default_color: Option<&str>,
) -> Option<String> {
    if !has_text(tx_body) {
        return None;
    }
    let body_pr = tx_body.child("a:bodyPr");
    let inset = |attr: &str, default: i64| {
        emu_to_px(
            body_pr
                .and_then(|b| b.attr_i64(attr))
                .unwrap_or(default),
        )
    };
    let justify = match body_pr.and_then(|b| b.attr("anchor")) {
        Some("ctr") => "center",
        Some("b") => "flex-end",
        _ => "flex-start",
    };

    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("inset", "0")
        .set("display", "flex")
        .set("flex-direction", "column")
        .set("justify-content", justify)
        .set(
            "padding",
            format!(
                "{}px {}px {}px {}px",
                px(inset("tIns", DEFAULT_TB_INSET_EMU)),
                px(inset("rIns", DEFAULT_LR_INSET_EMU)),
                px(inset("bIns", DEFAULT_TB_INSET_EMU)),
                px(inset("lIns", DEFAULT_LR_INSET_EMU))
            ),
        )
        .set("box-sizing", "border-box")
        .set("overflow-wrap", "break-word");
    if body_pr.and_then(|b| b.attr("wrap")) == Some("none") {
        style.set("white-space", "nowrap");
    }

    Some(format!(
        "<div class=\"pptx-text\" style=\"{}\">{}</div>",
        style.to_attr(),
        render_paragraphs(tx_body, colors, default_color)
    ))
}

/// The `<p>` elements of a text body, without a positioning wrapper.
pub fn render_paragraphs(tx_body: &XmlNode, colors: &ColorContext, default_color: Option<&str>) -> String {
    tx_body
        .children_named("a:p")
        .map(|p| render_paragraph(p, colors, default_color))
        .collect()
}

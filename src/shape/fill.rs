//! Fill and outline resolution for shapes.

use crate::color::{resolve_color, ResolvedColor};
use crate::model::{FillStyle, LineEnd, LineEndKind, StrokeStyle};
use crate::theme::ColorContext;
use crate::units::{angle_to_deg, emu_to_px, fmt_num, percent_to_ratio};
use crate::xml::XmlNode;

/// Default outline width when a style reference supplies the line (0.75pt).
const DEFAULT_LINE_EMU: i64 = 9525;

/// Resolve the fill of a shape from `p:spPr`, falling back to `p:style/a:fillRef`.
pub fn extract_fill(
    sp_pr: Option<&XmlNode>,
    style: Option<&XmlNode>,
    ctx: &ColorContext,
) -> FillStyle {
    let mut fill = sp_pr
        .and_then(|sp| fill_from_properties(sp, ctx))
        .or_else(|| style_ref_color(style, "a:fillRef", ctx).map(|c| FillStyle::solid(&c)))
        .unwrap_or_default();

    let stroke = extract_stroke(sp_pr, style, ctx);
    if stroke.is_visible() {
        fill.stroke_color = stroke.color;
        fill.stroke_opacity = stroke.opacity;
    }
    fill
}

/// Fill declared directly on a properties node (`p:spPr`, `a:tcPr`, `c:spPr`).
///
/// Returns `None` when the node declares no fill at all, so callers can
/// fall through to inherited styles.
pub fn fill_from_properties(props: &XmlNode, ctx: &ColorContext) -> Option<FillStyle> {
    for child in &props.children {
        match child.local_name() {
            "noFill" => return Some(FillStyle::default()),
            "solidFill" => {
                return Some(match resolve_color(child, ctx) {
                    Some(color) => FillStyle::solid(&color),
                    None => FillStyle::default(),
                });
            }
            "gradFill" => {
                let mut fill = FillStyle::default();
                if let Some(css) = gradient_css(child, ctx) {
                    fill.fill_color = css;
                }
                return Some(fill);
            }
            "pattFill" => {
                return Some(
                    child
                        .child("a:fgClr")
                        .and_then(|fg| resolve_color(fg, ctx))
                        .map(|c| FillStyle::solid(&c))
                        .unwrap_or_default(),
                );
            }
            "grpFill" | "blipFill" => return Some(FillStyle::default()),
            _ => {}
        }
    }
    None
}

/// Color carried by a `p:style` reference (`a:fillRef`, `a:lnRef`).
///
/// `idx="0"` means "no style fill".
fn style_ref_color(style: Option<&XmlNode>, reference: &str, ctx: &ColorContext) -> Option<ResolvedColor> {
    let reference = style?.child(reference)?;
    if reference.attr_i64("idx") == Some(0) {
        return None;
    }
    resolve_color(reference, ctx)
}

/// CSS gradient for an `a:gradFill`.
///
/// Linear gradients map the DrawingML angle (0 = left→right) onto CSS
/// angles (90deg = left→right). Path gradients become radial gradients.
pub fn gradient_css(grad: &XmlNode, ctx: &ColorContext) -> Option<String> {
    let stops: Vec<String> = grad
        .child("a:gsLst")?
        .children_named("a:gs")
        .filter_map(|gs| {
            let color = resolve_color(gs, ctx)?;
            let pos = percent_to_ratio(gs.attr_f64("pos").unwrap_or(0.0)) * 100.0;
            Some(format!("{} {}%", color.to_css(), fmt_num(pos, 2)))
        })
        .collect();
    if stops.is_empty() {
        return None;
    }
    if stops.len() == 1 {
        // A single stop is a flat color.
        let only = stops[0].rsplit_once(' ').map(|(c, _)| c).unwrap_or(&stops[0]);
        return Some(only.to_string());
    }

    if let Some(path) = grad.child("a:path") {
        let shape = if path.attr("path") == Some("circle") {
            "circle"
        } else {
            "ellipse"
        };
        return Some(format!("radial-gradient({}, {})", shape, stops.join(", ")));
    }

    let angle = grad
        .child("a:lin")
        .and_then(|lin| lin.attr_f64("ang"))
        .map(angle_to_deg)
        .unwrap_or(0.0);
    Some(format!(
        "linear-gradient({}deg, {})",
        fmt_num((angle + 90.0).rem_euclid(360.0), 2),
        stops.join(", ")
    ))
}

fn line_end(node: Option<&XmlNode>) -> LineEnd {
    let Some(node) = node else {
        return LineEnd::default();
    };
    let scale = |v: Option<&str>| match v {
        Some("sm") => 2.0,
        Some("lg") => 5.0,
        _ => 3.0,
    };
    LineEnd {
        kind: node.attr("type").map(LineEndKind::parse).unwrap_or_default(),
        width_scale: scale(node.attr("w")),
        length_scale: scale(node.attr("len")),
    }
}

/// Resolve the outline from `p:spPr/a:ln`, falling back to `p:style/a:lnRef`.
pub fn extract_stroke(
    sp_pr: Option<&XmlNode>,
    style: Option<&XmlNode>,
    ctx: &ColorContext,
) -> StrokeStyle {
    let ln = sp_pr.and_then(|sp| sp.child("a:ln"));
    let mut stroke = StrokeStyle::default();

    let explicit = ln.and_then(|ln| {
        ln.children.iter().find_map(|c| match c.local_name() {
            "noFill" => Some(None),
            "solidFill" => Some(resolve_color(c, ctx)),
            "gradFill" => Some(
                c.child("a:gsLst")
                    .and_then(|l| l.children.first())
                    .and_then(|gs| resolve_color(gs, ctx)),
            ),
            _ => None,
        })
    });

    let color = match explicit {
        Some(color) => color,
        None => style_ref_color(style, "a:lnRef", ctx),
    };

    if let Some(color) = color {
        stroke.color = color.hex.clone();
        stroke.opacity = color.alpha;
        stroke.width = emu_to_px(
            ln.and_then(|l| l.attr_i64("w"))
                .unwrap_or(DEFAULT_LINE_EMU),
        );
    }

    if let Some(ln) = ln {
        if let Some(dash) = ln.child("a:prstDash").and_then(|d| d.val()) {
            stroke.dash = dash.to_string();
        }
        stroke.head_end = line_end(ln.child("a:headEnd"));
        stroke.tail_end = line_end(ln.child("a:tailEnd"));
    }
    stroke
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    fn ctx() -> ColorContext {
        ColorContext::default()
    }

    #[test]
    fn test_solid_fill_with_theme_linkage() {
        let sp_pr = parse(
            r#"<p:spPr><a:solidFill><a:schemeClr val="accent1"><a:lumMod val="75000"/><a:alpha val="50000"/></a:schemeClr></a:solidFill></p:spPr>"#,
        )
        .unwrap();
        let fill = extract_fill(Some(&sp_pr), None, &ctx());
        assert!(fill.fill_color.starts_with('#'));
        assert_eq!(fill.opacity, 0.5);
        assert_eq!(fill.original_theme_color.as_deref(), Some("accent1"));
        assert_eq!(fill.original_lum_mod, Some(75000.0));
        assert_eq!(fill.original_alpha, Some(50000.0));
        assert_eq!(fill.reresolve(&ctx()).as_deref(), Some(fill.fill_color.as_str()));
    }

    #[test]
    fn test_no_fill_and_style_fallback() {
        let sp_pr = parse(r#"<p:spPr><a:noFill/></p:spPr>"#).unwrap();
        let style = parse(
            r#"<p:style><a:lnRef idx="2"><a:schemeClr val="accent1"/></a:lnRef><a:fillRef idx="1"><a:schemeClr val="accent2"/></a:fillRef></p:style>"#,
        )
        .unwrap();
        let fill = extract_fill(Some(&sp_pr), Some(&style), &ctx());
        assert_eq!(fill.fill_color, "transparent");
        assert_eq!(fill.stroke_color, "#4472C4");

        let fill = extract_fill(None, Some(&style), &ctx());
        assert_eq!(fill.fill_color, "#ED7D31");
    }

    #[test]
    fn test_gradient() {
        let grad = parse(
            r#"<a:gradFill><a:gsLst><a:gs pos="0"><a:srgbClr val="FF0000"/></a:gs><a:gs pos="100000"><a:srgbClr val="0000FF"/></a:gs></a:gsLst><a:lin ang="5400000"/></a:gradFill>"#,
        )
        .unwrap();
        assert_eq!(
            gradient_css(&grad, &ctx()).unwrap(),
            "linear-gradient(180deg, #FF0000 0%, #0000FF 100%)"
        );
    }

    #[test]
    fn test_stroke() {
        let sp_pr = parse(
            r#"<p:spPr><a:ln w="25400"><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill><a:prstDash val="dash"/><a:tailEnd type="triangle" w="lg" len="sm"/></a:ln></p:spPr>"#,
        )
        .unwrap();
        let stroke = extract_stroke(Some(&sp_pr), None, &ctx());
        assert_eq!(stroke.color, "#00FF00");
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.dash, "dash");
        assert_eq!(stroke.tail_end.kind, LineEndKind::Triangle);
        assert_eq!(stroke.tail_end.width_scale, 5.0);
        assert_eq!(stroke.tail_end.length_scale, 2.0);
        assert_eq!(stroke.head_end.kind, LineEndKind::None);
    }

    #[test]
    fn test_stroke_no_fill() {
        let sp_pr = parse(r#"<p:spPr><a:ln w="25400"><a:noFill/></a:ln></p:spPr>"#).unwrap();
        let style = parse(r#"<p:style><a:lnRef idx="2"><a:schemeClr val="accent1"/></a:lnRef></p:style>"#).unwrap();
        let stroke = extract_stroke(Some(&sp_pr), Some(&style), &ctx());
        assert!(!stroke.is_visible());
    }
}

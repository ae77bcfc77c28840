//! Shape rendering: geometry, paint, and text of `p:sp` elements.

pub mod connector;
pub mod custom;
pub mod fill;
pub mod hexagon;
pub mod position;
pub mod preset;
pub mod svg;

pub use connector::{render_connector, ConnectorKind};
pub use custom::{custom_path, GuideEnv};
pub use fill::{extract_fill, extract_stroke, gradient_css};
pub use position::{element_position, GroupTransform};
pub use preset::{Adjustments, Outline};

use crate::color::{hex_to_rgb, resolve_color};
use crate::model::{FillStyle, Position, StrokeStyle};
use crate::render::{escape, DataAttrs, RenderContext, Style};
use crate::units::fmt_num;
use crate::xml::XmlNode;
use std::fmt::Write as _;

/// CSS paint for a fill, folding opacity into hex colors.
pub fn css_paint(color: &str, opacity: f64) -> String {
    if opacity < 0.999 {
        if let Some(rgb) = hex_to_rgb(color) {
            return format!(
                "rgba({}, {}, {}, {})",
                rgb.r.round() as u8,
                rgb.g.round() as u8,
                rgb.b.round() as u8,
                fmt_num(opacity, 3)
            );
        }
    }
    color.to_string()
}

/// CSS `border` value for an outline.
pub fn css_border(stroke: &StrokeStyle) -> String {
    let kind = match stroke.dash.as_str() {
        "solid" => "solid",
        "dot" | "sysDot" => "dotted",
        _ => "dashed",
    };
    format!(
        "{}px {} {}",
        fmt_num(stroke.width, 2),
        kind,
        css_paint(&stroke.color, stroke.opacity)
    )
}

/// Non-visual properties (`p:cNvPr`) of any slide element.
pub fn non_visual(element: &XmlNode) -> Option<&XmlNode> {
    element
        .children
        .iter()
        .find(|c| c.local_name().starts_with("nv"))
        .and_then(|nv| nv.children.iter().find(|c| c.is("cNvPr")))
}

/// `data-*` attributes of an element.
pub fn data_attrs<'a>(element: &'a XmlNode, rel_id: Option<&'a str>) -> DataAttrs<'a> {
    let nv = non_visual(element);
    DataAttrs {
        name: nv.and_then(|n| n.attr("name")),
        shape_id: nv.and_then(|n| n.attr("id")),
        rel_id,
    }
}

fn fill_layer(fill: &FillStyle, clip: Option<String>, radius: Option<&str>, stroke: Option<&StrokeStyle>) -> String {
    let mut style = Style::new();
    style
        .set("position", "absolute")
        .set("inset", "0")
        .set("box-sizing", "border-box");
    if fill.is_visible() {
        style.set("background", css_paint(&fill.fill_color, fill.opacity));
    }
    if let Some(clip) = clip {
        style.set("clip-path", clip);
    }
    if let Some(radius) = radius {
        style.set("border-radius", radius);
    }
    if let Some(stroke) = stroke.filter(|s| s.is_visible()) {
        style.set("border", css_border(stroke));
    }
    format!("<div class=\"pptx-shape-fill\" style=\"{}\"></div>", style.to_attr())
}

fn polygon_outline(outline: &Outline, w: f64, h: f64, stroke: &StrokeStyle) -> String {
    let Some(points) = outline.svg_points(w, h) else {
        return String::new();
    };
    format!(
        "{}<polygon points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"{}/></svg>",
        svg::svg_open(w, h),
        points,
        escape(&css_paint(&stroke.color, stroke.opacity)),
        fmt_num(stroke.width, 2),
        connector::dash_pattern(&stroke.dash)
            .map(|p| {
                let dashes: Vec<String> =
                    p.iter().map(|v| fmt_num(v * stroke.width.max(1.0), 2)).collect();
                format!(" stroke-dasharray=\"{}\"", dashes.join(" "))
            })
            .unwrap_or_default()
    )
}

fn custom_geometry(cust_geom: &XmlNode, w: f64, h: f64, fill: &FillStyle, stroke: &StrokeStyle) -> String {
    let mut out = svg::svg_open(w, h);
    let fill_paint = escape(&svg::svg_paint(&fill.fill_color));
    for path in custom::custom_paths(cust_geom, w, h) {
        let _ = write!(out, "<path d=\"{}\"", path.d);
        if path.filled && fill.is_visible() {
            let _ = write!(out, " fill=\"{}\"", fill_paint);
            if fill.opacity < 1.0 {
                let _ = write!(out, " fill-opacity=\"{}\"", fmt_num(fill.opacity, 3));
            }
        } else {
            out.push_str(" fill=\"none\"");
        }
        if path.stroked && stroke.is_visible() {
            let _ = write!(
                out,
                " stroke=\"{}\" stroke-width=\"{}\"",
                escape(&css_paint(&stroke.color, stroke.opacity)),
                fmt_num(stroke.width, 2)
            );
        }
        out.push_str("/>");
    }
    out.push_str("</svg>");
    out
}

/// Render a `p:sp` placed at `pos`.
pub fn render_shape(element: &XmlNode, pos: &Position, ctx: &RenderContext) -> String {
    let sp_pr = element.child("p:spPr");
    let style_ref = element.child("p:style");
    let prst_geom = sp_pr.and_then(|s| s.child("a:prstGeom"));
    let preset_name = prst_geom.and_then(|g| g.attr("prst")).unwrap_or("rect");

    if connector::is_connector_preset(preset_name) {
        return render_connector(element, pos, ctx);
    }

    let fill = extract_fill(sp_pr, style_ref, ctx.colors);
    let stroke = extract_stroke(sp_pr, style_ref, ctx.colors);
    let adj = Adjustments::from_node(prst_geom);
    let (w, h) = (pos.width, pos.height);

    let font_color = style_ref
        .and_then(|s| s.child("a:fontRef"))
        .and_then(|f| resolve_color(f, ctx.colors))
        .map(|c| c.to_css());
    let text = element
        .child("p:txBody")
        .and_then(|body| crate::text::render_text_body(body, ctx.colors, font_color.as_deref()))
        .unwrap_or_default();

    let mut bounds = *pos;
    let body = if let Some(cust) = sp_pr.and_then(|s| s.child("a:custGeom")) {
        custom_geometry(cust, w, h, &fill, &stroke)
    } else if let Some(extrusion) = (preset_name == "hexagon")
        .then(|| sp_pr.and_then(hexagon::Extrusion::from_properties))
        .flatten()
    {
        let hex = hexagon::render_extruded(
            pos,
            &adj,
            &extrusion,
            &fill,
            &stroke,
            ctx.options.hexagon_ignore_rotation,
        );
        bounds = hex.bounds;
        hex.svg
    } else {
        match preset::outline_for(preset_name, &adj, w, h) {
            Outline::Rect => fill_layer(&fill, None, None, Some(&stroke)),
            Outline::Rounded(radius) => fill_layer(&fill, None, Some(&radius), Some(&stroke)),
            outline @ Outline::Polygon { .. } => {
                let mut html = fill_layer(&fill, outline.clip_path(), None, None);
                if stroke.is_visible() {
                    html.push_str(&polygon_outline(&outline, w, h, &stroke));
                }
                html
            }
            Outline::Svg(shape) => svg::render_svg(shape, &adj, w, h, &fill, &stroke),
        }
    };

    let attrs = data_attrs(element, None);
    let mut style = Style::positioned(&bounds);
    if non_visual(element).and_then(|c| c.attr_bool("hidden")) == Some(true) {
        style.set("display", "none");
    }
    format!(
        "<div class=\"pptx-shape\" data-preset=\"{}\"{} style=\"{}\">{}{}</div>",
        escape(preset_name),
        attrs.render(),
        style.to_attr(),
        body,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{NoParts, RenderOptions};
    use crate::theme::ColorContext;
    use crate::xml::parse;

    fn render(xml: &str) -> String {
        let element = parse(xml).unwrap();
        let colors = ColorContext::default();
        let options = RenderOptions::default();
        let ctx = RenderContext::new(&colors, &options, &NoParts);
        render_shape(&element, &element_position(&element), &ctx)
    }

    #[test]
    fn test_css_paint() {
        assert_eq!(css_paint("#FF0000", 1.0), "#FF0000");
        assert_eq!(css_paint("#FF0000", 0.5), "rgba(255, 0, 0, 0.5)");
        assert_eq!(css_paint("transparent", 0.5), "transparent");
    }

    #[test]
    fn test_right_arrow_shape() {
        let html = render(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Arrow 2"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>
               <p:spPr><a:xfrm><a:off x="1270000" y="635000"/><a:ext cx="2540000" cy="1270000"/></a:xfrm>
               <a:prstGeom prst="rightArrow"><a:avLst><a:gd name="adj1" fmla="val 50000"/><a:gd name="adj2" fmla="val 50000"/></a:avLst></a:prstGeom>
               <a:solidFill><a:srgbClr val="4472C4"/></a:solidFill></p:spPr></p:sp>"#,
        );
        assert!(html.contains("data-name=\"Arrow 2\" data-shape-id=\"3\""));
        assert!(html.contains("left: 100px; top: 50px; width: 200px; height: 100px;"));
        assert!(html.contains(
            "clip-path: polygon(0% 25%, 50% 25%, 50% 0%, 100% 50%, 50% 100%, 50% 75%, 0% 75%);"
        ));
        assert!(html.contains("background: #4472C4;"));
    }

    #[test]
    fn test_unknown_preset_is_plain_rect() {
        let html = render(
            r#"<p:sp><p:spPr><a:prstGeom prst="mysteryShape"/><a:solidFill><a:srgbClr val="00FF00"/></a:solidFill></p:spPr></p:sp>"#,
        );
        assert!(!html.contains("clip-path"));
        assert!(html.contains("background: #00FF00;"));
    }

    #[test]
    fn test_ellipse_with_border_and_text() {
        let html = render(
            r#"<p:sp><p:spPr><a:prstGeom prst="ellipse"/><a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln></p:spPr>
               <p:txBody><a:bodyPr/><a:p><a:r><a:t>Hi</a:t></a:r></a:p></p:txBody></p:sp>"#,
        );
        assert!(html.contains("border-radius: 50%;"));
        assert!(html.contains("border: 1px solid #000000;"));
        assert!(html.contains(">Hi</span>"));
    }

    #[test]
    fn test_custom_geometry_svg() {
        let html = render(
            r#"<p:sp><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="127000" cy="127000"/></a:xfrm><a:custGeom><a:pathLst><a:path w="10" h="10"><a:moveTo><a:pt x="0" y="0"/></a:moveTo><a:lnTo><a:pt x="10" y="10"/></a:lnTo><a:close/></a:path></a:pathLst></a:custGeom><a:solidFill><a:srgbClr val="123456"/></a:solidFill></p:spPr></p:sp>"#,
        );
        assert!(html.contains("<path d=\"M0,0 L10,10 Z\" fill=\"#123456\"/>"));
    }

    #[test]
    fn test_extruded_hexagon() {
        let html = render(
            r#"<p:sp><p:spPr><a:xfrm rot="2700000"><a:off x="0" y="254000"/><a:ext cx="1270000" cy="1270000"/></a:xfrm><a:prstGeom prst="hexagon"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="808080"/></a:solidFill><a:sp3d extrusionH="127000"/></p:spPr></p:sp>"#,
        );
        assert_eq!(html.matches("hex-side").count(), 3);
        assert!(!html.contains("rotate("));
    }

    #[test]
    fn test_line_preset_routes_to_connector() {
        let html = render(
            r#"<p:sp><p:spPr><a:prstGeom prst="line"/><a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln></p:spPr></p:sp>"#,
        );
        assert!(html.contains("pptx-connector"));
    }
}

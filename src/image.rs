//! Pictures (`p:pic`) and image sources.

use crate::model::{CroppingSpec, Position};
use crate::render::{error_placeholder, escape, RenderContext, Style};
use crate::shape::preset::{outline_for, Adjustments, Outline};
use crate::shape::{css_border, data_attrs, extract_stroke, non_visual};
use crate::units::px;
use crate::xml::XmlNode;
use base64::Engine;

/// Relative rectangle attributes are in thousandths of a percent.
const RECT_UNIT: f64 = 1000.0;

/// MIME type for an image part, by extension.
pub fn mime_type(path: &str) -> &'static str {
    let ext = path
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "application/octet-stream",
    }
}

/// `data:` URI carrying the image bytes.
pub fn data_uri(path: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime_type(path),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

fn rect_spec(rect: &XmlNode, is_fill_rect: bool) -> CroppingSpec {
    let edge = |attr: &str| rect.attr_f64(attr).map(|v| v / RECT_UNIT);
    let (left, top, right, bottom) = (edge("l"), edge("t"), edge("r"), edge("b"));
    CroppingSpec {
        has_left: left.is_some(),
        has_top: top.is_some(),
        has_right: right.is_some(),
        has_bottom: bottom.is_some(),
        left: left.unwrap_or(0.0),
        top: top.unwrap_or(0.0),
        right: right.unwrap_or(0.0),
        bottom: bottom.unwrap_or(0.0),
        is_fill_rect,
    }
}

/// Cropping from a `p:blipFill`: `a:srcRect` wins over `a:stretch/a:fillRect`.
///
/// Returns `None` when neither rectangle sets an edge.
pub fn cropping_spec(blip_fill: &XmlNode) -> Option<CroppingSpec> {
    let src = blip_fill
        .child("a:srcRect")
        .map(|r| rect_spec(r, false))
        .filter(CroppingSpec::is_cropped);
    src.or_else(|| {
        blip_fill
            .get(&["a:stretch", "a:fillRect"])
            .map(|r| rect_spec(r, true))
            .filter(CroppingSpec::is_cropped)
    })
}

/// Image box `(left, top, width, height)` inside a frame of `w`×`h`.
///
/// Source crops scale the image up so only the kept region fills the frame;
/// fill rectangles inset (or, when negative, extend) the image within it.
pub fn image_box(crop: Option<&CroppingSpec>, w: f64, h: f64) -> (f64, f64, f64, f64) {
    let Some(crop) = crop else {
        return (0.0, 0.0, w, h);
    };
    let kept_x = 1.0 - (crop.left + crop.right) / 100.0;
    let kept_y = 1.0 - (crop.top + crop.bottom) / 100.0;
    if kept_x <= 0.0 || kept_y <= 0.0 {
        return (0.0, 0.0, w, h);
    }
    if crop.is_fill_rect {
        (
            crop.left / 100.0 * w,
            crop.top / 100.0 * h,
            w * kept_x,
            h * kept_y,
        )
    } else {
        let (img_w, img_h) = (w / kept_x, h / kept_y);
        (
            -crop.left / 100.0 * img_w,
            -crop.top / 100.0 * img_h,
            img_w,
            img_h,
        )
    }
}

/// Relationship id of the picture's blip.
pub fn blip_rel_id(element: &XmlNode) -> Option<&str> {
    let blip = element.get(&["p:blipFill", "a:blip"])?;
    blip.attr("r:embed").or_else(|| blip.attr("r:link"))
}

/// Render a `p:pic` placed at `pos`.
pub fn render_picture(element: &XmlNode, pos: &Position, ctx: &RenderContext) -> String {
    let rel_id = blip_rel_id(element);
    let Some(src) = rel_id.and_then(|id| ctx.parts.image_src(id)) else {
        tracing::warn!(rel_id = rel_id.unwrap_or_default(), "picture image part not found");
        return error_placeholder(Some(pos), "picture", "image part not found");
    };

    let sp_pr = element.child("p:spPr");
    let crop = element.child("p:blipFill").and_then(cropping_spec);
    let (left, top, width, height) = image_box(crop.as_ref(), pos.width, pos.height);

    let mut img_style = Style::new();
    img_style
        .set("position", "absolute")
        .set("left", format!("{}px", px(left)))
        .set("top", format!("{}px", px(top)))
        .set("width", format!("{}px", px(width)))
        .set("height", format!("{}px", px(height)));

    let mut frame = Style::positioned(pos);
    frame.set("overflow", "hidden");
    if let Some(geom) = sp_pr.and_then(|s| s.child("a:prstGeom")) {
        let name = geom.attr("prst").unwrap_or("rect");
        match outline_for(name, &Adjustments::from_node(Some(geom)), pos.width, pos.height) {
            Outline::Rounded(radius) => {
                frame.set("border-radius", radius);
            }
            outline @ Outline::Polygon { .. } => {
                if let Some(clip) = outline.clip_path() {
                    frame.set("clip-path", clip);
                }
            }
            Outline::Rect | Outline::Svg(_) => {}
        }
    }
    let stroke = extract_stroke(sp_pr, element.child("p:style"), ctx.colors);
    if stroke.is_visible() {
        frame.set("border", css_border(&stroke)).set("box-sizing", "border-box");
    }
    if non_visual(element).and_then(|c| c.attr_bool("hidden")) == Some(true) {
        frame.set("display", "none");
    }

    let alt = non_visual(element)
        .and_then(|c| c.attr("descr"))
        .unwrap_or_default();
    format!(
        "<div class=\"pptx-picture\"{} style=\"{}\"><img src=\"{}\" alt=\"{}\" style=\"{}\"></div>",
        data_attrs(element, rel_id).render(),
        frame.to_attr(),
        escape(&src),
        escape(alt),
        img_style.to_attr()
    )
}

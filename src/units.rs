//! DrawingML unit conversions.

use crate::xml::XmlNode;

/// EMU per CSS pixel (one point, rendered at 1px).
pub const EMU_PER_PX: f64 = 12700.0;

/// Angle unit used by DrawingML: 60000ths of a degree.
pub const ANGLE_UNIT: f64 = 60000.0;

/// Percentage unit used by DrawingML adjust values and color modifiers.
pub const PERCENT_UNIT: f64 = 100000.0;

/// Default extent (in EMU) when a shape omits `a:ext`.
pub const DEFAULT_EXTENT_EMU: i64 = 100 * 12700;

/// Convert EMU to pixels.
pub fn emu_to_px(emu: i64) -> f64 {
    emu as f64 / EMU_PER_PX
}

/// Convert EMU to pixels from a floating value.
pub fn emu_f_to_px(emu: f64) -> f64 {
    emu / EMU_PER_PX
}

/// Read an EMU attribute and convert it, falling back to `default_emu`.
pub fn emu_attr_px(node: Option<&XmlNode>, attr: &str, default_emu: i64) -> f64 {
    let emu = node
        .and_then(|n| n.attr_i64(attr))
        .unwrap_or(default_emu);
    emu_to_px(emu)
}

/// Convert a DrawingML angle to degrees.
pub fn angle_to_deg(angle: f64) -> f64 {
    angle / ANGLE_UNIT
}

/// Convert a DrawingML angle to radians.
pub fn angle_to_rad(angle: f64) -> f64 {
    angle_to_deg(angle).to_radians()
}

/// Convert a 0–100000 fraction to a 0–1 ratio.
pub fn percent_to_ratio(value: f64) -> f64 {
    value / PERCENT_UNIT
}

/// Font size in hundredths of a point to pixels.
pub fn font_size_to_px(sz: f64) -> f64 {
    sz / 100.0
}

/// Format a float compactly for CSS/SVG output: at most `decimals` places,
/// trailing zeros removed, and no `-0`.
pub fn fmt_num(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let s = format!("{:.*}", decimals, value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    if s == "-0" {
        "0".to_string()
    } else {
        s
    }
}

/// Pixel value formatted to two decimals (`12.5`).
pub fn px(value: f64) -> String {
    fmt_num(value, 2)
}

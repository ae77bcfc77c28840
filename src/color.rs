//! DrawingML color resolution.
//!
//! Resolves `srgbClr`, `schemeClr`, `sysClr`, `prstClr`, `scrgbClr` and
//! `hslClr` nodes to `#RRGGBB`, then applies child modifiers in a fixed
//! order: luminance (`lumMod`/`lumOff`, HSL space) first, then `shade`,
//! `tint` and `satMod`. Swapping the two stages gives visibly different
//! results for themed accents, so the order must not change.

use crate::theme::{system_color, ColorContext};
use crate::units::{angle_to_deg, percent_to_ratio};
use crate::xml::XmlNode;
use serde::Serialize;

/// Element names that carry a color.
const COLOR_ELEMENTS: [&str; 6] = ["srgbClr", "schemeClr", "sysClr", "prstClr", "scrgbClr", "hslClr"];

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// A resolved color plus the source values it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedColor {
    /// `#RRGGBB`.
    pub hex: String,
    /// Opacity 0–1.
    pub alpha: f64,
    /// Scheme name when the color came from `a:schemeClr`.
    pub scheme: Option<String>,
    /// Raw `lumMod` (0–100000) if present.
    pub lum_mod: Option<f64>,
    /// Raw `lumOff` (0–100000) if present.
    pub lum_off: Option<f64>,
    /// Raw `alpha` (0–100000) if present.
    pub alpha_raw: Option<f64>,
}

impl ResolvedColor {
    /// CSS color: hex when opaque, `rgba()` otherwise.
    pub fn to_css(&self) -> String {
        if self.alpha >= 0.999 {
            return self.hex.clone();
        }
        match hex_to_rgb(&self.hex) {
            Some(rgb) => format!(
                "rgba({}, {}, {}, {})",
                rgb.r.round() as u8,
                rgb.g.round() as u8,
                rgb.b.round() as u8,
                crate::units::fmt_num(self.alpha, 3)
            ),
            None => self.hex.clone(),
        }
    }
}

/// Color modifiers collected from a color element's children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorModifiers {
    pub lum: Option<f64>,
    pub lum_mod: Option<f64>,
    pub lum_off: Option<f64>,
    pub hue: Option<f64>,
    pub hue_mod: Option<f64>,
    pub hue_off: Option<f64>,
    pub sat: Option<f64>,
    pub sat_off: Option<f64>,
    pub shade: Option<f64>,
    pub tint: Option<f64>,
    pub sat_mod: Option<f64>,
    pub alpha: Option<f64>,
    pub alpha_mod: Option<f64>,
    pub alpha_off: Option<f64>,
    pub comp: bool,
    pub inv: bool,
    pub gray: bool,
}

impl ColorModifiers {
    /// Collect modifiers from the children of a color element.
    pub fn from_node(node: &XmlNode) -> Self {
        let mut m = Self::default();
        for child in &node.children {
            let v = child.attr_f64("val");
            match child.local_name() {
                "lum" => m.lum = v,
                "lumMod" => m.lum_mod = v,
                "lumOff" => m.lum_off = v,
                "hue" => m.hue = v,
                "hueMod" => m.hue_mod = v,
                "hueOff" => m.hue_off = v,
                "sat" => m.sat = v,
                "satOff" => m.sat_off = v,
                "shade" => m.shade = v,
                "tint" => m.tint = v,
                "satMod" => m.sat_mod = v,
                "alpha" => m.alpha = v,
                "alphaMod" => m.alpha_mod = v,
                "alphaOff" => m.alpha_off = v,
                "comp" => m.comp = true,
                "inv" => m.inv = true,
                "gray" => m.gray = true,
                _ => {}
            }
        }
        m
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse `RRGGBB` / `#RRGGBB` into RGB.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok().map(f64::from);
    Some(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Format RGB as `#RRGGBB`, clamping each channel.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    format!("#{:02X}{:02X}{:02X}", c(rgb.r), c(rgb.g), c(rgb.b))
}

/// RGB (0–255) to HSL (h in degrees, s/l in 0–1).
pub fn rgb_to_hsl(rgb: Rgb) -> (f64, f64, f64) {
    let r = rgb.r / 255.0;
    let g = rgb.g / 255.0;
    let b = rgb.b / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// HSL (h in degrees, s/l in 0–1) to RGB (0–255).
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);
    if s == 0.0 {
        let v = l * 255.0;
        return Rgb { r: v, g: v, b: v };
    }
    let h = h.rem_euclid(360.0) / 360.0;
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    Rgb {
        r: hue(h + 1.0 / 3.0) * 255.0,
        g: hue(h) * 255.0,
        b: hue(h - 1.0 / 3.0) * 255.0,
    }
}

/// Luminance stage: `lum`, `lumMod`, `lumOff` plus hue/saturation setters, in HSL.
pub fn apply_luminance(rgb: Rgb, m: &ColorModifiers) -> Rgb {
    let has_hsl = m.lum.is_some()
        || m.lum_mod.is_some()
        || m.lum_off.is_some()
        || m.hue.is_some()
        || m.hue_mod.is_some()
        || m.hue_off.is_some()
        || m.sat.is_some()
        || m.sat_off.is_some();
    if !has_hsl {
        return rgb;
    }
    let (mut h, mut s, mut l) = rgb_to_hsl(rgb);
    if let Some(hue) = m.hue {
        h = angle_to_deg(hue);
    }
    if let Some(hue_mod) = m.hue_mod {
        h *= percent_to_ratio(hue_mod);
    }
    if let Some(hue_off) = m.hue_off {
        h += angle_to_deg(hue_off);
    }
    if let Some(sat) = m.sat {
        s = percent_to_ratio(sat);
    }
    if let Some(sat_off) = m.sat_off {
        s += percent_to_ratio(sat_off);
    }
    if let Some(lum) = m.lum {
        l = percent_to_ratio(lum);
    }
    if let Some(lum_mod) = m.lum_mod {
        l *= percent_to_ratio(lum_mod);
    }
    if let Some(lum_off) = m.lum_off {
        l += percent_to_ratio(lum_off);
    }
    hsl_to_rgb(h, s, l)
}

/// Darken toward black: `c * shade`.
pub fn apply_shade(rgb: Rgb, shade: f64) -> Rgb {
    let f = percent_to_ratio(shade).clamp(0.0, 1.0);
    Rgb {
        r: rgb.r * f,
        g: rgb.g * f,
        b: rgb.b * f,
    }
}

/// Lighten toward white: `c + (255 - c) * (1 - tint)`.
pub fn apply_tint(rgb: Rgb, tint: f64) -> Rgb {
    let f = percent_to_ratio(tint).clamp(0.0, 1.0);
    let t = |c: f64| c + (255.0 - c) * (1.0 - f);
    Rgb {
        r: t(rgb.r),
        g: t(rgb.g),
        b: t(rgb.b),
    }
}

/// Scale saturation by `satMod`.
pub fn apply_sat_mod(rgb: Rgb, sat_mod: f64) -> Rgb {
    let (h, s, l) = rgb_to_hsl(rgb);
    hsl_to_rgb(h, s * percent_to_ratio(sat_mod), l)
}

/// Apply all modifiers in the fixed order.
pub fn apply_modifiers(rgb: Rgb, m: &ColorModifiers) -> Rgb {
    let mut rgb = apply_luminance(rgb, m);
    if let Some(shade) = m.shade {
        rgb = apply_shade(rgb, shade);
    }
    if let Some(tint) = m.tint {
        rgb = apply_tint(rgb, tint);
    }
    if let Some(sat_mod) = m.sat_mod {
        rgb = apply_sat_mod(rgb, sat_mod);
    }
    if m.comp {
        let (h, s, l) = rgb_to_hsl(rgb);
        rgb = hsl_to_rgb(h + 180.0, s, l);
    }
    if m.inv {
        rgb = Rgb {
            r: 255.0 - rgb.r,
            g: 255.0 - rgb.g,
            b: 255.0 - rgb.b,
        };
    }
    if m.gray {
        let y = 0.299 * rgb.r + 0.587 * rgb.g + 0.114 * rgb.b;
        rgb = Rgb { r: y, g: y, b: y };
    }
    rgb
}

/// Scale a hex color's brightness by `factor` (1.0 = unchanged).
pub fn adjust_brightness(hex: &str, factor: f64) -> String {
    match hex_to_rgb(hex) {
        Some(rgb) => rgb_to_hex(Rgb {
            r: rgb.r * factor,
            g: rgb.g * factor,
            b: rgb.b * factor,
        }),
        None => hex.to_string(),
    }
}

fn is_color_element(node: &XmlNode) -> bool {
    COLOR_ELEMENTS.contains(&node.local_name())
}

/// The color element itself, or the first color child of a fill container.
pub fn color_element(node: &XmlNode) -> Option<&XmlNode> {
    if is_color_element(node) {
        Some(node)
    } else {
        node.children.iter().find(|c| is_color_element(c))
    }
}

fn base_hex(color: &XmlNode, ctx: &ColorContext) -> Option<String> {
    match color.local_name() {
        "srgbClr" => color
            .val()
            .filter(|v| hex_to_rgb(v).is_some())
            .map(str::to_string),
        "schemeClr" => color.val().and_then(|v| ctx.scheme_hex(v)),
        "sysClr" => color
            .attr("lastClr")
            .filter(|v| hex_to_rgb(v).is_some())
            .map(str::to_string)
            .or_else(|| color.val().and_then(system_color).map(str::to_string)),
        "prstClr" => color.val().and_then(preset_color).map(str::to_string),
        "scrgbClr" => {
            let lin = |k: &str| percent_to_ratio(color.attr_f64(k).unwrap_or(0.0));
            let gamma = |c: f64| {
                let c = c.clamp(0.0, 1.0);
                let s = if c <= 0.003_130_8 {
                    c * 12.92
                } else {
                    1.055 * c.powf(1.0 / 2.4) - 0.055
                };
                s * 255.0
            };
            Some(
                rgb_to_hex(Rgb {
                    r: gamma(lin("r")),
                    g: gamma(lin("g")),
                    b: gamma(lin("b")),
                })
                .trim_start_matches('#')
                .to_string(),
            )
        }
        "hslClr" => {
            let h = angle_to_deg(color.attr_f64("hue").unwrap_or(0.0));
            let s = percent_to_ratio(color.attr_f64("sat").unwrap_or(0.0));
            let l = percent_to_ratio(color.attr_f64("lum").unwrap_or(0.0));
            Some(
                rgb_to_hex(hsl_to_rgb(h, s, l))
                    .trim_start_matches('#')
                    .to_string(),
            )
        }
        _ => None,
    }
}

/// Resolve a color element (or fill container holding one).
///
/// Returns `None` for anything unresolvable; callers pick the fallback.
pub fn resolve_color(node: &XmlNode, ctx: &ColorContext) -> Option<ResolvedColor> {
    let color = color_element(node)?;
    let Some(base) = base_hex(color, ctx) else {
        tracing::debug!(element = color.local_name(), value = ?color.val(), "unresolved color");
        return None;
    };
    let mods = ColorModifiers::from_node(color);

    let hex = if mods.is_empty() || only_alpha(&mods) {
        format!("#{}", base)
    } else {
        let rgb = hex_to_rgb(&base)?;
        rgb_to_hex(apply_modifiers(rgb, &mods))
    };

    let mut alpha = mods.alpha.map(percent_to_ratio).unwrap_or(1.0);
    if let Some(alpha_mod) = mods.alpha_mod {
        alpha *= percent_to_ratio(alpha_mod);
    }
    if let Some(alpha_off) = mods.alpha_off {
        alpha += percent_to_ratio(alpha_off);
    }

    Some(ResolvedColor {
        hex,
        alpha: alpha.clamp(0.0, 1.0),
        scheme: if color.is("schemeClr") {
            color.val().map(str::to_string)
        } else {
            None
        },
        lum_mod: mods.lum_mod,
        lum_off: mods.lum_off,
        alpha_raw: mods.alpha,
    })
}

fn only_alpha(m: &ColorModifiers) -> bool {
    let stripped = ColorModifiers {
        alpha: None,
        alpha_mod: None,
        alpha_off: None,
        ..m.clone()
    };
    stripped.is_empty()
}

/// Resolve to a hex string, failing soft to `#000000`.
pub fn resolve_hex_or_black(node: Option<&XmlNode>, ctx: &ColorContext) -> String {
    node.and_then(|n| resolve_color(n, ctx))
        .map(|c| c.hex)
        .unwrap_or_else(|| "#000000".to_string())
}

/// Resolve to a CSS color, failing soft to `transparent`.
pub fn resolve_css_or_transparent(node: Option<&XmlNode>, ctx: &ColorContext) -> String {
    node.and_then(|n| resolve_color(n, ctx))
        .map(|c| c.to_css())
        .unwrap_or_else(|| "transparent".to_string())
}

/// DrawingML preset color names (`a:prstClr/@val`).
pub fn preset_color(name: &str) -> Option<&'static str> {
    Some(match name {
        "black" => "000000",
        "white" => "FFFFFF",
        "red" => "FF0000",
        "green" => "008000",
        "blue" => "0000FF",
        "yellow" => "FFFF00",
        "cyan" | "aqua" => "00FFFF",
        "magenta" | "fuchsia" => "FF00FF",
        "gray" | "grey" => "808080",
        "silver" => "C0C0C0",
        "maroon" => "800000",
        "olive" => "808000",
        "lime" => "00FF00",
        "teal" => "008080",
        "navy" => "000080",
        "purple" => "800080",
        "orange" => "FFA500",
        "pink" => "FFC0CB",
        "brown" => "A52A2A",
        "gold" => "FFD700",
        "indigo" => "4B0082",
        "violet" => "EE82EE",
        "coral" => "FF7F50",
        "crimson" => "DC143C",
        "salmon" => "FA8072",
        "tomato" => "FF6347",
        "khaki" => "F0E68C",
        "beige" => "F5F5DC",
        "ivory" => "FFFFF0",
        "lavender" => "E6E6FA",
        "tan" => "D2B48C",
        "turquoise" => "40E0D0",
        "orchid" => "DA70D6",
        "plum" => "DDA0DD",
        "chocolate" => "D2691E",
        "skyBlue" => "87CEEB",
        "steelBlue" => "4682B4",
        "royalBlue" => "4169E1",
        "dkGray" | "darkGray" => "A9A9A9",
        "ltGray" | "lightGray" => "D3D3D3",
        "dkBlue" | "darkBlue" => "00008B",
        "dkRed" | "darkRed" => "8B0000",
        "dkGreen" | "darkGreen" => "006400",
        "ltBlue" | "lightBlue" => "ADD8E6",
        "ltGreen" | "lightGreen" => "90EE90",
        "ltYellow" | "lightYellow" => "FFFFE0",
        "forestGreen" => "228B22",
        "seaGreen" => "2E8B57",
        "slateGray" => "708090",
        "wheat" => "F5DEB3",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse;

    fn ctx() -> ColorContext {
        ColorContext::default()
    }

    #[test]
    fn test_srgb_without_modifiers_is_verbatim() {
        for val in ["FF0000", "4472c4", "00aa11"] {
            let node = parse(&format!(r#"<a:srgbClr val="{}"/>"#, val)).unwrap();
            assert_eq!(resolve_color(&node, &ctx()).unwrap().hex, format!("#{}", val));
        }
    }

    #[test]
    fn test_fill_container() {
        let node = parse(r#"<a:solidFill><a:schemeClr val="accent2"/></a:solidFill>"#).unwrap();
        let c = resolve_color(&node, &ctx()).unwrap();
        assert_eq!(c.hex, "#ED7D31");
        assert_eq!(c.scheme.as_deref(), Some("accent2"));
    }

    #[test]
    fn test_lum_mod_off() {
        // The "lighter 40%" swatch of accent1.
        let node = parse(
            r#"<a:schemeClr val="accent1"><a:lumMod val="60000"/><a:lumOff val="40000"/></a:schemeClr>"#,
        )
        .unwrap();
        let c = resolve_color(&node, &ctx()).unwrap();
        assert_eq!(c.lum_mod, Some(60000.0));
        assert_eq!(c.lum_off, Some(40000.0));
        let (_, _, l) = rgb_to_hsl(hex_to_rgb(&c.hex).unwrap());
        let (_, _, base_l) = rgb_to_hsl(hex_to_rgb("4472C4").unwrap());
        assert!((l - (base_l * 0.6 + 0.4)).abs() < 0.01);
    }

    #[test]
    fn test_luminance_applies_before_tint() {
        // Child order in XML lists tint first; resolution must still run lumMod first.
        let node = parse(
            r#"<a:srgbClr val="4472C4"><a:tint val="50000"/><a:lumMod val="50000"/></a:srgbClr>"#,
        )
        .unwrap();
        let resolved = resolve_color(&node, &ctx()).unwrap().hex;

        let base = hex_to_rgb("4472C4").unwrap();
        let lum = ColorModifiers {
            lum_mod: Some(50000.0),
            ..Default::default()
        };
        let lum_first = rgb_to_hex(apply_tint(apply_luminance(base, &lum), 50000.0));
        let tint_first = rgb_to_hex(apply_luminance(apply_tint(base, 50000.0), &lum));

        assert_eq!(resolved, lum_first);
        assert_ne!(lum_first, tint_first);
    }

    #[test]
    fn test_shade() {
        let node = parse(r#"<a:srgbClr val="FF8000"><a:shade val="50000"/></a:srgbClr>"#).unwrap();
        assert_eq!(resolve_color(&node, &ctx()).unwrap().hex, "#804000");
    }

    #[test]
    fn test_alpha() {
        let node = parse(r#"<a:srgbClr val="000000"><a:alpha val="25000"/></a:srgbClr>"#).unwrap();
        let c = resolve_color(&node, &ctx()).unwrap();
        assert_eq!(c.hex, "#000000");
        assert!((c.alpha - 0.25).abs() < 1e-9);
        assert_eq!(c.alpha_raw, Some(25000.0));
        assert_eq!(c.to_css(), "rgba(0, 0, 0, 0.25)");
    }

    #[test]
    fn test_other_color_kinds() {
        let sys = parse(r#"<a:sysClr val="window"/>"#).unwrap();
        assert_eq!(resolve_color(&sys, &ctx()).unwrap().hex, "#FFFFFF");
        let sys = parse(r#"<a:sysClr val="windowText" lastClr="1F1F1F"/>"#).unwrap();
        assert_eq!(resolve_color(&sys, &ctx()).unwrap().hex, "#1F1F1F");
        let sys = parse(r#"<a:sysClr val="window" lastClr="oops"/>"#).unwrap();
        assert_eq!(resolve_color(&sys, &ctx()).unwrap().hex, "#FFFFFF");
        let prst = parse(r#"<a:prstClr val="black"/>"#).unwrap();
        assert_eq!(resolve_color(&prst, &ctx()).unwrap().hex, "#000000");
        let hsl = parse(r#"<a:hslClr hue="0" sat="100000" lum="50000"/>"#).unwrap();
        assert_eq!(resolve_color(&hsl, &ctx()).unwrap().hex, "#FF0000");
        let scrgb = parse(r#"<a:scrgbClr r="100000" g="0" b="0"/>"#).unwrap();
        assert_eq!(resolve_color(&scrgb, &ctx()).unwrap().hex, "#FF0000");
    }

    #[test]
    fn test_unresolvable_fails_soft() {
        let bad = parse(r#"<a:srgbClr val="zzz"/>"#).unwrap();
        assert!(resolve_color(&bad, &ctx()).is_none());
        assert_eq!(resolve_hex_or_black(Some(&bad), &ctx()), "#000000");
        assert_eq!(resolve_css_or_transparent(None, &ctx()), "transparent");
    }

    #[test]
    fn test_hsl_roundtrip() {
        let rgb = hex_to_rgb("#5B9BD5").unwrap();
        let (h, s, l) = rgb_to_hsl(rgb);
        assert_eq!(rgb_to_hex(hsl_to_rgb(h, s, l)), "#5B9BD5");
    }
}

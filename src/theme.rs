//! Theme color schemes and master color maps.
//!
//! A scheme color reference (`<a:schemeClr val="tx1"/>`) is resolved in two
//! hops: the master's `p:clrMap` maps logical names (`tx1`, `bg1`, ...) to
//! theme slots (`dk1`, `lt1`, ...), and the theme's `a:clrScheme` maps the
//! slot to an RGB value.

use crate::xml::XmlNode;
use serde::Serialize;
use std::collections::HashMap;

/// Theme slot names in `a:clrScheme` order.
pub const THEME_SLOTS: [&str; 12] = [
    "dk1", "lt1", "dk2", "lt2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// Default Office theme (2013+) palette, used when a package has no theme part.
const OFFICE_THEME: [(&str, &str); 12] = [
    ("dk1", "000000"),
    ("lt1", "FFFFFF"),
    ("dk2", "44546A"),
    ("lt2", "E7E6E6"),
    ("accent1", "4472C4"),
    ("accent2", "ED7D31"),
    ("accent3", "A5A5A5"),
    ("accent4", "FFC000"),
    ("accent5", "5B9BD5"),
    ("accent6", "70AD47"),
    ("hlink", "0563C1"),
    ("folHlink", "954F72"),
];

/// Resolved theme color scheme: slot name → `RRGGBB` (uppercase, no `#`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeColors {
    /// Scheme name from `a:clrScheme/@name`.
    pub name: String,
    colors: HashMap<String, String>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            name: "Office".to_string(),
            colors: OFFICE_THEME
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ThemeColors {
    /// Parse a theme part root (`a:theme`). Missing slots keep Office defaults.
    pub fn from_theme(theme: &XmlNode) -> Self {
        let mut result = Self::default();
        let Some(scheme) = theme.find("clrScheme") else {
            return result;
        };
        if let Some(name) = scheme.attr("name") {
            result.name = name.to_string();
        }
        for slot in &scheme.children {
            let Some(color) = slot.children.first() else {
                continue;
            };
            let value = match color.local_name() {
                "srgbClr" => color.val().filter(|v| is_hex6(v)).map(str::to_string),
                "sysClr" => color
                    .attr("lastClr")
                    .filter(|v| is_hex6(v))
                    .map(str::to_string)
                    .or_else(|| color.val().and_then(system_color).map(str::to_string)),
                _ => None,
            };
            if let Some(value) = value {
                result
                    .colors
                    .insert(slot.local_name().to_string(), value.to_uppercase());
            }
        }
        result
    }

    /// Hex value (`RRGGBB`) for a theme slot.
    pub fn get(&self, slot: &str) -> Option<&str> {
        self.colors.get(slot).map(String::as_str)
    }

    /// Override a slot (used by tests and by callers with custom palettes).
    pub fn set(&mut self, slot: impl Into<String>, hex: impl Into<String>) {
        self.colors.insert(slot.into(), hex.into().to_uppercase());
    }
}

/// Master-slide color map (`p:clrMap`) from logical names to theme slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorMap {
    mapping: HashMap<String, String>,
}

impl Default for ColorMap {
    fn default() -> Self {
        let pairs = [
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ];
        Self {
            mapping: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl ColorMap {
    /// Build from a `p:clrMap` (or `a:overrideClrMapping`) element.
    pub fn from_node(node: &XmlNode) -> Self {
        let mut map = Self::default();
        map.apply_overrides(node);
        map
    }

    /// Apply attributes of a `p:clrMap`-shaped element on top of this map.
    pub fn apply_overrides(&mut self, node: &XmlNode) {
        for (key, value) in &node.attrs {
            let key = crate::xml::local_name(key);
            if key.starts_with("xmlns") {
                continue;
            }
            self.mapping.insert(key.to_string(), value.clone());
        }
    }

    /// Map a logical scheme name to a theme slot. Names that are already
    /// slots (`dk1`, `accent3`) pass through.
    pub fn slot_for<'a>(&'a self, name: &'a str) -> &'a str {
        self.mapping.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// Read-only color context threaded through every renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorContext {
    /// Theme palette.
    pub theme: ThemeColors,
    /// Master (or slide-override) color map.
    pub color_map: ColorMap,
    /// Color substituted for `phClr` (style-matrix placeholder).
    pub placeholder: Option<String>,
}

impl ColorContext {
    /// Build a context from a theme and color map.
    pub fn new(theme: ThemeColors, color_map: ColorMap) -> Self {
        Self {
            theme,
            color_map,
            placeholder: None,
        }
    }

    /// A copy with `phClr` bound to `hex`.
    pub fn with_placeholder(&self, hex: impl Into<String>) -> Self {
        let mut ctx = self.clone();
        ctx.placeholder = Some(hex.into());
        ctx
    }

    /// Resolve a scheme name (`tx1`, `accent2`, `phClr`) to `RRGGBB`.
    pub fn scheme_hex(&self, name: &str) -> Option<String> {
        if name == "phClr" {
            return self
                .placeholder
                .as_ref()
                .map(|p| p.trim_start_matches('#').to_uppercase());
        }
        let slot = self.color_map.slot_for(name);
        self.theme
            .get(slot)
            .or_else(|| self.theme.get(name))
            .map(str::to_string)
    }
}

fn is_hex6(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// System color defaults for `a:sysClr` without `lastClr`.
pub fn system_color(name: &str) -> Option<&'static str> {
    Some(match name {
        "windowText" | "menuText" | "captionText" | "btnText" | "infoText" => "000000",
        "window" | "menu" | "btnHighlight" | "highlightText" => "FFFFFF",
        "btnFace" | "menuBar" | "3dLight" => "F0F0F0",
        "btnShadow" | "3dDkShadow" => "A0A0A0",
        "highlight" | "hotLight" => "0078D7",
        "grayText" => "6D6D6D",
        "activeBorder" | "inactiveBorder" => "B4B4B4",
        "activeCaption" => "99B4D1",
        "inactiveCaption" => "BFCDDB",
        "infoBk" => "FFFFE1",
        "scrollBar" | "appWorkspace" => "C8C8C8",
        "background" => "000000",
        _ => return None,
    })
}

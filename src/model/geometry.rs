//! Placement and crop structures.

use serde::{Deserialize, Serialize};

/// Pixel-space placement of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Left edge in px
    pub x: f64,
    /// Top edge in px
    pub y: f64,
    /// Width in px (never below 1)
    pub width: f64,
    /// Height in px (never below 1)
    pub height: f64,
    /// Clockwise rotation in degrees
    pub rotation: f64,
    /// Horizontal flip
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flip_h: bool,
    /// Vertical flip
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub flip_v: bool,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            rotation: 0.0,
            flip_h: false,
            flip_v: false,
        }
    }
}

impl Position {
    /// Create an unrotated position; width and height are clamped to 1px.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: clamp_extent(width),
            height: clamp_extent(height),
            ..Default::default()
        }
    }

    /// Horizontal center in px.
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical center in px.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// CSS `transform` value for rotation and flips, or `None` when identity.
    pub fn css_transform(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.rotation.abs() > f64::EPSILON {
            parts.push(format!("rotate({}deg)", crate::units::fmt_num(self.rotation, 2)));
        }
        if self.flip_h {
            parts.push("scaleX(-1)".to_string());
        }
        if self.flip_v {
            parts.push("scaleY(-1)".to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Clamp a computed extent to at least 1px; non-finite values become 1px.
pub fn clamp_extent(value: f64) -> f64 {
    if value.is_finite() && value >= 1.0 {
        value
    } else {
        1.0
    }
}

/// Image crop/extend percentages from `a:srcRect` / `a:fillRect`.
///
/// Positive values crop that edge inward; negative values extend (zoom out).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CroppingSpec {
    pub has_left: bool,
    pub has_top: bool,
    pub has_right: bool,
    pub has_bottom: bool,
    /// Left edge percent
    pub left: f64,
    /// Top edge percent
    pub top: f64,
    /// Right edge percent
    pub right: f64,
    /// Bottom edge percent
    pub bottom: f64,
    /// Whether the values came from `a:fillRect` (stretch) rather than `a:srcRect`
    pub is_fill_rect: bool,
}

impl CroppingSpec {
    /// Whether any edge is set.
    pub fn is_cropped(&self) -> bool {
        self.has_left || self.has_top || self.has_right || self.has_bottom
    }
}

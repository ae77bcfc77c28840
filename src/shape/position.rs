//! Transform nodes to pixel positions.

use crate::model::{clamp_extent, Position};
use crate::units::{angle_to_deg, emu_attr_px, DEFAULT_EXTENT_EMU};
use crate::xml::XmlNode;

/// Build a [`Position`] from an `a:xfrm` / `p:xfrm` node.
///
/// Missing offsets read as 0, missing extents as the default extent, and
/// zero-size shapes are clamped to 1px.
pub fn position_from_xfrm(xfrm: Option<&XmlNode>) -> Position {
    let off = xfrm.and_then(|x| x.child("a:off"));
    let ext = xfrm.and_then(|x| x.child("a:ext"));
    Position {
        x: emu_attr_px(off, "x", 0),
        y: emu_attr_px(off, "y", 0),
        width: clamp_extent(emu_attr_px(ext, "cx", DEFAULT_EXTENT_EMU)),
        height: clamp_extent(emu_attr_px(ext, "cy", DEFAULT_EXTENT_EMU)),
        rotation: xfrm
            .and_then(|x| x.attr_f64("rot"))
            .map(angle_to_deg)
            .unwrap_or(0.0),
        flip_h: xfrm.and_then(|x| x.attr_bool("flipH")).unwrap_or(false),
        flip_v: xfrm.and_then(|x| x.attr_bool("flipV")).unwrap_or(false),
    }
}

/// The transform node of any slide element (`p:sp`, `p:pic`, `p:cxnSp`,
/// `p:graphicFrame`, `p:grpSp`).
pub fn element_xfrm(element: &XmlNode) -> Option<&XmlNode> {
    element
        .get(&["p:spPr", "a:xfrm"])
        .or_else(|| element.child("p:xfrm"))
        .or_else(|| element.get(&["p:grpSpPr", "a:xfrm"]))
}

/// Position of a slide element.
pub fn element_position(element: &XmlNode) -> Position {
    position_from_xfrm(element_xfrm(element))
}

/// Child coordinate mapping of a group shape (`a:chOff`/`a:chExt`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    x: f64,
    y: f64,
    scale_x: f64,
    scale_y: f64,
    ch_x: f64,
    ch_y: f64,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            ch_x: 0.0,
            ch_y: 0.0,
        }
    }
}

impl GroupTransform {
    /// Build from a group's `a:xfrm`.
    pub fn from_xfrm(xfrm: Option<&XmlNode>) -> Self {
        let Some(xfrm) = xfrm else {
            return Self::default();
        };
        let off = xfrm.child("a:off");
        let ext = xfrm.child("a:ext");
        let ch_off = xfrm.child("a:chOff");
        let ch_ext = xfrm.child("a:chExt");
        let width = emu_attr_px(ext, "cx", 0);
        let height = emu_attr_px(ext, "cy", 0);
        let ch_width = emu_attr_px(ch_ext, "cx", 0);
        let ch_height = emu_attr_px(ch_ext, "cy", 0);
        Self {
            x: emu_attr_px(off, "x", 0),
            y: emu_attr_px(off, "y", 0),
            scale_x: if ch_width > 0.0 { width / ch_width } else { 1.0 },
            scale_y: if ch_height > 0.0 { height / ch_height } else { 1.0 },
            ch_x: emu_attr_px(ch_off, "x", 0),
            ch_y: emu_attr_px(ch_off, "y", 0),
        }
    }

    /// Compose: `inner` is nested inside `self`.
    pub fn then(&self, inner: &GroupTransform) -> GroupTransform {
        let outer_x = self.x + (inner.x - self.ch_x) * self.scale_x;
        let outer_y = self.y + (inner.y - self.ch_y) * self.scale_y;
        GroupTransform {
            x: outer_x,
            y: outer_y,
            scale_x: self.scale_x * inner.scale_x,
            scale_y: self.scale_y * inner.scale_y,
            ch_x: inner.ch_x,
            ch_y: inner.ch_y,
        }
    }

    /// Map a child-space position into slide space.
    pub fn apply(&self, pos: &Position) -> Position {
        Position {
            x: self.x + (pos.x - self.ch_x) * self.scale_x,
            y: self.y + (pos.y - self.ch_y) * self.scale_y,
            width: clamp_extent(pos.width * self.scale_x),
            height: clamp_extent(pos.height * self.scale_y),
            ..*pos
        }
    }
}

//! Chart-XML styling post-fixer.
//!
//! Chart parts written by other generators carry a handful of styling
//! defects (white bar outlines, narrow gaps, dark gridlines, rounded chart
//! corners). The fixer parses each part, applies an ordered catalog of tree
//! edits and writes the part back only when something changed. Every edit
//! is idempotent: a second run over its own output changes nothing.
//!
//! Rewritten parts go through [`XmlNode`], so comments and processing
//! instructions inside a chart part are dropped when the part changes.
//! Unchanged parts are never rewritten.

use crate::error::Result;
use crate::xml::{parse_document, XmlNode};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Gap between bar clusters written by the fixer (percent of bar width).
pub const GAP_WIDTH: &str = "219";
/// Overlap written for clustered bar charts.
pub const OVERLAP: &str = "-27";
/// Major gridline color.
pub const GRIDLINE_COLOR: &str = "D9D9D9";
/// Major gridline width (0.75pt, in EMU).
pub const GRIDLINE_WIDTH: &str = "9525";

type FixPass = fn(&mut XmlNode) -> bool;

/// The fix catalog, applied in order.
const FIXES: [(&str, FixPass); 7] = [
    ("strip-series-borders", strip_series_borders),
    ("gap-width", normalize_gap_width),
    ("overlap", normalize_overlap),
    ("gridlines", normalize_gridlines),
    ("tick-marks", remove_tick_marks),
    ("legend-position", move_legend_to_bottom),
    ("rounded-corners", disable_rounded_corners),
];

/// Result of fixing one chart part.
#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    /// The (possibly unchanged) chart XML
    pub xml: String,
    /// Names of the passes that changed something, in order
    pub applied: Vec<&'static str>,
}

impl FixOutcome {
    /// Whether any pass changed the part.
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Result of fixing a slide's chart directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixReport {
    pub success: bool,
    /// Files rewritten
    pub charts_fixed: usize,
    /// Chart parts found
    pub total_charts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FixReport {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

fn prefix_of(name: &str) -> &str {
    match name.find(':') {
        Some(i) => &name[..=i],
        None => "",
    }
}

fn set_val(node: &mut XmlNode, value: &str) -> bool {
    if node.val() == Some(value) {
        return false;
    }
    node.set_attr("val", value);
    true
}

/// Apply `f` to every bar chart plot node.
fn for_each_bar_chart(root: &mut XmlNode, f: &mut dyn FnMut(&mut XmlNode) -> bool) -> bool {
    let mut changed = false;
    root.walk_mut(&mut |node| {
        if node.is("barChart") || node.is("bar3DChart") {
            changed |= f(node);
        }
    });
    changed
}

fn is_white_fill(fill: &XmlNode) -> bool {
    fill.children.iter().any(|color| {
        let val = color.val().unwrap_or("");
        match color.local_name() {
            "srgbClr" => val.eq_ignore_ascii_case("FFFFFF"),
            "prstClr" => val == "white",
            "schemeClr" => matches!(val, "bg1" | "lt1"),
            "sysClr" => val == "window",
            _ => false,
        }
    })
}

fn is_unwanted_border(ln: &XmlNode) -> bool {
    if ln.children.len() == 1 && ln.children[0].is("noFill") && ln.attr("w").is_none() {
        return false;
    }
    let zero_width = ln
        .attr("w")
        .and_then(|w| w.trim().parse::<f64>().ok())
        .is_some_and(|w| w == 0.0);
    zero_width || ln.child("solidFill").is_some_and(is_white_fill)
}

fn no_border(name: &str) -> XmlNode {
    XmlNode::new(name).with_child(XmlNode::new(format!("{}noFill", prefix_of(name))))
}

/// Replace white or zero-width bar outlines with `<a:ln><a:noFill/></a:ln>`.
fn strip_series_borders(root: &mut XmlNode) -> bool {
    for_each_bar_chart(root, &mut |chart| {
        let mut changed = false;
        chart.walk_mut(&mut |node| {
            if !node.is("spPr") {
                return;
            }
            for child in node.children.iter_mut().filter(|c| c.is("ln")) {
                if is_unwanted_border(child) {
                    *child = no_border(&child.name);
                    changed = true;
                }
            }
        });
        changed
    })
}

fn normalize_gap_width(root: &mut XmlNode) -> bool {
    let mut changed = false;
    root.walk_mut(&mut |node| {
        if node.is("gapWidth") {
            changed |= set_val(node, GAP_WIDTH);
        }
    });
    changed
}

/// Overlap only applies to clustered bars; stacked charts need 100.
fn normalize_overlap(root: &mut XmlNode) -> bool {
    for_each_bar_chart(root, &mut |chart| {
        let clustered = chart
            .child("grouping")
            .and_then(|g| g.val())
            .map_or(true, |g| g == "clustered");
        if !clustered {
            return false;
        }
        chart
            .children
            .iter_mut()
            .filter(|c| c.is("overlap"))
            .fold(false, |acc, c| set_val(c, OVERLAP) | acc)
    })
}

const FILL_NAMES: [&str; 5] = ["noFill", "solidFill", "gradFill", "pattFill", "blipFill"];

fn gridline_ok(gridlines: &XmlNode) -> bool {
    let Some(ln) = gridlines.get(&["spPr", "ln"]) else {
        return false;
    };
    let fills: Vec<&XmlNode> = ln
        .children
        .iter()
        .filter(|c| FILL_NAMES.contains(&c.local_name()))
        .collect();
    ln.attr("w") == Some(GRIDLINE_WIDTH)
        && fills.len() == 1
        && fills[0].is("solidFill")
        && fills[0]
            .child("srgbClr")
            .is_some_and(|c| c.val() == Some(GRIDLINE_COLOR) && c.children.is_empty())
}

fn ensure_child<'a>(node: &'a mut XmlNode, name: &str) -> &'a mut XmlNode {
    let index = match node.children.iter().position(|c| c.is(name)) {
        Some(i) => i,
        None => {
            node.children.push(XmlNode::new(name));
            node.children.len() - 1
        }
    };
    &mut node.children[index]
}

/// Light-gray 0.75pt major gridlines.
fn normalize_gridlines(root: &mut XmlNode) -> bool {
    let mut changed = false;
    root.walk_mut(&mut |node| {
        if !node.is("majorGridlines") || gridline_ok(node) {
            return;
        }
        let chart_prefix = prefix_of(&node.name).to_string();
        let sp_pr = ensure_child(node, &format!("{}spPr", chart_prefix));
        let ln = ensure_child(sp_pr, "a:ln");
        let drawing_prefix = prefix_of(&ln.name).to_string();
        ln.set_attr("w", GRIDLINE_WIDTH);
        ln.children.retain(|c| !FILL_NAMES.contains(&c.local_name()));
        let fill = XmlNode::new(format!("{}solidFill", drawing_prefix)).with_child(
            XmlNode::new(format!("{}srgbClr", drawing_prefix)).with_attr("val", GRIDLINE_COLOR),
        );
        ln.children.insert(0, fill);
        changed = true;
    });
    changed
}

fn remove_tick_marks(root: &mut XmlNode) -> bool {
    let mut changed = false;
    root.walk_mut(&mut |node| {
        if node.is("majorTickMark") || node.is("minorTickMark") {
            changed |= set_val(node, "none");
        }
    });
    changed
}

fn move_legend_to_bottom(root: &mut XmlNode) -> bool {
    let mut changed = false;
    root.walk_mut(&mut |node| {
        if !node.is("legend") {
            return;
        }
        match node.child_mut("legendPos") {
            Some(pos) => changed |= set_val(pos, "b"),
            None => {
                let name = format!("{}legendPos", prefix_of(&node.name));
                node.children.insert(0, XmlNode::new(name).with_attr("val", "b"));
                changed = true;
            }
        }
    });
    changed
}

/// `c:roundedCorners val="0"`, inserted after `c:date1904`/`c:lang` when absent.
fn disable_rounded_corners(root: &mut XmlNode) -> bool {
    if !root.is("chartSpace") {
        return false;
    }
    if let Some(node) = root.child_mut("roundedCorners") {
        return set_val(node, "0");
    }
    let at = root
        .children
        .iter()
        .take_while(|c| c.is("date1904") || c.is("lang"))
        .count();
    let name = format!("{}roundedCorners", prefix_of(&root.name));
    root.children.insert(at, XmlNode::new(name).with_attr("val", "0"));
    true
}

/// Run the fix catalog over one chart part.
///
/// Parts that need no change come back byte-for-byte unchanged.
pub fn fix_chart_xml(xml: &str) -> Result<FixOutcome> {
    let mut doc = parse_document(xml)?;
    let mut applied = Vec::new();
    for (name, pass) in FIXES {
        if pass(&mut doc.root) {
            tracing::debug!(pass = name, "chart fix applied");
            applied.push(name);
        }
    }
    let xml = if applied.is_empty() {
        xml.to_string()
    } else {
        doc.to_xml()
    };
    Ok(FixOutcome { xml, applied })
}

fn is_chart_part(path: &Path) -> bool {
    path.is_file()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("chart") && n.ends_with(".xml"))
}

fn chart_parts(charts_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut parts: Vec<PathBuf> = std::fs::read_dir(charts_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_chart_part(p))
        .collect();
    parts.sort();
    Ok(parts)
}

fn fix_file(path: &Path) -> Result<bool> {
    let xml = std::fs::read_to_string(path)?;
    let outcome = fix_chart_xml(&xml)?;
    let changed = outcome.changed();
    if changed {
        std::fs::write(path, &outcome.xml)?;
    }
    Ok(changed)
}

/// Fix every `charts/chart*.xml` part under an unpacked package's `ppt/`
/// directory (the directory holding `slides/` and `charts/`).
///
/// A missing `charts/` directory is a success with nothing to do. Per-file
/// failures are logged and skipped.
pub fn fix_charts_in_dir(slide_xml_dir: impl AsRef<Path>) -> FixReport {
    let charts_dir = slide_xml_dir.as_ref().join("charts");
    if !charts_dir.is_dir() {
        tracing::debug!(dir = %charts_dir.display(), "no charts directory");
        return FixReport {
            success: true,
            ..Default::default()
        };
    }
    let parts = match chart_parts(&charts_dir) {
        Ok(parts) => parts,
        Err(e) => return FixReport::failed(e.to_string()),
    };

    let mut report = FixReport {
        success: true,
        total_charts: parts.len(),
        ..Default::default()
    };
    for path in parts {
        match fix_file(&path) {
            Ok(true) => report.charts_fixed += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "skipping chart part"),
        }
    }
    report
}

/// Async variant of [`fix_charts_in_dir`] using `tokio::fs`.
#[cfg(feature = "async")]
pub async fn fix_charts_in_dir_async(slide_xml_dir: impl AsRef<Path>) -> FixReport {
    let charts_dir = slide_xml_dir.as_ref().join("charts");
    let mut entries = match tokio::fs::read_dir(&charts_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return FixReport {
                success: true,
                ..Default::default()
            }
        }
        Err(e) => return FixReport::failed(e.to_string()),
    };

    let mut parts = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if is_chart_part(&path) {
                    parts.push(path);
                }
            }
            Ok(None) => break,
            Err(e) => return FixReport::failed(e.to_string()),
        }
    }
    parts.sort();

    let mut report = FixReport {
        success: true,
        total_charts: parts.len(),
        ..Default::default()
    };
    for path in parts {
        let result = async {
            let xml = tokio::fs::read_to_string(&path).await?;
            let outcome = fix_chart_xml(&xml)?;
            let changed = outcome.changed();
            if changed {
                tokio::fs::write(&path, &outcome.xml).await?;
            }
            Ok::<bool, crate::error::Error>(changed)
        }
        .await;
        match result {
            Ok(true) => report.charts_fixed += 1,
            Ok(false) => {}
            Err(e) => tracing::warn!(file = %path.display(), error = %e, "skipping chart part"),
        }
    }
    report
}

//! ZIP package access for presentation files.
//!
//! Parts are read on demand from an in-memory archive. XML parts are decoded
//! (UTF-8 or UTF-16 with a BOM) and parsed into [`XmlNode`] trees;
//! relationship parts resolve `r:id` references to package paths.

use crate::error::{Error, Result};
use crate::xml::{parse, XmlNode};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// Relationship type suffixes (the part after `/relationships/`).
pub mod rel_types {
    pub const OFFICE_DOCUMENT: &str = "officeDocument";
    pub const SLIDE: &str = "slide";
    pub const SLIDE_LAYOUT: &str = "slideLayout";
    pub const SLIDE_MASTER: &str = "slideMaster";
    pub const THEME: &str = "theme";
    pub const IMAGE: &str = "image";
    pub const CHART: &str = "chart";
}

/// One `Relationship` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    /// Full relationship type URI
    pub rel_type: String,
    /// Target as written (relative to the source part)
    pub target: String,
    /// `TargetMode="External"`
    pub external: bool,
}

impl Relationship {
    /// Whether the type URI ends with `/{suffix}`.
    pub fn is_type(&self, suffix: &str) -> bool {
        self.rel_type
            .rsplit('/')
            .next()
            .is_some_and(|last| last == suffix)
    }
}

/// Relationships of one source part, with targets resolved to package paths.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
    order: Vec<String>,
    source: String,
}

impl Relationships {
    /// Parse a `.rels` part belonging to `source_part`.
    pub fn parse(source_part: &str, root: &XmlNode) -> Self {
        let mut rels = Self {
            source: source_part.to_string(),
            ..Default::default()
        };
        for node in root.children_named("Relationship") {
            let Some(id) = node.attr("Id").filter(|id| !id.is_empty()) else {
                continue;
            };
            let rel = Relationship {
                id: id.to_string(),
                rel_type: node.attr("Type").unwrap_or_default().to_string(),
                target: node.attr("Target").unwrap_or_default().to_string(),
                external: node
                    .attr("TargetMode")
                    .is_some_and(|m| m.eq_ignore_ascii_case("external")),
            };
            rels.order.push(rel.id.clone());
            rels.by_id.insert(rel.id.clone(), rel);
        }
        rels
    }

    /// Relationship by id.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Package path of an internal relationship target.
    pub fn target_path(&self, id: &str) -> Option<String> {
        self.get(id)
            .filter(|r| !r.external)
            .map(|r| resolve_path(&self.source, &r.target))
    }

    /// Package path of the first relationship of a type.
    pub fn first_of_type(&self, suffix: &str) -> Option<String> {
        self.order
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .find(|r| r.is_type(suffix) && !r.external)
            .map(|r| resolve_path(&self.source, &r.target))
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no relationships.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Path of the `.rels` part for `part` (`ppt/slides/slide1.xml` →
/// `ppt/slides/_rels/slide1.xml.rels`).
pub fn rels_path(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None if part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the part that declares it.
pub fn resolve_path(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').filter(|s| !s.is_empty()).collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Decode XML bytes: UTF-8 (BOM optional) or UTF-16 with a BOM.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| Error::InvalidData(format!("invalid UTF-8: {}", e)));
    }
    let utf16 = match bytes {
        [0xFF, 0xFE, rest @ ..] => Some((rest, true)),
        [0xFE, 0xFF, rest @ ..] => Some((rest, false)),
        _ => None,
    };
    if let Some((rest, little_endian)) = utf16 {
        let units = rest.chunks_exact(2).map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        });
        let text = char::decode_utf16(units)
            .collect::<std::result::Result<String, _>>()
            .map_err(|e| Error::InvalidData(format!("invalid UTF-16: {}", e)))?;
        // The declaration still names UTF-16; the text is UTF-8 now.
        return Ok(text.replacen("encoding=\"UTF-16\"", "encoding=\"UTF-8\"", 1)
            .replacen("encoding=\"utf-16\"", "encoding=\"UTF-8\"", 1));
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}

/// Document properties from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoreProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// An opened presentation package.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path.as_ref())?)
    }

    /// Open a package held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Raw bytes of a part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Decoded text of an XML part.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        decode_xml_bytes(&self.read_binary(path)?)
    }

    /// Parsed root element of an XML part.
    pub fn read_part(&self, path: &str) -> Result<XmlNode> {
        parse(&self.read_xml(path)?)
    }

    /// Whether a part exists.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().index_for_name(path).is_some()
    }

    /// Part names starting with `prefix`.
    pub fn parts_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.archive
            .borrow()
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Relationships of a part; a missing `.rels` part yields none.
    pub fn relationships(&self, part: &str) -> Result<Relationships> {
        let path = rels_path(part);
        if !self.exists(&path) {
            return Ok(Relationships {
                source: part.to_string(),
                ..Default::default()
            });
        }
        Ok(Relationships::parse(part, &self.read_part(&path)?))
    }

    /// Document properties; absent or unreadable parts give defaults.
    pub fn core_properties(&self) -> CoreProperties {
        let Ok(root) = self.read_part("docProps/core.xml") else {
            return CoreProperties::default();
        };
        let text = |name: &str| {
            root.child(name)
                .map(|n| n.text.trim().to_string())
                .filter(|t| !t.is_empty())
        };
        CoreProperties {
            title: text("title"),
            creator: text("creator"),
            modified: text("modified"),
        }
    }
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("parts", &self.archive.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(parts: &[(&str, &[u8])]) -> Package {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        Package::from_bytes(writer.finish().unwrap().into_inner()).unwrap()
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(resolve_path("ppt/slides/slide1.xml", "../media/image1.png"), "ppt/media/image1.png");
        assert_eq!(resolve_path("ppt/presentation.xml", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_path("ppt/slides/slide1.xml", "/ppt/charts/chart1.xml"), "ppt/charts/chart1.xml");
        assert_eq!(resolve_path("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(rels_path("ppt/slides/slide1.xml"), "ppt/slides/_rels/slide1.xml.rels");
        assert_eq!(rels_path(""), "_rels/.rels");
    }

    #[test]
    fn test_relationships() {
        let rels_xml = br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
            <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
            <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
            <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
        </Relationships>"#;
        let pkg = package(&[("ppt/slides/_rels/slide1.xml.rels", rels_xml)]);
        let rels = pkg.relationships("ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.len(), 3);
        assert_eq!(rels.target_path("rId2").as_deref(), Some("ppt/media/image1.png"));
        assert_eq!(rels.target_path("rId3"), None);
        assert_eq!(
            rels.first_of_type(rel_types::SLIDE_LAYOUT).as_deref(),
            Some("ppt/slideLayouts/slideLayout1.xml")
        );
        assert!(pkg.relationships("ppt/slides/slide2.xml").unwrap().is_empty());
    }

    #[test]
    fn test_missing_part() {
        let pkg = package(&[("a.xml", b"<a/>")]);
        assert!(pkg.exists("a.xml"));
        assert!(matches!(pkg.read_part("b.xml"), Err(Error::MissingComponent(_))));
        assert_eq!(pkg.core_properties(), CoreProperties::default());
    }

    #[test]
    fn test_core_properties() {
        let core = br#"<cp:coreProperties xmlns:cp="cp" xmlns:dc="dc" xmlns:dcterms="dcterms"><dc:title>Deck</dc:title><dc:creator>Ana</dc:creator><dcterms:modified>2024-01-01T00:00:00Z</dcterms:modified></cp:coreProperties>"#;
        let pkg = package(&[("docProps/core.xml", core)]);
        let props = pkg.core_properties();
        assert_eq!(props.title.as_deref(), Some("Deck"));
        assert_eq!(props.creator.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_decode_utf16() {
        assert_eq!(decode_xml_bytes(b"\xFF\xFE<\0a\0/\0>\0").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"\xFE\xFF\0<\0a\0/\0>").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"\xEF\xBB\xBF<a/>").unwrap(), "<a/>");
        assert_eq!(decode_xml_bytes(b"<a/>").unwrap(), "<a/>");
    }
}

//! Order-preserving XML element tree.
//!
//! Every PresentationML/DrawingML/ChartML part is read into an [`XmlNode`]
//! tree before rendering. Children keep document order, which custom
//! geometry paths rely on (`moveTo`/`lnTo`/`arcTo` sequences interleave).
//!
//! Lookups compare local names, the same way the event-driven parsers in
//! this crate match `e.name().local_name()`, so `"a:off"` and `"off"` find
//! the same element regardless of the prefix the producer chose.
//! Attributes differ: an unprefixed attribute is in no namespace, so `"id"`
//! and `"r:id"` name different attributes on `<p:sldId id=".." r:id=".."/>`.
//!
//! The tree models element content only. Comments and processing
//! instructions are dropped, and an element's own text is serialized ahead
//! of its children, so mixed content does not survive a round trip. OOXML
//! parts keep text in leaf elements (`a:t`, `c:v`) and are unaffected.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::borrow::Cow;
use std::fmt::Write as _;

/// A single XML element with its attributes, children and text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    /// Qualified element name as written (e.g. `a:srgbClr`).
    pub name: String,
    /// Attributes in document order, keys qualified as written.
    pub attrs: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated text content of this element (not of descendants).
    pub text: String,
}

/// A parsed XML part: optional declaration plus the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Raw declaration contents (`version="1.0" ...`) if present.
    pub declaration: Option<String>,
    /// Root element.
    pub root: XmlNode,
}

/// Strip the namespace prefix from a qualified name.
pub fn local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

impl XmlNode {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// Local (unprefixed) element name.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Whether this element's local name matches `name`'s local name.
    pub fn is(&self, name: &str) -> bool {
        self.local_name() == local_name(name)
    }

    /// Attribute value.
    ///
    /// An unprefixed key only matches unprefixed attributes. A prefixed key
    /// matches the exact qualified name first, then any other prefixed
    /// attribute with the same local name.
    pub fn attr(&self, key: &str) -> Option<&str> {
        let found = if key.contains(':') {
            let local = local_name(key);
            self.attrs.iter().find(|(k, _)| k == key).or_else(|| {
                self.attrs
                    .iter()
                    .find(|(k, _)| k.contains(':') && local_name(k) == local)
            })
        } else {
            self.attrs.iter().find(|(k, _)| k == key)
        };
        found.map(|(_, v)| v.as_str())
    }

    /// Attribute parsed as `f64`; unparseable values read as absent.
    pub fn attr_f64(&self, key: &str) -> Option<f64> {
        self.attr(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Attribute parsed as `i64`; unparseable values read as absent.
    pub fn attr_i64(&self, key: &str) -> Option<i64> {
        self.attr(key).and_then(|v| v.trim().parse::<i64>().ok())
    }

    /// OOXML boolean attribute (`1`, `true`, `on`).
    pub fn attr_bool(&self, key: &str) -> Option<bool> {
        self.attr(key)
            .map(|v| matches!(v.trim(), "1" | "true" | "on"))
    }

    /// Shortcut for the ubiquitous `val` attribute.
    pub fn val(&self) -> Option<&str> {
        self.attr("val")
    }

    /// Set (or replace) an attribute, keeping its position if it exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.attrs.push((key, value));
        }
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.is(name))
    }

    /// Mutable first child with the given local name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlNode> {
        self.children.iter_mut().find(|c| c.is(name))
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.is(name))
    }

    /// Follow a chain of child names, taking the first match at each step.
    pub fn get(&self, path: &[&str]) -> Option<&XmlNode> {
        let mut node = self;
        for name in path {
            node = node.child(name)?;
        }
        Some(node)
    }

    /// Depth-first search for the first descendant with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        for child in &self.children {
            if child.is(name) {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Visit every descendant (pre-order) mutably.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut XmlNode)) {
        for child in &mut self.children {
            f(child);
            child.walk_mut(f);
        }
    }

    /// Collect every descendant with the given local name (pre-order).
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut out = Vec::new();
        self.collect_named(local_name(name), &mut out);
        out
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.local_name() == name {
                out.push(child);
            }
            child.collect_named(name, out);
        }
    }

    /// Concatenated text of this element and all descendants.
    pub fn deep_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.deep_text());
        }
        out
    }

    /// Serialize this element (and descendants) to XML text.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", k, quick_xml::escape::escape(v.as_str()));
        }
        if self.children.is_empty() && self.text.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&quick_xml::escape::escape(self.text.as_str()));
        for child in &self.children {
            child.write_into(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl XmlDocument {
    /// Serialize the document, re-emitting the original declaration.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(ref decl) = self.declaration {
            let _ = write!(out, "<?xml {}?>\r\n", decl.trim());
        }
        out.push_str(&self.root.to_xml());
        out
    }
}

fn bytes_to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn start_node(e: &quick_xml::events::BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(bytes_to_string(e.name().as_ref()));
    for attr in e.attributes() {
        let attr = attr?;
        let key = bytes_to_string(attr.key.as_ref());
        let value = attr
            .unescape_value()
            .unwrap_or_else(|_| Cow::Owned(bytes_to_string(&attr.value)))
            .into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn close_node(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>) {
    if let Some(mut node) = stack.pop() {
        if !node.children.is_empty() && node.text.trim().is_empty() {
            node.text.clear();
        }
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if root.is_none() {
                    *root = Some(node);
                }
            }
        }
    }
}

/// Parse an XML string into a document tree.
pub fn parse_document(xml: &str) -> Result<XmlDocument> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // Whitespace inside a:t runs is significant; structural whitespace is
    // dropped when the element closes.
    reader.config_mut().trim_text(false);

    let mut declaration = None;
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Decl(d)) => {
                let raw = bytes_to_string(&d);
                declaration = Some(raw.trim_start_matches("xml").trim().to_string());
            }
            Ok(Event::Start(e)) => {
                stack.push(start_node(&e)?);
            }
            Ok(Event::Empty(e)) => {
                stack.push(start_node(&e)?);
                close_node(&mut stack, &mut root);
            }
            Ok(Event::End(_)) => {
                close_node(&mut stack, &mut root);
            }
            Ok(Event::Text(t)) => {
                if let Some(node) = stack.last_mut() {
                    let text = t
                        .unescape()
                        .unwrap_or_else(|_| Cow::Owned(bytes_to_string(&t)));
                    node.text.push_str(&text);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&bytes_to_string(&t));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
    }

    // Unclosed elements at EOF still form a tree.
    while !stack.is_empty() {
        close_node(&mut stack, &mut root);
    }

    root.map(|root| XmlDocument { declaration, root })
        .ok_or_else(|| Error::XmlParse("document has no root element".to_string()))
}

/// Parse an XML string and return its root element.
pub fn parse(xml: &str) -> Result<XmlNode> {
    parse_document(xml).map(|doc| doc.root)
}

//! Document loading
//!
//! Reads XLIFF 2.0 XML into a [`Document`]. Elements of the core and module
//! namespaces map onto their [`ElementKind`]; anything else becomes an extension
//! element. Every node goes through the same attach step used when building a
//! tree by hand, so a loaded tree obeys the same structural rules.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::documents::{Document, NodeId};
use crate::elements::ElementKind;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::XmlName;
use crate::namespaces;

/// Prefix bindings of one element
type Scope = HashMap<String, String>;

/// In-scope namespace declarations, innermost last
#[derive(Debug, Default)]
struct NamespaceStack {
    scopes: Vec<Scope>,
}

impl NamespaceStack {
    fn push(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Namespace bound to `prefix`; the empty prefix is the default namespace
    fn lookup(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(namespaces::XML);
        }
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(prefix))
            .map(String::as_str)
            .filter(|ns| !ns.is_empty())
    }
}

/// A start tag with its names resolved
struct StartTag {
    name: XmlName,
    scope: Scope,
    attributes: Vec<(XmlName, String)>,
}

/// Loader for XLIFF documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a document from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading document");
        let bytes = fs::read(path)?;
        self.load_bytes(&bytes)
    }

    /// Load a document from a string
    pub fn load_str(&self, xml: &str) -> Result<Document> {
        self.load_bytes(xml.as_bytes())
    }

    /// Load a document from UTF-8 bytes
    pub fn load_bytes(&self, xml: &[u8]) -> Result<Document> {
        self.limits.check_input_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        let mut doc = Document::new();
        let mut scopes = NamespaceStack::default();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut seen_root = false;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                Error::Xml(format!(
                    "error parsing XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ))
            })?;
            match event {
                Event::Start(e) => {
                    let node = self.open(&mut doc, &mut scopes, &stack, &mut seen_root, &e)?;
                    stack.push(node);
                    self.limits.check_depth(stack.len())?;
                }
                Event::Empty(e) => {
                    self.open(&mut doc, &mut scopes, &stack, &mut seen_root, &e)?;
                    scopes.pop();
                }
                Event::End(_) => {
                    stack.pop();
                    scopes.pop();
                }
                Event::Text(e) => {
                    let text = e.unescape()?;
                    add_text(&mut doc, &stack, &text)?;
                }
                Event::CData(e) => {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| Error::Xml(format!("invalid UTF-8 in CDATA: {}", e)))?;
                    add_text(&mut doc, &stack, text)?;
                }
                Event::DocType(_) => {
                    return Err(Error::Xml("document type declarations are not allowed".into()))
                }
                Event::Eof => break,
                _ => {}
            }
            self.limits.check_nodes(doc.len())?;
            buf.clear();
        }

        if !seen_root {
            return Err(Error::Xml("document has no root element".into()));
        }
        debug!(nodes = doc.len(), "document loaded");
        Ok(doc)
    }

    /// Create the node for a start tag and attach it; returns the node
    fn open(
        &self,
        doc: &mut Document,
        scopes: &mut NamespaceStack,
        stack: &[NodeId],
        seen_root: &mut bool,
        start: &BytesStart<'_>,
    ) -> Result<NodeId> {
        let tag = read_start(start, scopes)?;
        self.limits.check_attributes(tag.attributes.len())?;
        self.limits.check_namespaces(tag.scope.len())?;
        scopes.push(tag.scope);

        let kind = tag
            .name
            .namespace
            .as_deref()
            .and_then(|ns| ElementKind::from_name(ns, &tag.name.local_name));

        let Some(&parent) = stack.last() else {
            if *seen_root {
                return Err(Error::Xml("document has more than one root element".into()));
            }
            if kind != Some(ElementKind::Document) {
                return Err(Error::Xml(format!(
                    "root element must be <xliff> in namespace {}, found {}",
                    namespaces::XLIFF_CORE,
                    tag.name.expanded()
                )));
            }
            *seen_root = true;
            let root = doc.root();
            set_attributes(doc, root, tag.attributes)?;
            return Ok(root);
        };

        let node = match kind {
            Some(kind) => doc.create(kind),
            None => doc.create_extension(tag.name),
        };
        set_attributes(doc, node, tag.attributes)?;
        doc.attach_child(parent, node)?;
        Ok(node)
    }
}

/// Resolve element and attribute names of a start tag
fn read_start(start: &BytesStart<'_>, scopes: &NamespaceStack) -> Result<StartTag> {
    let raw_name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::Xml(format!("invalid element name: {}", e)))?
        .to_string();

    let mut scope = Scope::new();
    let mut raw_attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|e| Error::Xml(format!("failed to parse attribute: {}", e)))?;
        let key = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| Error::Xml(format!("invalid attribute name: {}", e)))?
            .to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| Error::Xml(format!("failed to unescape attribute value: {}", e)))?
            .into_owned();

        if key == "xmlns" {
            scope.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), value);
        } else {
            raw_attributes.push((key, value));
        }
    }

    // Declarations on this tag are in scope for its own names
    let lookup = |prefix: &str| -> Option<String> {
        match scope.get(prefix) {
            Some(ns) if ns.is_empty() => None,
            Some(ns) => Some(ns.clone()),
            None => scopes.lookup(prefix).map(str::to_string),
        }
    };

    let name = match raw_name.split_once(':') {
        Some((prefix, local)) => {
            let ns = lookup(prefix)
                .ok_or_else(|| Error::Xml(format!("unbound prefix '{}' on <{}>", prefix, raw_name)))?;
            XmlName::namespaced(ns, prefix, local)
        }
        None => XmlName::new(lookup(""), None::<String>, raw_name.as_str()),
    };

    let mut attributes = Vec::with_capacity(raw_attributes.len());
    for (key, value) in raw_attributes {
        let attribute_name = match key.split_once(':') {
            Some((prefix, local)) => {
                let ns = lookup(prefix).ok_or_else(|| {
                    Error::Xml(format!("unbound prefix '{}' on attribute '{}'", prefix, key))
                })?;
                XmlName::namespaced(ns, prefix, local)
            }
            None => XmlName::local(key),
        };
        attributes.push((attribute_name, value));
    }

    Ok(StartTag {
        name,
        scope,
        attributes,
    })
}

/// Name under which a declared attribute is registered: `local` or `prefix:local`
/// with the canonical prefix of its namespace
fn declared_name(name: &XmlName) -> Option<String> {
    match name.namespace.as_deref() {
        None => Some(name.local_name.clone()),
        Some(ns) => namespaces::prefix_for(ns).map(|prefix| format!("{}:{}", prefix, name.local_name)),
    }
}

fn set_attributes(doc: &mut Document, node: NodeId, attributes: Vec<(XmlName, String)>) -> Result<()> {
    let extension = doc.kind(node) == ElementKind::Extension;
    for (name, value) in attributes {
        match declared_name(&name) {
            Some(declared) if !extension && doc.is_supported(node, &declared) => {
                doc.set_attribute(node, &declared, value)?;
            }
            Some(declared) if name.namespace.is_none() && !extension => {
                return Err(Error::UnsupportedAttribute {
                    element: doc.name(node).qualified(),
                    attribute: declared,
                });
            }
            _ => doc.set_extension_attribute(node, name, value)?,
        }
    }
    Ok(())
}

/// Append character data to the open element
///
/// Whitespace between structural elements is dropped; elements that hold text
/// keep it as written. Adjacent character data merges into one text node.
fn add_text(doc: &mut Document, stack: &[NodeId], text: &str) -> Result<()> {
    let Some(&parent) = stack.last() else {
        return Ok(());
    };
    let kind = doc.kind(parent);
    let holds_text = kind != ElementKind::Skeleton && kind.declaration().accepts(ElementKind::Text);
    if text.trim().is_empty() && !holds_text {
        return Ok(());
    }

    if let Some(&last) = doc.children(parent).last() {
        if doc.kind(last) == ElementKind::Text {
            let merged = format!("{}{}", doc.text(last).unwrap_or_default(), text);
            return doc.set_text(last, merged);
        }
    }
    doc.append_text(parent, text)?;
    Ok(())
}

/// Load a document from a string with default limits
pub fn load_str(xml: &str) -> Result<Document> {
    Loader::new().load_str(xml)
}

/// Load a document from a file with default limits
pub fn load_file(path: impl AsRef<Path>) -> Result<Document> {
    Loader::new().load_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
  <file id="f1">
    <unit id="u1">
      <segment id="s1">
        <source>Hello <ph id="1"/> world</source>
      </segment>
    </unit>
  </file>
</xliff>"#;

    #[test]
    fn test_load_minimal() {
        let doc = load_str(MINIMAL).unwrap();
        let root = doc.root_ref();
        assert_eq!(root.attr("srcLang"), Some("en"));
        let file = root.child(ElementKind::File).unwrap();
        assert_eq!(file.xml_id(), Some("f1"));
        let source = file
            .child(ElementKind::Unit)
            .and_then(|u| u.child(ElementKind::Segment))
            .and_then(|s| s.child(ElementKind::Source))
            .unwrap();
        let kinds: Vec<_> = source.children().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Text, ElementKind::StandaloneCode, ElementKind::Text]
        );
        assert_eq!(source.text_content(), "Hello  world");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MINIMAL).unwrap();
        let doc = Loader::new().load_file(file.path()).unwrap();
        assert_eq!(doc.root_ref().attr("version"), Some("2.0"));
    }

    #[test]
    fn test_module_and_extension_elements() {
        let xml = r##"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0"
            xmlns:mtc="urn:oasis:names:tc:xliff:matches:2.0"
            xmlns:fs="urn:oasis:names:tc:xliff:fs:2.0"
            xmlns:my="urn:example:ext"
            version="2.0" srcLang="en" trgLang="fr">
          <file id="f1" my:flag="on">
            <my:data id="x1">payload</my:data>
            <unit id="u1" fs:fs="p">
              <mtc:matches>
                <mtc:match ref="#s1" similarity="90">
                  <source>Hi</source>
                  <target>Salut</target>
                </mtc:match>
              </mtc:matches>
              <segment id="s1"><source xml:lang="en">Hi</source></segment>
            </unit>
          </file>
        </xliff>"##;
        let doc = load_str(xml).unwrap();
        let file = doc.root_ref().child(ElementKind::File).unwrap();
        assert_eq!(doc.extension_attribute(file.node_id(), "my:flag"), Some("on"));

        let ext = file.child(ElementKind::Extension).unwrap();
        assert_eq!(ext.name().expanded(), "{urn:example:ext}data");
        assert_eq!(ext.text_content(), "payload");

        let unit = file.child(ElementKind::Unit).unwrap();
        assert_eq!(unit.attr("fs:fs"), Some("p"));
        let candidate = unit
            .child(ElementKind::Matches)
            .and_then(|m| m.child(ElementKind::Match))
            .unwrap();
        assert_eq!(candidate.attr("similarity"), Some("90"));
        let source = unit
            .child(ElementKind::Segment)
            .and_then(|s| s.child(ElementKind::Source))
            .unwrap();
        assert_eq!(source.attr("xml:lang"), Some("en"));
    }

    #[test]
    fn test_bad_entity_in_text() {
        let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
            <file id="f1"><unit id="u1"><segment><source>a &bogus; b</source></segment></unit></file>
          </xliff>"#;
        assert!(matches!(load_str(xml), Err(Error::Xml(_))));
    }

    #[test]
    fn test_wrong_root() {
        let err = load_str(r#"<xliff version="2.0"/>"#).unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_undeclared_core_attribute() {
        let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
            <file id="f1" bogus="1"/></xliff>"#;
        let err = load_str(xml).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAttribute { .. }));
    }

    #[test]
    fn test_structural_rules_apply_while_loading() {
        let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en">
            <file id="f1"><unit id="u1"><segment><target>x</target></segment></unit></file></xliff>"#;
        let err = load_str(xml).unwrap_err();
        assert!(matches!(err, Error::InvalidChild { .. }));
    }

    #[test]
    fn test_doctype_rejected() {
        let xml = r#"<!DOCTYPE xliff [<!ENTITY a "b">]><xliff xmlns="urn:oasis:names:tc:xliff:document:2.0"/>"#;
        assert!(matches!(load_str(xml), Err(Error::Xml(_))));
    }

    #[test]
    fn test_size_limit() {
        let loader = Loader::new().with_limits(Limits {
            max_input_size: 16,
            ..Limits::default()
        });
        let err = loader.load_str(MINIMAL).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_depth_limit() {
        let loader = Loader::new().with_limits(Limits {
            max_depth: 3,
            ..Limits::default()
        });
        let err = loader.load_str(MINIMAL).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }
}

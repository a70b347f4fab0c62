//! Extension elements
//!
//! Foreign elements are carried through untouched. The only constraint placed on
//! them is that an `id` (unqualified or `xml:id`) is unique among siblings.

use std::collections::HashSet;

use crate::documents::NodeRef;
use crate::elements::ElementKind;
use crate::namespaces;

use super::exceptions::ErrorCode;
use super::standard::{fail, StandardValidator, ValidationResult};

fn extension_id<'a>(node: NodeRef<'a>) -> Option<&'a str> {
    node.extension_attributes()
        .find(|(name, _)| {
            name.local_name == "id"
                && match name.namespace.as_deref() {
                    None | Some("") => true,
                    Some(ns) => ns == namespaces::XML,
                }
        })
        .map(|(_, value)| value)
}

impl StandardValidator {
    /// Check the extension children of `node`, recursively
    pub(super) fn validate_extensions(&self, node: NodeRef<'_>) -> ValidationResult {
        let mut seen = HashSet::new();
        for extension in node.children_of(ElementKind::Extension) {
            if let Some(id) = extension_id(extension) {
                if !seen.insert(id) {
                    return Err(fail(
                        ErrorCode::DuplicateExtensionId,
                        extension,
                        format!(
                            "duplicate id '{}' on extension <{}>",
                            id,
                            extension.name().qualified()
                        ),
                    ));
                }
            }
            self.validate_extensions(extension)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{Document, NodeId};
    use crate::elements::ElementKind as K;
    use crate::names::XmlName;

    const NS: &str = "urn:example:ext";

    fn file() -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_attribute(root, "version", "2.0").unwrap();
        doc.set_attribute(root, "srcLang", "en").unwrap();
        let file = doc.append_with(root, K::File, &[("id", "f1")]).unwrap();
        let unit = doc.append_with(file, K::Unit, &[("id", "u1")]).unwrap();
        let seg = doc.append(unit, K::Segment).unwrap();
        doc.append(seg, K::Source).unwrap();
        (doc, file)
    }

    fn extension(doc: &mut Document, parent: NodeId, id: XmlName, value: &str) -> NodeId {
        let ext = doc.create_extension(XmlName::namespaced(NS, "my", "data"));
        doc.set_extension_attribute(ext, id, value).unwrap();
        doc.attach_child(parent, ext).unwrap();
        ext
    }

    fn code_of(doc: &Document) -> Option<ErrorCode> {
        StandardValidator::new().validate(doc).err().map(|e| e.code())
    }

    #[test]
    fn test_sibling_extension_ids_are_unique() {
        let (mut doc, file) = file();
        extension(&mut doc, file, XmlName::local("id"), "x1");
        extension(&mut doc, file, XmlName::local("id"), "x2");
        assert_eq!(code_of(&doc), None);

        extension(&mut doc, file, XmlName::namespaced(namespaces::XML, "xml", "id"), "x1");
        assert_eq!(code_of(&doc), Some(ErrorCode::DuplicateExtensionId));
    }

    #[test]
    fn test_nested_extensions_have_their_own_scope() {
        let (mut doc, file) = file();
        let outer = extension(&mut doc, file, XmlName::local("id"), "x1");
        extension(&mut doc, outer, XmlName::local("id"), "x1");
        assert_eq!(code_of(&doc), None);

        extension(&mut doc, outer, XmlName::local("id"), "x1");
        let err = StandardValidator::new().validate(&doc).unwrap_err();
        assert_eq!(err.code(), ErrorCode::DuplicateExtensionId);
        assert_eq!(err.path(), Some("#/f=f1"));
    }

    #[test]
    fn test_foreign_namespaced_id_is_not_an_id() {
        let (mut doc, file) = file();
        extension(&mut doc, file, XmlName::namespaced(NS, "my", "id"), "x1");
        extension(&mut doc, file, XmlName::namespaced(NS, "my", "id"), "x1");
        assert_eq!(code_of(&doc), None);
    }
}

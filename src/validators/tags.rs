//! Inline tag checks
//!
//! Start/end pairing of `sc`/`ec` and `sm`/`em`, property mirroring between the
//! two halves of a spanning code, isolation, `copyOf` targets and the presence of
//! undeletable tags in the target.

use std::collections::HashMap;

use tracing::trace;

use crate::documents::{NodeId, NodeRef};
use crate::elements::ElementKind;
use crate::names::is_prefixed_value;

use super::exceptions::ErrorCode;
use super::standard::{content_containers, fail, inline_tags, StandardValidator, ValidationResult};

/// Properties that must agree between `sc` and its `ec`
const MIRRORED: &[(&str, ErrorCode)] = &[
    ("canCopy", ErrorCode::CanCopyMismatch),
    ("canDelete", ErrorCode::CanDeleteMismatch),
    ("canReorder", ErrorCode::CanReorderMismatch),
    ("canOverlap", ErrorCode::CanOverlapMismatch),
    ("dir", ErrorCode::DirectionalityMismatch),
    ("type", ErrorCode::TypeMismatch),
    ("subType", ErrorCode::SubTypeMismatch),
];

/// Reserved `xlf:` sub-types and the `type` each requires
const RESERVED_SUB_TYPES: &[(&str, &str)] = &[
    ("xlf:lb", "fmt"),
    ("xlf:pb", "fmt"),
    ("xlf:b", "fmt"),
    ("xlf:i", "fmt"),
    ("xlf:u", "fmt"),
    ("xlf:var", "ui"),
];

impl StandardValidator {
    /// `type` / `subType` of an inline code
    pub(super) fn check_code_type(&self, code: NodeRef<'_>) -> ValidationResult {
        let Some(sub_type) = code.sub_type() else {
            return Ok(());
        };
        let Some(type_) = code.type_() else {
            return Err(fail(
                ErrorCode::InvalidSubType,
                code,
                "'subType' requires 'type'",
            ));
        };
        if !is_prefixed_value(sub_type) {
            return Err(fail(
                ErrorCode::InvalidSubType,
                code,
                format!("'subType' must have the form prefix:value, got '{}'", sub_type),
            ));
        }
        if sub_type.starts_with("xlf:") {
            match RESERVED_SUB_TYPES.iter().find(|(name, _)| *name == sub_type) {
                Some((_, expected)) if *expected != type_ => {
                    return Err(fail(
                        ErrorCode::InvalidSubType,
                        code,
                        format!("subType '{}' requires type '{}'", sub_type, expected),
                    ))
                }
                Some(_) => {}
                None => {
                    return Err(fail(
                        ErrorCode::InvalidSubType,
                        code,
                        format!("'{}' is not a reserved xlf sub-type", sub_type),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Comment annotations carry exactly one of `value` and `ref`
    pub(super) fn check_annotation(&self, marker: NodeRef<'_>) -> ValidationResult {
        if marker.value_or_default("type") != Some("comment") {
            return Ok(());
        }
        match (marker.attr("value"), marker.attr("ref")) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(fail(
                ErrorCode::InvalidCommentAnnotation,
                marker,
                "a comment annotation requires exactly one of 'value' and 'ref'",
            )),
        }
    }

    /// Resolve every end tag of one content side to its start tag
    pub(super) fn validate_tag_pairs(&mut self, unit: NodeRef<'_>, side: ElementKind) -> ValidationResult {
        let tags = inline_tags(unit, side);
        self.reset();
        let position: HashMap<NodeId, usize> = tags
            .iter()
            .enumerate()
            .map(|(i, t)| (t.node_id(), i))
            .collect();

        for tag in &tags {
            if matches!(
                tag.kind(),
                ElementKind::SpanningCodeStart | ElementKind::MarkedSpanStart
            ) {
                if let Some(id) = tag.xml_id() {
                    self.starts.insert(id.to_string(), tag.node_id());
                }
            }
        }

        for (index, tag) in tags.iter().enumerate() {
            let start_kind = match tag.kind() {
                ElementKind::SpanningCodeEnd => ElementKind::SpanningCodeStart,
                ElementKind::MarkedSpanEnd => ElementKind::MarkedSpanStart,
                _ => continue,
            };
            self.resolve_end_tag(*tag, start_kind, index, &position)?;
        }

        for tag in tags
            .iter()
            .filter(|t| t.kind() == ElementKind::SpanningCodeStart)
        {
            let matched = self.matched.contains(&tag.node_id());
            if !matched && !tag.is_isolated() {
                return Err(fail(
                    ErrorCode::UnmatchedStartTag,
                    *tag,
                    format!(
                        "start tag '{}' has no end tag and is not isolated",
                        tag.xml_id().unwrap_or_default()
                    ),
                ));
            }
            if matched && tag.is_isolated() {
                return Err(fail(
                    ErrorCode::InvalidIsolatedTag,
                    *tag,
                    format!(
                        "isolated start tag '{}' has an end tag in the same unit",
                        tag.xml_id().unwrap_or_default()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn resolve_end_tag(
        &mut self,
        end: NodeRef<'_>,
        start_kind: ElementKind,
        index: usize,
        position: &HashMap<NodeId, usize>,
    ) -> ValidationResult {
        if end.kind() == ElementKind::SpanningCodeEnd && end.is_isolated() {
            if end.start_ref().is_some() || end.xml_id().is_none() {
                return Err(fail(
                    ErrorCode::InvalidIsolatedTag,
                    end,
                    "an isolated end tag requires 'id' and must not have 'startRef'",
                ));
            }
            return Ok(());
        }

        let start_ref = end.start_ref().ok_or_else(|| {
            fail(
                ErrorCode::StartTagNotFound,
                end,
                "end tag without 'startRef'",
            )
        })?;
        let doc = end.document();
        let start = self
            .starts
            .get(start_ref)
            .map(|id| doc.get(*id))
            .filter(|s| s.kind() == start_kind)
            .ok_or_else(|| {
                fail(
                    ErrorCode::StartTagNotFound,
                    end,
                    format!("no start tag '{}' for end tag", start_ref),
                )
            })?;
        trace!(start_ref, "resolved end tag");

        if position.get(&start.node_id()).copied().unwrap_or(usize::MAX) > index {
            return Err(fail(
                ErrorCode::StartTagAfterEnd,
                end,
                format!("start tag '{}' occurs after its end tag", start_ref),
            ));
        }
        if end.kind() == ElementKind::SpanningCodeEnd {
            for (property, code) in MIRRORED {
                let expected = start.value_or_default(property);
                let actual = end.value_or_default(property);
                if expected != actual {
                    return Err(fail(
                        *code,
                        end,
                        format!(
                            "'{}' of end tag ({}) differs from start tag '{}' ({})",
                            property,
                            actual.unwrap_or("unset"),
                            start_ref,
                            expected.unwrap_or("unset")
                        ),
                    ));
                }
            }
        }
        self.matched.insert(start.node_id());
        Ok(())
    }

    /// `copyOf` must name a copyable tag of the same kind, searching source then target
    pub(super) fn validate_copy_of(&self, unit: NodeRef<'_>) -> ValidationResult {
        let source = inline_tags(unit, ElementKind::Source);
        let target = inline_tags(unit, ElementKind::Target);

        for tag in source.iter().chain(target.iter()) {
            let Some(copy_of) = tag.copy_of() else {
                continue;
            };
            let original = source
                .iter()
                .chain(target.iter())
                .find(|t| t.node_id() != tag.node_id() && t.xml_id() == Some(copy_of));
            let problem = match original {
                None => Some(format!("copyOf '{}' references no tag", copy_of)),
                Some(o) if o.kind() != tag.kind() => Some(format!(
                    "copyOf '{}' references a <{}>, not a <{}>",
                    copy_of,
                    o.name().qualified(),
                    tag.name().qualified()
                )),
                Some(o) if !o.can_copy() => {
                    Some(format!("copyOf '{}' references a tag with canCopy='no'", copy_of))
                }
                Some(_) => None,
            };
            if let Some(message) = problem {
                return Err(fail(ErrorCode::InvalidCopyOf, *tag, message));
            }
        }
        Ok(())
    }

    /// Source codes with `canDelete="no"` must survive in translated segments
    pub(super) fn validate_undeletable(&self, unit: NodeRef<'_>) -> ValidationResult {
        let target = inline_tags(unit, ElementKind::Target);

        for container in content_containers(unit).filter(|c| c.child(ElementKind::Target).is_some()) {
            let Some(source) = container.child(ElementKind::Source) else {
                continue;
            };
            for tag in source.descendants().filter(|t| t.kind().is_inline_code()) {
                if tag.can_delete() {
                    continue;
                }
                let Some(key) = tag.xml_id().or_else(|| tag.start_ref()) else {
                    continue;
                };
                if !target.iter().any(|t| is_counterpart(tag, *t, key)) {
                    return Err(fail(
                        ErrorCode::MissingUndeletableTag,
                        tag,
                        format!("tag '{}' has canDelete='no' but is missing from the target", key),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Whether a target tag stands for a source tag, directly or folded into the other
/// spanning-code form
fn is_counterpart(source: NodeRef<'_>, target: NodeRef<'_>, key: &str) -> bool {
    use ElementKind::*;
    match (source.kind(), target.kind()) {
        (a, b) if a == b => target.xml_id() == Some(key) || target.start_ref() == Some(key),
        (SpanningCodeStart, SpanningCode)
        | (SpanningCodeEnd, SpanningCode)
        | (SpanningCode, SpanningCodeStart) => target.xml_id() == Some(key),
        (SpanningCode, SpanningCodeEnd) => target.start_ref() == Some(key),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::Document;
    use crate::elements::ElementKind as K;

    /// Document with one segment; returns (doc, unit, source, target)
    fn segment(with_target: bool) -> (Document, NodeId, NodeId, Option<NodeId>) {
        let mut doc = Document::new();
        let root = doc.root();
        doc.set_attribute(root, "version", "2.0").unwrap();
        doc.set_attribute(root, "srcLang", "en").unwrap();
        doc.set_attribute(root, "trgLang", "fr").unwrap();
        let file = doc.append_with(root, K::File, &[("id", "f1")]).unwrap();
        let unit = doc.append_with(file, K::Unit, &[("id", "u1")]).unwrap();
        let seg = doc.append_with(unit, K::Segment, &[("id", "s1")]).unwrap();
        let source = doc.append(seg, K::Source).unwrap();
        let target = with_target.then(|| doc.append(seg, K::Target).unwrap());
        (doc, unit, source, target)
    }

    fn code_of(doc: &Document) -> Option<ErrorCode> {
        StandardValidator::new().validate(doc).err().map(|e| e.code())
    }

    #[test]
    fn test_paired_codes_pass() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::SpanningCodeStart, &[("id", "1"), ("type", "fmt")]).unwrap();
        doc.append_text(source, "bold").unwrap();
        doc.append_with(source, K::SpanningCodeEnd, &[("startRef", "1"), ("type", "fmt")])
            .unwrap();
        assert_eq!(code_of(&doc), None);
    }

    #[test]
    fn test_end_before_start() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::SpanningCodeEnd, &[("startRef", "1")]).unwrap();
        doc.append_with(source, K::SpanningCodeStart, &[("id", "1")]).unwrap();
        let err = StandardValidator::new().validate(&doc).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StartTagAfterEnd);
        assert!(err.message().contains("occurs after"));
    }

    #[test]
    fn test_missing_start() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::SpanningCodeEnd, &[("startRef", "9")]).unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::StartTagNotFound));
    }

    #[test]
    fn test_mirrored_property_mismatch() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::SpanningCodeStart, &[("id", "1"), ("canOverlap", "no")])
            .unwrap();
        doc.append_with(source, K::SpanningCodeEnd, &[("startRef", "1")]).unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::CanOverlapMismatch));
    }

    #[test]
    fn test_unmatched_start_must_be_isolated() {
        let (mut doc, _, source, _) = segment(false);
        let sc = doc.append_with(source, K::SpanningCodeStart, &[("id", "1")]).unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::UnmatchedStartTag));
        doc.set_attribute(sc, "isolated", "yes").unwrap();
        assert_eq!(code_of(&doc), None);
    }

    #[test]
    fn test_isolated_end_tag() {
        let (mut doc, _, source, _) = segment(false);
        let ec = doc.append_with(source, K::SpanningCodeEnd, &[("isolated", "yes")]).unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidIsolatedTag));
        doc.set_attribute(ec, "id", "e1").unwrap();
        assert_eq!(code_of(&doc), None);
    }

    #[test]
    fn test_marker_pairs() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::MarkedSpanStart, &[("id", "m1")]).unwrap();
        doc.append_text(source, "text").unwrap();
        doc.append_with(source, K::MarkedSpanEnd, &[("startRef", "m1")]).unwrap();
        assert_eq!(code_of(&doc), None);

        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::MarkedSpanEnd, &[("startRef", "m1")]).unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::StartTagNotFound));
    }

    #[test]
    fn test_sub_type_rules() {
        let (mut doc, _, source, _) = segment(false);
        let ph = doc.append_with(source, K::StandaloneCode, &[("id", "1"), ("subType", "xlf:lb")])
            .unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidSubType));
        doc.set_attribute(ph, "type", "ui").unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidSubType));
        doc.set_attribute(ph, "type", "fmt").unwrap();
        assert_eq!(code_of(&doc), None);
        doc.set_attribute(ph, "subType", "plain").unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidSubType));
    }

    #[test]
    fn test_comment_annotation() {
        let (mut doc, _, source, _) = segment(false);
        let mrk = doc.append_with(source, K::MarkedSpan, &[("id", "m1"), ("type", "comment")])
            .unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidCommentAnnotation));
        doc.set_attribute(mrk, "value", "check this").unwrap();
        assert_eq!(code_of(&doc), None);
    }

    #[test]
    fn test_copy_of() {
        let (mut doc, _, source, _) = segment(false);
        doc.append_with(source, K::StandaloneCode, &[("id", "1"), ("canCopy", "no")])
            .unwrap();
        doc.append_with(source, K::StandaloneCode, &[("id", "2"), ("copyOf", "1")])
            .unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::InvalidCopyOf));
    }

    #[test]
    fn test_undeletable_tag_folded_into_pc() {
        let (mut doc, _, source, target) = segment(true);
        let target = target.unwrap();
        doc.append_with(source, K::SpanningCodeStart, &[("id", "1"), ("canDelete", "no")])
            .unwrap();
        doc.append_with(source, K::SpanningCodeEnd, &[("startRef", "1"), ("canDelete", "no")])
            .unwrap();
        assert_eq!(code_of(&doc), Some(ErrorCode::MissingUndeletableTag));

        doc.append_with(target, K::SpanningCode, &[("id", "1"), ("canDelete", "no")])
            .unwrap();
        assert_eq!(code_of(&doc), None);
    }
}

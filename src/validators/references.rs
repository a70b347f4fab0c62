//! Symbolic references
//!
//! Data references into the unit's original data, sub-flows naming units of the
//! same file, and fragment references (`ref`) resolved through selector paths.

use std::collections::HashSet;

use crate::documents::NodeRef;
use crate::elements::ElementKind;
use crate::selectors::{is_known_prefix, resolve_from, FragmentStep};

use super::exceptions::ErrorCode;
use super::helpers;
use super::standard::{content_containers, fail, StandardValidator, ValidationResult};

const DATA_REFERENCES: &[&str] = &["dataRef", "dataRefStart", "dataRefEnd"];
const SUB_FLOWS: &[&str] = &["subFlows", "subFlowsStart", "subFlowsEnd"];

/// Check a fragment reference made from `node`, resolving relative paths in `scope`
///
/// References into another document are only checked for IRI syntax. A fragment
/// that does not resolve is tolerated when its last step names an unknown prefix
/// (a target in an extension), provided the path leading to it resolves.
pub(super) fn check_reference(scope: NodeRef<'_>, node: NodeRef<'_>, value: &str) -> ValidationResult {
    let invalid = |message: String| fail(ErrorCode::InvalidReference, node, message);

    let fragment = match value.split_once('#') {
        Some(("", fragment)) => fragment,
        Some(_) | None => {
            return if helpers::is_iri(value) {
                Ok(())
            } else {
                Err(fail(
                    ErrorCode::InvalidIri,
                    node,
                    format!("'{}' is not a valid IRI", value),
                ))
            };
        }
    };

    let doc = scope.document();
    if resolve_from(doc, scope.node_id(), &format!("#{}", fragment)).is_some() {
        return Ok(());
    }

    let (head, last) = match fragment.rsplit_once('/') {
        Some((head, last)) => (head, last),
        None => ("", fragment),
    };
    let step = FragmentStep::parse(last)
        .ok_or_else(|| invalid(format!("malformed fragment '{}'", value)))?;
    match step.prefix.as_deref() {
        Some(prefix) if !is_known_prefix(prefix) => {
            if !head.is_empty() && resolve_from(doc, scope.node_id(), &format!("#{}", head)).is_none() {
                return Err(invalid(format!("'{}' does not resolve", value)));
            }
            Ok(())
        }
        _ => Err(invalid(format!("'{}' does not resolve", value))),
    }
}

impl StandardValidator {
    pub(super) fn validate_references(&self, unit: NodeRef<'_>) -> ValidationResult {
        let data_ids: HashSet<&str> = unit
            .child(ElementKind::OriginalData)
            .map(|od| od.children_of(ElementKind::Data).filter_map(|d| d.xml_id()).collect())
            .unwrap_or_default();
        let unit_ids: HashSet<&str> = unit
            .ancestor(ElementKind::File)
            .map(|f| {
                f.descendants()
                    .filter(|d| d.kind() == ElementKind::Unit)
                    .filter_map(|u| u.xml_id())
                    .collect()
            })
            .unwrap_or_default();

        let tags = content_containers(unit)
            .flat_map(|c| c.children())
            .flat_map(|content| content.descendants())
            .filter(|n| n.kind().is_inline_tag());
        for tag in tags {
            for attribute in DATA_REFERENCES {
                if let Some(data_ref) = tag.attr(attribute) {
                    if !data_ids.contains(data_ref) {
                        return Err(fail(
                            ErrorCode::InvalidDataReference,
                            tag,
                            format!("{} '{}' matches no <data> in the unit", attribute, data_ref),
                        ));
                    }
                }
            }
            for attribute in SUB_FLOWS {
                if let Some(flows) = tag.attr(attribute) {
                    if let Some(missing) = flows.split_whitespace().find(|id| !unit_ids.contains(id)) {
                        return Err(fail(
                            ErrorCode::InvalidSubFlows,
                            tag,
                            format!("{} names unit '{}' which is not in the file", attribute, missing),
                        ));
                    }
                }
            }
            if matches!(tag.kind(), ElementKind::MarkedSpan | ElementKind::MarkedSpanStart) {
                self.check_marker_reference(unit, tag)?;
            }
        }
        Ok(())
    }

    fn check_marker_reference(&self, unit: NodeRef<'_>, marker: NodeRef<'_>) -> ValidationResult {
        let Some(reference) = marker.attr("ref") else {
            return Ok(());
        };
        if marker.value_or_default("type") != Some("comment") {
            return check_reference(unit, marker, reference);
        }
        let doc = unit.document();
        match resolve_from(doc, unit.node_id(), reference) {
            Some(note) if doc.kind(note) == ElementKind::Note => Ok(()),
            _ => Err(fail(
                ErrorCode::InvalidCommentReference,
                marker,
                format!("comment reference '{}' does not point at a <note>", reference),
            )),
        }
    }
}

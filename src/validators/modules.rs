//! Module sub-trees
//!
//! Translation candidates, glossary, metadata, resource data, change tracking,
//! validation rules and the format style attributes.

use crate::documents::NodeRef;
use crate::elements::ElementKind;

use super::exceptions::{ErrorCode, ValidationError};
use super::helpers;
use super::references::check_reference;
use super::standard::{fail, unique_ids, StandardValidator, ValidationResult};

const MATCH_SCORES: &[&str] = &["matchQuality", "matchSuitability", "similarity"];
const RULE_TESTS: &[&str] = &["isPresent", "isNotPresent", "startsWith", "endsWith"];

fn require_attribute<'a>(node: NodeRef<'a>, name: &str) -> Result<&'a str, ValidationError> {
    node.attr(name).ok_or_else(|| {
        fail(
            ErrorCode::MissingAttribute,
            node,
            format!("<{}> requires '{}'", node.name().qualified(), name),
        )
    })
}

fn require_children(node: NodeRef<'_>, kind: ElementKind) -> ValidationResult {
    if node.child(kind).is_some() {
        Ok(())
    } else {
        Err(fail(
            ErrorCode::EmptyContainer,
            node,
            format!(
                "<{}> must contain at least one <{}>",
                node.name().qualified(),
                kind.xml_name().qualified()
            ),
        ))
    }
}

impl StandardValidator {
    /// Validate a module element found under a file, group or unit
    pub(super) fn validate_module(&mut self, module: NodeRef<'_>) -> ValidationResult {
        match module.kind() {
            ElementKind::Matches => self.validate_matches(module),
            ElementKind::Glossary => self.validate_glossary(module),
            ElementKind::Metadata => self.validate_metadata(module),
            ElementKind::ResourceData => self.validate_resource_data(module),
            ElementKind::ChangeTrack => self.validate_change_track(module),
            ElementKind::Validation => self.validate_rules(module),
            _ => Ok(()),
        }
    }

    /// `fs:fs` names an HTML element; `fs:subFs` needs `fs:fs` and `name,value` pairs
    pub(super) fn check_format_style(&self, node: NodeRef<'_>) -> ValidationResult {
        let fs = node.attr("fs:fs");
        let sub_fs = node.attr("fs:subFs");
        if let Some(fs) = fs {
            if !helpers::FORMAT_STYLE_ELEMENTS.contains(&fs) {
                return Err(fail(
                    ErrorCode::InvalidFormatStyle,
                    node,
                    format!("'{}' is not a format style element", fs),
                ));
            }
        }
        match (fs, sub_fs) {
            (None, Some(_)) => Err(fail(
                ErrorCode::InvalidFormatStyle,
                node,
                "'fs:subFs' requires 'fs:fs'",
            )),
            (Some(_), Some(sub_fs)) if !helpers::is_sub_fs(sub_fs) => Err(fail(
                ErrorCode::InvalidFormatStyle,
                node,
                format!("malformed 'fs:subFs' value '{}'", sub_fs),
            )),
            _ => Ok(()),
        }
    }

    fn validate_matches(&mut self, matches: NodeRef<'_>) -> ValidationResult {
        require_children(matches, ElementKind::Match)?;
        unique_ids(matches.children_of(ElementKind::Match), ErrorCode::DuplicateId)?;
        let unit = matches.ancestor(ElementKind::Unit);

        for candidate in matches.children_of(ElementKind::Match) {
            let reference = require_attribute(candidate, "ref")?;
            for score in MATCH_SCORES {
                if let Some(value) = candidate.attr(score) {
                    if !helpers::in_decimal_range(value, 0, 100) {
                        return Err(fail(
                            ErrorCode::InvalidMatchRange,
                            candidate,
                            format!("{} {} is outside 0..=100", score, value),
                        ));
                    }
                }
            }
            let (Some(source), Some(target)) = (
                candidate.child(ElementKind::Source),
                candidate.child(ElementKind::Target),
            ) else {
                return Err(fail(
                    ErrorCode::InvalidMatch,
                    candidate,
                    "a match requires <source> and <target>",
                ));
            };
            if let Some(unit) = unit {
                check_reference(unit, candidate, reference)?;
            }
            self.validate_inline_content(source)?;
            self.validate_inline_content(target)?;
            if let Some(original_data) = candidate.child(ElementKind::OriginalData) {
                self.validate_original_data(original_data)?;
            }
            if let Some(metadata) = candidate.child(ElementKind::Metadata) {
                self.validate_metadata(metadata)?;
            }
            self.validate_extensions(candidate)?;
        }
        Ok(())
    }

    fn validate_glossary(&mut self, glossary: NodeRef<'_>) -> ValidationResult {
        require_children(glossary, ElementKind::GlossaryEntry)?;
        let entries: Vec<_> = glossary.children_of(ElementKind::GlossaryEntry).collect();
        unique_ids(
            entries.iter().flat_map(|e| {
                std::iter::once(*e).chain(e.children_of(ElementKind::Translation))
            }),
            ErrorCode::DuplicateId,
        )?;
        let unit = glossary.ancestor(ElementKind::Unit);

        for entry in entries {
            if entry.child(ElementKind::Term).is_none() {
                return Err(fail(
                    ErrorCode::InvalidGlossaryEntry,
                    entry,
                    "a glossary entry requires a <gls:term>",
                ));
            }
            if entry.child(ElementKind::Definition).is_none()
                && entry.child(ElementKind::Translation).is_none()
            {
                return Err(fail(
                    ErrorCode::InvalidGlossaryEntry,
                    entry,
                    "a glossary entry requires a <gls:definition> or at least one <gls:translation>",
                ));
            }
            if let Some(unit) = unit {
                let referring = std::iter::once(entry).chain(entry.children_of(ElementKind::Translation));
                for node in referring {
                    if let Some(reference) = node.attr("ref") {
                        check_reference(unit, node, reference)?;
                    }
                }
            }
            self.validate_extensions(entry)?;
        }
        Ok(())
    }

    fn validate_metadata(&mut self, metadata: NodeRef<'_>) -> ValidationResult {
        require_children(metadata, ElementKind::MetaGroup)?;
        let groups = metadata
            .descendants()
            .filter(|d| d.kind() == ElementKind::MetaGroup);
        unique_ids(std::iter::once(metadata).chain(groups), ErrorCode::DuplicateId)?;

        for node in metadata.descendants() {
            match node.kind() {
                ElementKind::MetaGroup if node.children().next().is_none() => {
                    return Err(fail(
                        ErrorCode::EmptyContainer,
                        node,
                        "<mda:metaGroup> must contain <mda:metaGroup> or <mda:meta>",
                    ))
                }
                ElementKind::Meta => {
                    require_attribute(node, "type")?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn validate_resource_data(&mut self, resource_data: NodeRef<'_>) -> ValidationResult {
        let entries: Vec<_> = resource_data
            .children()
            .filter(|c| {
                matches!(
                    c.kind(),
                    ElementKind::ResourceItem | ElementKind::ResourceItemRef
                )
            })
            .collect();
        if entries.is_empty() {
            return Err(fail(
                ErrorCode::EmptyContainer,
                resource_data,
                "<res:resourceData> must contain <res:resourceItem> or <res:resourceItemRef>",
            ));
        }
        unique_ids(entries.iter().copied(), ErrorCode::DuplicateId)?;

        let xliff = resource_data.document().root_ref();
        let languages = [
            (ElementKind::ResourceSource, xliff.attr("srcLang")),
            (ElementKind::ResourceTarget, xliff.attr("trgLang")),
        ];

        for item in resource_data.children_of(ElementKind::ResourceItem) {
            let parts: Vec<_> = item
                .children()
                .filter(|c| {
                    matches!(
                        c.kind(),
                        ElementKind::ResourceSource
                            | ElementKind::ResourceTarget
                            | ElementKind::ResourceReference
                    )
                })
                .collect();
            if parts.is_empty() {
                return Err(fail(
                    ErrorCode::InvalidResourceItem,
                    item,
                    "a resource item requires <res:source>, <res:target> or <res:reference>",
                ));
            }
            for (kind, expected) in languages {
                let Some(part) = item.child(kind) else {
                    continue;
                };
                if let (Some(lang), Some(expected)) = (part.attr("xml:lang"), expected) {
                    if lang != expected {
                        return Err(fail(
                            ErrorCode::InvalidResourceLanguage,
                            part,
                            format!("xml:lang '{}' differs from the document language '{}'", lang, expected),
                        ));
                    }
                }
                let has_content = part.children().next().is_some();
                if part.attr("href").is_none() && !has_content {
                    return Err(fail(
                        ErrorCode::InvalidResourceItem,
                        part,
                        format!("<{}> requires 'href' or content", part.name().qualified()),
                    ));
                }
            }
            if let Some(reference) = item.child(ElementKind::ResourceReference) {
                require_attribute(reference, "href")?;
            }
            for part in parts {
                if let Some(href) = part.attr("href") {
                    if !helpers::is_iri(href) {
                        return Err(fail(
                            ErrorCode::InvalidIri,
                            part,
                            format!("'href' is not a valid IRI: '{}'", href),
                        ));
                    }
                }
                self.validate_extensions(part)?;
            }
            self.validate_extensions(item)?;
        }

        for item_ref in resource_data.children_of(ElementKind::ResourceItemRef) {
            let reference = require_attribute(item_ref, "ref")?;
            let resolves = resource_data
                .children_of(ElementKind::ResourceItem)
                .any(|item| item.xml_id() == Some(reference));
            if !resolves {
                return Err(fail(
                    ErrorCode::InvalidResourceReference,
                    item_ref,
                    format!("'{}' names no resource item of this resource data", reference),
                ));
            }
        }
        Ok(())
    }

    fn validate_change_track(&mut self, change_track: NodeRef<'_>) -> ValidationResult {
        require_children(change_track, ElementKind::Revisions)?;
        for revisions in change_track.children_of(ElementKind::Revisions) {
            require_attribute(revisions, "appliesTo")?;
            if revisions.child(ElementKind::Revision).is_none() {
                return Err(fail(
                    ErrorCode::InvalidRevision,
                    revisions,
                    "<ctr:revisions> must contain at least one <ctr:revision>",
                ));
            }
            for revision in revisions.children_of(ElementKind::Revision) {
                if let Some(datetime) = revision.attr("datetime") {
                    if !helpers::is_date_time(datetime) {
                        return Err(fail(
                            ErrorCode::InvalidRevision,
                            revision,
                            format!("'{}' is not a valid dateTime", datetime),
                        ));
                    }
                }
                if revision.child(ElementKind::RevisionItem).is_none() {
                    return Err(fail(
                        ErrorCode::InvalidRevision,
                        revision,
                        "<ctr:revision> must contain at least one <ctr:item>",
                    ));
                }
                for item in revision.children_of(ElementKind::RevisionItem) {
                    require_attribute(item, "property")?;
                }
            }
        }
        Ok(())
    }

    fn validate_rules(&mut self, validation: NodeRef<'_>) -> ValidationResult {
        require_children(validation, ElementKind::Rule)?;
        for rule in validation.children_of(ElementKind::Rule) {
            let tests = RULE_TESTS.iter().filter(|t| rule.attr(t).is_some()).count()
                + usize::from(rule.extension_attributes().next().is_some());
            if tests != 1 {
                return Err(fail(
                    ErrorCode::InvalidRule,
                    rule,
                    format!(
                        "a rule requires exactly one of {} or an extension attribute, found {}",
                        RULE_TESTS.join(", "),
                        tests
                    ),
                ));
            }
            if rule.attr("occurs").is_some() && rule.attr("isPresent").is_none() {
                return Err(fail(
                    ErrorCode::InvalidRule,
                    rule,
                    "'occurs' is only allowed with 'isPresent'",
                ));
            }
        }
        Ok(())
    }
}

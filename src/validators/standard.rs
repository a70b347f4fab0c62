//! Standard validator
//!
//! Walks a document depth-first (document, files, groups and units, source before
//! target) and stops at the first rule violation. The passes over unit content
//! live in sibling modules: tag pairs and cross checks in `tags`, editing-hint
//! sequences in `sequences`, symbolic references in `references`, module
//! sub-trees in `modules` and extension elements in `extensions`.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::documents::{Document, NodeId, NodeRef};
use crate::elements::ElementKind;
use crate::limits::Limits;
use crate::names::{is_nmtoken, is_prefixed_value};

use super::exceptions::{ErrorCode, ValidationError};
use super::helpers;

/// Result of a validation pass
pub type ValidationResult = std::result::Result<(), ValidationError>;

static VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^2\.[0-9]+$").expect("static regex"));

/// Build an error located at `node`
pub(super) fn fail(code: ErrorCode, node: NodeRef<'_>, message: impl Into<String>) -> ValidationError {
    ValidationError::new(code, message).with_path(node.selector_path())
}

/// Required `id`, checked for NMTOKEN syntax
pub(super) fn require_id<'a>(node: NodeRef<'a>) -> Result<&'a str, ValidationError> {
    let id = node.xml_id().ok_or_else(|| {
        fail(
            ErrorCode::MissingId,
            node,
            format!("<{}> requires an 'id'", node.name().qualified()),
        )
    })?;
    check_id(node, id)?;
    Ok(id)
}

fn check_id(node: NodeRef<'_>, id: &str) -> ValidationResult {
    if is_nmtoken(id) {
        Ok(())
    } else {
        Err(fail(
            ErrorCode::InvalidId,
            node,
            format!("'{}' is not a valid NMTOKEN id", id),
        ))
    }
}

/// Check that the ids of `nodes` are well-formed and pairwise distinct
pub(super) fn unique_ids<'a>(
    nodes: impl IntoIterator<Item = NodeRef<'a>>,
    code: ErrorCode,
) -> ValidationResult {
    let mut seen = HashSet::new();
    for node in nodes {
        if let Some(id) = node.xml_id() {
            check_id(node, id)?;
            if !seen.insert(id) {
                return Err(fail(code, node, format!("duplicate id '{}'", id)));
            }
        }
    }
    Ok(())
}

/// Segments and ignorables of a unit, in order
pub(super) fn content_containers<'a>(unit: NodeRef<'a>) -> impl Iterator<Item = NodeRef<'a>> + 'a {
    unit.children()
        .filter(|c| matches!(c.kind(), ElementKind::Segment | ElementKind::Ignorable))
}

/// Inline tags of one content side (`Source` or `Target`) of a unit, in document order
pub(super) fn inline_tags<'a>(unit: NodeRef<'a>, side: ElementKind) -> Vec<NodeRef<'a>> {
    content_containers(unit)
        .filter_map(|c| c.child(side))
        .flat_map(|content| content.descendants())
        .filter(|n| n.kind().is_inline_tag())
        .collect()
}

/// Whether any segment or ignorable of the unit has a target
pub(super) fn has_target(unit: NodeRef<'_>) -> bool {
    content_containers(unit).any(|c| c.child(ElementKind::Target).is_some())
}

/// Validator for the XLIFF 2.0 core and module constraints
///
/// The validator holds scratch state for tag-pair resolution that is reset for
/// every unit, so one instance must not validate two documents at once. Separate
/// instances can validate independent documents concurrently.
#[derive(Debug, Default)]
pub struct StandardValidator {
    limits: Limits,
    /// Start tags of the content side being resolved, by id
    pub(super) starts: IndexMap<String, NodeId>,
    /// Start tags that found their end tag
    pub(super) matched: HashSet<NodeId>,
}

impl StandardValidator {
    /// Create a validator with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits applied before traversal
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits in use
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Validate a document, returning the first violation
    pub fn validate(&mut self, doc: &Document) -> ValidationResult {
        self.reset();
        let result = self
            .check_limits(doc)
            .and_then(|_| self.validate_document(doc.root_ref()));
        if let Err(ref err) = result {
            debug!(
                code = err.code().value(),
                path = err.path().unwrap_or("#"),
                "validation failed"
            );
        }
        self.reset();
        result
    }

    pub(super) fn reset(&mut self) {
        self.starts.clear();
        self.matched.clear();
    }

    fn check_limits(&self, doc: &Document) -> ValidationResult {
        let mut count = 0usize;
        let mut stack = vec![(doc.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            count += 1;
            self.limits.check_depth(depth)?;
            stack.extend(doc.children(node).iter().map(|c| (*c, depth + 1)));
        }
        self.limits.check_nodes(count)?;
        Ok(())
    }

    // =========================================================================
    // Document, files and groups
    // =========================================================================

    fn validate_document(&mut self, xliff: NodeRef<'_>) -> ValidationResult {
        debug!("validating document");
        match xliff.attr("version") {
            None => {
                return Err(fail(
                    ErrorCode::InvalidVersion,
                    xliff,
                    "missing 'version' attribute",
                ))
            }
            Some(version) if !VERSION.is_match(version) => {
                return Err(fail(
                    ErrorCode::InvalidVersion,
                    xliff,
                    format!("unsupported version '{}'", version),
                ))
            }
            Some(_) => {}
        }

        let src_lang = xliff.attr("srcLang").ok_or_else(|| {
            fail(
                ErrorCode::MissingSourceLanguage,
                xliff,
                "missing 'srcLang' attribute",
            )
        })?;
        if !helpers::is_bcp47(src_lang) {
            return Err(fail(
                ErrorCode::InvalidSourceLanguage,
                xliff,
                format!("'{}' is not a BCP-47 language tag", src_lang),
            ));
        }
        match xliff.attr("trgLang") {
            Some(trg_lang) if !helpers::is_bcp47(trg_lang) => {
                return Err(fail(
                    ErrorCode::InvalidTargetLanguage,
                    xliff,
                    format!("'{}' is not a BCP-47 language tag", trg_lang),
                ));
            }
            None if xliff.descendants().any(|d| d.kind() == ElementKind::Target) => {
                return Err(fail(
                    ErrorCode::MissingTargetLanguage,
                    xliff,
                    "'trgLang' is required when the document contains a target",
                ));
            }
            _ => {}
        }

        let files: Vec<_> = xliff.children_of(ElementKind::File).collect();
        if files.is_empty() {
            return Err(fail(ErrorCode::NoFiles, xliff, "document has no <file>"));
        }
        let mut ids = HashSet::new();
        for file in &files {
            let id = require_id(*file)?;
            if !ids.insert(id) {
                return Err(fail(
                    ErrorCode::DuplicateFileId,
                    *file,
                    format!("duplicate file id '{}'", id),
                ));
            }
        }
        for file in files {
            self.validate_file(file)?;
        }
        self.validate_extensions(xliff)
    }

    fn validate_file(&mut self, file: NodeRef<'_>) -> ValidationResult {
        let id = require_id(file)?;
        debug!(file = id, "validating file");

        if let Some(original) = file.attr("original") {
            if !helpers::is_iri(original) {
                return Err(fail(
                    ErrorCode::InvalidIri,
                    file,
                    format!("'original' is not a valid IRI: '{}'", original),
                ));
            }
        }
        if !file
            .children()
            .any(|c| matches!(c.kind(), ElementKind::Group | ElementKind::Unit))
        {
            return Err(fail(
                ErrorCode::EmptyFile,
                file,
                "file must contain at least one <group> or <unit>",
            ));
        }
        unique_ids(
            file.descendants().filter(|d| d.kind() == ElementKind::Group),
            ErrorCode::DuplicateGroupId,
        )?;
        unique_ids(
            file.descendants().filter(|d| d.kind() == ElementKind::Unit),
            ErrorCode::DuplicateUnitId,
        )?;

        for child in file.children() {
            match child.kind() {
                ElementKind::Skeleton => self.validate_skeleton(child)?,
                _ => self.validate_container_child(child)?,
            }
        }
        self.validate_extensions(file)
    }

    fn validate_group(&mut self, group: NodeRef<'_>) -> ValidationResult {
        let id = require_id(group)?;
        debug!(group = id, "validating group");
        for child in group.children() {
            self.validate_container_child(child)?;
        }
        self.validate_extensions(group)
    }

    /// Children shared by file and group
    fn validate_container_child(&mut self, child: NodeRef<'_>) -> ValidationResult {
        match child.kind() {
            ElementKind::Notes => self.validate_notes(child),
            ElementKind::Group => self.validate_group(child),
            ElementKind::Unit => self.validate_unit(child),
            ElementKind::Metadata
            | ElementKind::ResourceData
            | ElementKind::ChangeTrack
            | ElementKind::Validation => self.validate_module(child),
            _ => Ok(()),
        }
    }

    fn validate_skeleton(&mut self, skeleton: NodeRef<'_>) -> ValidationResult {
        let has_content = skeleton.children().any(|c| match c.kind() {
            ElementKind::Text => c.text().map(|t| !t.trim().is_empty()).unwrap_or(false),
            _ => true,
        });
        match (skeleton.attr("href"), has_content) {
            (Some(href), false) => {
                if !helpers::is_iri(href) {
                    return Err(fail(
                        ErrorCode::InvalidIri,
                        skeleton,
                        format!("skeleton 'href' is not a valid IRI: '{}'", href),
                    ));
                }
            }
            (None, true) => {}
            _ => {
                return Err(fail(
                    ErrorCode::InvalidSkeleton,
                    skeleton,
                    "skeleton requires exactly one of 'href' and content",
                ))
            }
        }
        self.validate_extensions(skeleton)
    }

    pub(super) fn validate_notes(&mut self, notes: NodeRef<'_>) -> ValidationResult {
        if notes.child(ElementKind::Note).is_none() {
            return Err(fail(
                ErrorCode::EmptyContainer,
                notes,
                "<notes> must contain at least one <note>",
            ));
        }
        unique_ids(notes.children_of(ElementKind::Note), ErrorCode::DuplicateId)?;
        for note in notes.children_of(ElementKind::Note) {
            if let Some(priority) = note.attr("priority") {
                if !helpers::in_integer_range(priority, 1, 10) {
                    return Err(fail(
                        ErrorCode::InvalidNotePriority,
                        note,
                        format!("note priority {} is outside 1..=10", priority),
                    ));
                }
            }
            self.check_format_style(note)?;
        }
        Ok(())
    }

    // =========================================================================
    // Units
    // =========================================================================

    fn validate_unit(&mut self, unit: NodeRef<'_>) -> ValidationResult {
        let id = require_id(unit)?;
        debug!(unit = id, "validating unit");
        self.reset();

        let containers: Vec<_> = content_containers(unit).collect();
        if containers.is_empty() {
            return Err(fail(
                ErrorCode::EmptyUnit,
                unit,
                "unit must contain at least one <segment> or <ignorable>",
            ));
        }
        self.validate_content_containers(&containers)?;
        self.validate_unit_ids(&containers)?;
        self.check_format_style(unit)?;

        if let Some(notes) = unit.child(ElementKind::Notes) {
            self.validate_notes(notes)?;
        }
        if let Some(original_data) = unit.child(ElementKind::OriginalData) {
            self.validate_original_data(original_data)?;
        }
        for container in &containers {
            for content in container.children() {
                self.validate_inline_content(content)?;
            }
        }

        self.validate_tag_pairs(unit, ElementKind::Source)?;
        self.validate_tag_pairs(unit, ElementKind::Target)?;
        self.validate_sequences(unit)?;
        self.validate_copy_of(unit)?;
        self.validate_undeletable(unit)?;
        self.validate_references(unit)?;

        for child in unit.children() {
            if matches!(
                child.kind(),
                ElementKind::Matches
                    | ElementKind::Glossary
                    | ElementKind::Metadata
                    | ElementKind::ResourceData
                    | ElementKind::ChangeTrack
                    | ElementKind::Validation
            ) {
                self.validate_module(child)?;
            }
        }
        self.validate_extensions(unit)
    }

    /// Sources, targets, states, languages and target order of segments and ignorables
    fn validate_content_containers(&self, containers: &[NodeRef<'_>]) -> ValidationResult {
        let Some(first) = containers.first() else {
            return Ok(());
        };
        let xliff = first.document().root_ref();
        let src_lang = xliff.attr("srcLang");
        let trg_lang = xliff.attr("trgLang");
        let mut orders = HashSet::new();

        for container in containers {
            if let Some(id) = container.xml_id() {
                check_id(*container, id)?;
            }
            if let Some(sub_state) = container.attr("subState") {
                if container.attr("state").is_none() {
                    return Err(fail(
                        ErrorCode::InvalidSubState,
                        *container,
                        "'subState' requires an explicit 'state'",
                    ));
                }
                if !is_prefixed_value(sub_state) {
                    return Err(fail(
                        ErrorCode::InvalidSubState,
                        *container,
                        format!("'subState' must have the form prefix:value, got '{}'", sub_state),
                    ));
                }
            }

            let source = container.child(ElementKind::Source).ok_or_else(|| {
                fail(
                    ErrorCode::MissingSource,
                    *container,
                    format!("<{}> requires a <source>", container.name().qualified()),
                )
            })?;
            if let (Some(lang), Some(expected)) = (source.attr("xml:lang"), src_lang) {
                if lang != expected {
                    return Err(fail(
                        ErrorCode::SourceLanguageMismatch,
                        source,
                        format!("source xml:lang '{}' differs from srcLang '{}'", lang, expected),
                    ));
                }
            }

            let Some(target) = container.child(ElementKind::Target) else {
                continue;
            };
            if let (Some(lang), Some(expected)) = (target.attr("xml:lang"), trg_lang) {
                if lang != expected {
                    return Err(fail(
                        ErrorCode::TargetLanguageMismatch,
                        target,
                        format!("target xml:lang '{}' differs from trgLang '{}'", lang, expected),
                    ));
                }
            }
            if let Some(order) = target.attr("order") {
                let position = order.parse::<usize>().unwrap_or(0);
                if position == 0 || position > containers.len() {
                    return Err(fail(
                        ErrorCode::InvalidTargetOrder,
                        target,
                        format!("target order {} is outside 1..={}", order, containers.len()),
                    ));
                }
                if !orders.insert(position) {
                    return Err(fail(
                        ErrorCode::DuplicateTargetOrder,
                        target,
                        format!("target order {} is used twice", position),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Ids of segments, ignorables and source tags share one scope; target tags another
    fn validate_unit_ids(&self, containers: &[NodeRef<'_>]) -> ValidationResult {
        let tags_of = |side: ElementKind| {
            containers
                .iter()
                .filter_map(move |c| c.child(side))
                .flat_map(|content| content.descendants())
                .filter(|n| n.kind().is_inline_tag())
        };
        unique_ids(
            containers.iter().copied().chain(tags_of(ElementKind::Source)),
            ErrorCode::DuplicateId,
        )?;
        unique_ids(tags_of(ElementKind::Target), ErrorCode::DuplicateId)
    }

    pub(super) fn validate_original_data(&self, original_data: NodeRef<'_>) -> ValidationResult {
        let items: Vec<_> = original_data.children_of(ElementKind::Data).collect();
        if items.is_empty() {
            return Err(fail(
                ErrorCode::EmptyContainer,
                original_data,
                "<originalData> must contain at least one <data>",
            ));
        }
        for item in &items {
            require_id(*item)?;
        }
        unique_ids(items, ErrorCode::DuplicateId)?;
        for cp in original_data
            .descendants()
            .filter(|d| d.kind() == ElementKind::CodePoint)
        {
            self.check_code_point(cp)?;
        }
        Ok(())
    }

    /// Ids, code points, types, annotations and format style inside a source or target
    pub(super) fn validate_inline_content(&self, content: NodeRef<'_>) -> ValidationResult {
        for node in content.descendants() {
            match node.kind() {
                ElementKind::Text => {}
                ElementKind::CodePoint => self.check_code_point(node)?,
                ElementKind::SpanningCodeEnd | ElementKind::MarkedSpanEnd => {
                    if let Some(id) = node.xml_id() {
                        check_id(node, id)?;
                    }
                    self.check_code_type(node)?;
                }
                kind => {
                    require_id(node)?;
                    if kind.is_inline_code() {
                        self.check_code_type(node)?;
                    } else {
                        self.check_annotation(node)?;
                    }
                    self.check_format_style(node)?;
                }
            }
        }
        Ok(())
    }

    fn check_code_point(&self, cp: NodeRef<'_>) -> ValidationResult {
        let hex = cp.attr("hex").ok_or_else(|| {
            fail(ErrorCode::MissingAttribute, cp, "<cp> requires a 'hex' attribute")
        })?;
        helpers::check_code_point(hex)
            .map(|_| ())
            .map_err(|reason| fail(ErrorCode::InvalidCodePoint, cp, reason))
    }
}

//! Editing-hint sequences
//!
//! A run of inline codes starting with `canReorder="firstNo"` and continuing with
//! `canReorder="no"` forms a sequence that translators must keep intact. Source
//! sequences of two or more codes are keyed by their first member and must be
//! replayed identically in the target.

use tracing::trace;

use crate::documents::{NodeId, NodeRef};
use crate::elements::{ElementKind, ReorderState};

use super::exceptions::ErrorCode;
use super::standard::{fail, has_target, inline_tags, StandardValidator, ValidationResult};

/// Layout of a sequence's members relative to its first member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// All members share the first member's enclosing code
    Flat,
    /// All further members sit directly inside the first member
    Nested,
}

#[derive(Debug)]
struct Sequence<'a> {
    members: Vec<NodeRef<'a>>,
}

impl<'a> Sequence<'a> {
    fn first(&self) -> NodeRef<'a> {
        self.members[0]
    }

    fn key(&self) -> &'a str {
        self.first().xml_id().unwrap_or_default()
    }

    fn ids(&self) -> Vec<&'a str> {
        self.members
            .iter()
            .map(|m| m.xml_id().unwrap_or_default())
            .collect()
    }

    fn shape(&self) -> Option<Shape> {
        let first = self.first();
        let rest = &self.members[1..];
        let first_parent = enclosing_code(first);
        if rest.iter().all(|m| enclosing_code(*m) == first_parent) {
            Some(Shape::Flat)
        } else if rest
            .iter()
            .all(|m| enclosing_code(*m) == Some(first.node_id()))
        {
            Some(Shape::Nested)
        } else {
            None
        }
    }
}

fn enclosing_code(node: NodeRef<'_>) -> Option<NodeId> {
    node.ancestors()
        .find(|a| a.kind().is_inline_code())
        .map(|a| a.node_id())
}

/// Codes that take part in sequences: end tags of a pair mirror their start
fn sequence_codes<'a, 'b>(tags: &'b [NodeRef<'a>]) -> impl Iterator<Item = NodeRef<'a>> + 'b {
    tags.iter().copied().filter(|t| {
        t.kind().is_inline_code()
            && !(t.kind() == ElementKind::SpanningCodeEnd && t.start_ref().is_some())
    })
}

fn extract<'a>(tags: &[NodeRef<'a>]) -> Vec<Sequence<'a>> {
    let mut sequences = Vec::new();
    let mut current: Vec<NodeRef<'a>> = Vec::new();

    let mut flush = |run: &mut Vec<NodeRef<'a>>| {
        if run.len() >= 2 && run[0].xml_id().is_some() {
            sequences.push(Sequence {
                members: std::mem::take(run),
            });
        }
        run.clear();
    };

    for code in sequence_codes(tags) {
        match code.can_reorder() {
            ReorderState::FirstNo => {
                flush(&mut current);
                current.push(code);
            }
            ReorderState::No if !current.is_empty() => current.push(code),
            ReorderState::No => {}
            ReorderState::Yes => flush(&mut current),
        }
    }
    flush(&mut current);
    sequences
}

impl StandardValidator {
    pub(super) fn validate_sequences(&self, unit: NodeRef<'_>) -> ValidationResult {
        let source_tags = inline_tags(unit, ElementKind::Source);

        for code in source_tags.iter().filter(|t| t.kind().is_inline_code()) {
            if code.can_reorder() != ReorderState::Yes && (code.can_copy() || code.can_delete()) {
                return Err(fail(
                    ErrorCode::InvalidEditingHints,
                    *code,
                    "a code that cannot be reordered must have canCopy='no' and canDelete='no'",
                ));
            }
        }

        let mut source_sequences = Vec::new();
        for sequence in extract(&source_tags) {
            let shape = sequence.shape().ok_or_else(|| {
                fail(
                    ErrorCode::InvalidSequenceHierarchy,
                    sequence.first(),
                    format!(
                        "members of sequence '{}' are neither siblings nor nested in its first code",
                        sequence.key()
                    ),
                )
            })?;
            trace!(key = sequence.key(), len = sequence.members.len(), "source sequence");
            source_sequences.push((sequence, shape));
        }

        if source_sequences.is_empty() || !has_target(unit) {
            return Ok(());
        }

        let target_tags = inline_tags(unit, ElementKind::Target);
        let target_sequences = extract(&target_tags);
        for (sequence, shape) in &source_sequences {
            let counterpart = target_sequences
                .iter()
                .find(|t| t.key() == sequence.key())
                .ok_or_else(|| {
                    fail(
                        ErrorCode::SequenceNotFound,
                        sequence.first(),
                        format!("sequence '{}' not found in the target", sequence.key()),
                    )
                })?;
            if counterpart.ids() != sequence.ids() || counterpart.shape() != Some(*shape) {
                return Err(fail(
                    ErrorCode::SequenceMismatch,
                    counterpart.first(),
                    format!(
                        "target sequence '{}' does not replay the source sequence",
                        sequence.key()
                    ),
                ));
            }
        }
        Ok(())
    }
}

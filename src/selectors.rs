//! Selector paths
//!
//! XLIFF fragment identifiers address nodes by concatenating prefixed ids:
//! `#/f=file1/u=unit1/s1` is segment `s1` of unit `unit1` in file `file1`.
//! This module renders such paths for any selectable node and resolves them back,
//! either from the document root (`#/...`) or relative to a scope node (`#n=n1`).
//!
//! Containers without an id (`source`, `notes`, `originalData`, ...) and leaf
//! fragments (segments, inline tags) contribute no segment to the paths of their
//! descendants, so resolution retries an unmatched path through those children.
//! Content of a `<mtc:match>` is only addressable through the match's own id; a
//! match without one hides its descendants.

use crate::documents::{Document, NodeId};
use crate::elements::ElementKind;
use crate::names::is_nmtoken;

/// Prefix of inline tags addressed inside a `<target>`
pub const TARGET_PREFIX: &str = "t";

/// One step of a selector path: `prefix=id` or a bare `id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentStep {
    /// Optional prefix (`f`, `u`, `mtc`, ...)
    pub prefix: Option<String>,
    /// Identifier
    pub id: String,
}

impl FragmentStep {
    /// Parse a step, returning `None` when it is not well-formed
    ///
    /// The prefix must be an NMTOKEN without `=`; the id must be an NMTOKEN.
    pub fn parse(step: &str) -> Option<Self> {
        let (prefix, id) = match step.split_once('=') {
            Some((prefix, id)) => {
                if prefix.is_empty() || !prefix.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.') {
                    return None;
                }
                (Some(prefix.to_string()), id)
            }
            None => (None, step),
        };
        if !is_nmtoken(id) {
            return None;
        }
        Some(Self {
            prefix,
            id: id.to_string(),
        })
    }

    /// Render the step
    pub fn render(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}={}", p, self.id),
            None => self.id.clone(),
        }
    }
}

/// Whether a prefix is one the object model assigns
pub fn is_known_prefix(prefix: &str) -> bool {
    matches!(
        prefix,
        "f" | "g" | "u" | "n" | "d" | "t" | "mtc" | "gls" | "mda" | "res"
    )
}

/// Split a selector into its steps
///
/// Returns whether the path is absolute (`#/...`) and its non-empty steps.
pub fn split_path(path: &str) -> (bool, Vec<&str>) {
    let path = path.trim();
    let path = path.strip_prefix('#').unwrap_or(path);
    let absolute = path.starts_with('/');
    let steps = path.split('/').filter(|s| !s.is_empty()).collect();
    (absolute, steps)
}

/// Prefixed selector id of a node, `None` when it is not selectable or has no id
pub fn selector_id(doc: &Document, node: NodeId) -> Option<String> {
    let kind = doc.kind(node);
    let prefix = kind.declaration().selector_prefix?;
    let id = doc.own_value(node, "id")?;
    if in_anonymous_match(doc, node) {
        return None;
    }
    if kind.is_inline_tag() && doc.get(node).is_in_target() {
        return Some(format!("{}={}", TARGET_PREFIX, id));
    }
    if prefix.is_empty() {
        Some(id.to_string())
    } else {
        Some(format!("{}={}", prefix, id))
    }
}

/// Whether the node sits inside a `<mtc:match>` that has no id
fn in_anonymous_match(doc: &Document, node: NodeId) -> bool {
    doc.ancestors(node)
        .take_while(|a| doc.kind(*a) != ElementKind::Unit)
        .any(|a| doc.kind(a) == ElementKind::Match && doc.own_value(a, "id").is_none())
}

/// Whether the node contributes a segment to its descendants' paths
fn is_path_scope(doc: &Document, node: NodeId) -> bool {
    if node == doc.root() {
        return true;
    }
    !doc.kind(node).declaration().leaf_fragment && selector_id(doc, node).is_some()
}

/// Absolute selector path of a node
///
/// The path of the nearest ancestor that contributes a path segment, followed by
/// the node's own selector id. A node without a selector id renders as that
/// ancestor's path.
pub fn selector_path(doc: &Document, node: NodeId) -> String {
    if node == doc.root() {
        return "#".to_string();
    }
    let base = match doc.ancestors(node).find(|a| is_path_scope(doc, *a)) {
        Some(scope) if scope == doc.root() => "#".to_string(),
        Some(scope) => selector_path(doc, scope),
        None => "#".to_string(),
    };
    match selector_id(doc, node) {
        Some(id) => format!("{}/{}", base, id),
        None => base,
    }
}

/// Resolve an absolute selector from the document root
pub fn resolve(doc: &Document, path: &str) -> Option<NodeId> {
    resolve_from(doc, doc.root(), path)
}

/// Resolve a selector; absolute paths start at the root, relative ones at `scope`
///
/// Returns `None` when nothing matches, so optional references can be checked.
pub fn resolve_from(doc: &Document, scope: NodeId, path: &str) -> Option<NodeId> {
    let (absolute, steps) = split_path(path);
    let start = if absolute { doc.root() } else { scope };
    if steps.is_empty() {
        return Some(start);
    }
    find(doc, start, &steps)
}

fn find(doc: &Document, node: NodeId, steps: &[&str]) -> Option<NodeId> {
    let (first, rest) = steps.split_first()?;

    for &child in doc.children(node) {
        if selector_id(doc, child).as_deref() == Some(*first) {
            if rest.is_empty() {
                return Some(child);
            }
            if let Some(found) = find(doc, child, rest) {
                return Some(found);
            }
        }
    }

    // Retry through children that contribute no path segment
    doc.children(node)
        .iter()
        .filter(|c| !matches!(doc.kind(**c), ElementKind::Text | ElementKind::Match))
        .filter(|c| !is_path_scope(doc, **c))
        .find_map(|c| find(doc, *c, steps))
}

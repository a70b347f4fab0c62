//! XLIFF document tree
//!
//! The document owns every node in an arena; parents and children refer to each
//! other by [`NodeId`]. A node is created detached and becomes part of the tree
//! through [`Document::attach_child`], the single store operation shared by
//! programmatic construction and the loader. Parent links are plain indices used
//! for upward traversal and inheritance, never for ownership.

use indexmap::IndexMap;

use crate::elements::{
    AttributeRecord, AttributeView, Directionality, ElementKind, Inheritance, ReorderState,
};
use crate::error::{Error, Result};
use crate::names::XmlName;
use crate::selectors;

/// Index of a node inside its [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element or text node
#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    name: XmlName,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: IndexMap<&'static str, AttributeRecord>,
    extension_attributes: IndexMap<XmlName, String>,
    text: Option<String>,
}

impl Node {
    fn new(kind: ElementKind, name: XmlName) -> Self {
        let decl = kind.declaration();
        let mut attributes: IndexMap<&'static str, AttributeRecord> = decl
            .attributes
            .iter()
            .map(|a| (a.property, AttributeRecord::from_decl(a)))
            .collect();
        for disabled in decl.disabled {
            if let Some(record) = attributes.get_mut(disabled) {
                record.set_supported(false);
            }
        }
        Self {
            kind,
            name,
            parent: None,
            children: Vec::new(),
            attributes,
            extension_attributes: IndexMap::new(),
            text: None,
        }
    }
}

/// XLIFF document: arena of nodes rooted at an `<xliff>` element
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Create a document holding only its `<xliff>` root
    pub fn new() -> Self {
        let root = Node::new(ElementKind::Document, ElementKind::Document.xml_name());
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// The `<xliff>` root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds only the root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Read view of a node
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    /// Read view of the root
    pub fn root_ref(&self) -> NodeRef<'_> {
        self.get(self.root)
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::NodeNotFound(id.0))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id.0).ok_or(Error::NodeNotFound(id.0))
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Create a detached element of the given kind
    pub fn create(&mut self, kind: ElementKind) -> NodeId {
        self.push(Node::new(kind, kind.xml_name()))
    }

    /// Create a detached extension element with its own name
    pub fn create_extension(&mut self, name: XmlName) -> NodeId {
        self.push(Node::new(ElementKind::Extension, name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        let mut node = Node::new(ElementKind::Text, ElementKind::Text.xml_name());
        node.text = Some(text.into());
        self.push(node)
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Attach a detached node as the last child of `parent`
    ///
    /// Fails when the child kind is not declared for the parent, when the child
    /// already has a parent, when the attachment would create a cycle, or when the
    /// parent variant's store step rejects it.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_kind = self.node(parent)?.kind;
        let child_node = self.node(child)?;
        let child_kind = child_node.kind;

        if child_node.parent.is_some() {
            return Err(Error::AlreadyParented(child_node.name.qualified()));
        }
        if child == parent || child == self.root || self.ancestors(parent).any(|a| a == child) {
            return Err(Error::Cycle(child_node.name.qualified()));
        }
        if !parent_kind.declaration().accepts(child_kind) {
            return Err(Error::InvalidChild {
                parent: self.node(parent)?.name.qualified(),
                child: child_node.name.qualified(),
                reason: None,
            });
        }
        if let Err(reason) = self.store_child(parent, child_kind) {
            return Err(Error::InvalidChild {
                parent: self.node(parent)?.name.qualified(),
                child: child_node.name.qualified(),
                reason: Some(reason),
            });
        }

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Per-variant store step run after the declared child type check
    fn store_child(&self, parent: NodeId, child_kind: ElementKind) -> std::result::Result<(), String> {
        let parent_kind = self.kind(parent);
        let siblings = &self.nodes[parent.0].children;
        let has = |kind: ElementKind| siblings.iter().any(|c| self.kind(*c) == kind);

        if parent_kind.declaration().singletons.contains(&child_kind) && has(child_kind) {
            return Err(format!(
                "only one <{}> is allowed",
                child_kind.xml_name().qualified()
            ));
        }

        match (parent_kind, child_kind) {
            (ElementKind::Segment | ElementKind::Ignorable | ElementKind::Match, ElementKind::Target)
                if !has(ElementKind::Source) =>
            {
                Err("<target> must follow <source>".to_string())
            }
            (ElementKind::Skeleton, ElementKind::Text) if has(ElementKind::Extension) => {
                Err("skeleton content is either text or extension elements".to_string())
            }
            (ElementKind::Skeleton, ElementKind::Extension) if has(ElementKind::Text) => {
                Err("skeleton content is either text or extension elements".to_string())
            }
            _ => Ok(()),
        }
    }

    /// Create an element and attach it under `parent`
    pub fn append(&mut self, parent: NodeId, kind: ElementKind) -> Result<NodeId> {
        let child = self.create(kind);
        self.attach_child(parent, child)?;
        Ok(child)
    }

    /// Create an element, set attributes on it and attach it under `parent`
    pub fn append_with(
        &mut self,
        parent: NodeId,
        kind: ElementKind,
        attributes: &[(&str, &str)],
    ) -> Result<NodeId> {
        let child = self.create(kind);
        for (name, value) in attributes {
            self.set_attribute(child, name, *value)?;
        }
        self.attach_child(parent, child)?;
        Ok(child)
    }

    /// Create a text node and attach it under `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> Result<NodeId> {
        let child = self.create_text(text);
        self.attach_child(parent, child)?;
        Ok(child)
    }

    /// Replace the content of a text node
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<()> {
        let n = self.node_mut(node)?;
        if n.kind != ElementKind::Text {
            return Err(Error::TextNotAllowed(n.name.qualified()));
        }
        n.text = Some(text.into());
        Ok(())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Kind of a node
    pub fn kind(&self, node: NodeId) -> ElementKind {
        self.nodes[node.0].kind
    }

    /// Qualified name of a node
    pub fn name(&self, node: NodeId) -> &XmlName {
        &self.nodes[node.0].name
    }

    /// Parent of a node
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    /// Ordered children of a node, text included
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Text of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(node),
        }
    }

    /// Strict descendants in document order
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(node).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Concatenated text of all text descendants
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|d| self.text(d))
            .collect()
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Attribute record, failing if unregistered or disabled
    pub fn record(&self, node: NodeId, name: &str) -> Result<&AttributeRecord> {
        let n = self.node(node)?;
        match n.attributes.get(name) {
            Some(record) if record.is_supported() => Ok(record),
            _ => Err(Error::UnsupportedAttribute {
                element: n.name.qualified(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Own value of an attribute
    pub fn get_attribute(&self, node: NodeId, name: &str) -> Result<Option<&str>> {
        Ok(self.record(node, name)?.value())
    }

    /// Own value of an attribute, `None` when absent, unregistered or disabled
    pub fn own_value(&self, node: NodeId, name: &str) -> Option<&str> {
        self.record(node, name).ok().and_then(AttributeRecord::value)
    }

    /// Whether the node carries its own value for the attribute
    pub fn has_value(&self, node: NodeId, name: &str) -> bool {
        self.own_value(node, name).is_some()
    }

    /// Set an attribute
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let n = self.node_mut(node)?;
        match n.attributes.get_mut(name) {
            Some(record) if record.is_supported() => record.set(value.into()),
            _ => Err(Error::UnsupportedAttribute {
                element: n.name.qualified(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Remove an attribute's own value
    pub fn clear_attribute(&mut self, node: NodeId, name: &str) -> Result<()> {
        let n = self.node_mut(node)?;
        match n.attributes.get_mut(name) {
            Some(record) if record.is_supported() => {
                record.clear();
                Ok(())
            }
            _ => Err(Error::UnsupportedAttribute {
                element: n.name.qualified(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Enable or disable a registered attribute on one node
    ///
    /// Disabling drops the node's own value.
    pub fn enable(&mut self, node: NodeId, name: &str, enabled: bool) -> Result<()> {
        let n = self.node_mut(node)?;
        match n.attributes.get_mut(name) {
            Some(record) => {
                record.set_supported(enabled);
                Ok(())
            }
            None => Err(Error::UnsupportedAttribute {
                element: n.name.qualified(),
                attribute: name.to_string(),
            }),
        }
    }

    /// Whether an attribute is registered and enabled on the node
    pub fn is_supported(&self, node: NodeId, name: &str) -> bool {
        self.record(node, name).is_ok()
    }

    /// Effective value: own value, else inherited value, else default
    pub fn effective_value(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        let record = self.record(node, name)?;
        if let Some(value) = record.value() {
            return Ok(Some(value.to_string()));
        }
        Ok(self
            .inherited_value(node, name, record.inheritance())
            .or_else(|| record.default().map(str::to_string)))
    }

    fn inherited_value(&self, node: NodeId, name: &str, inheritance: Inheritance) -> Option<String> {
        match inheritance {
            Inheritance::None => None,
            Inheritance::Ancestor { kinds, property } => {
                let ancestor = self.ancestors(node).find(|a| kinds.contains(&self.kind(*a)))?;
                self.effective_value(ancestor, property).ok().flatten()
            }
            Inheritance::Custom(resolver) => resolver(self, node, name),
        }
    }

    /// Set an extension attribute on an extensible node
    pub fn set_extension_attribute(
        &mut self,
        node: NodeId,
        name: XmlName,
        value: impl Into<String>,
    ) -> Result<()> {
        let n = self.node_mut(node)?;
        if !n.kind.declaration().extensible {
            return Err(Error::UnsupportedAttribute {
                element: n.name.qualified(),
                attribute: name.qualified(),
            });
        }
        n.extension_attributes.insert(name, value.into());
        Ok(())
    }

    /// Extension attributes of a node, in insertion order
    pub fn extension_attributes(&self, node: NodeId) -> impl Iterator<Item = (&XmlName, &str)> {
        self.nodes[node.0]
            .extension_attributes
            .iter()
            .map(|(k, v)| (k, v.as_str()))
    }

    /// Look up an extension attribute by its `prefix:local` rendering
    pub fn extension_attribute(&self, node: NodeId, qualified: &str) -> Option<&str> {
        self.extension_attributes(node)
            .find(|(name, _)| name.qualified() == qualified)
            .map(|(_, value)| value)
    }

    /// Enumerate declared and extension attributes
    pub fn attributes(&self, node: NodeId) -> Vec<AttributeView<'_>> {
        let n = &self.nodes[node.0];
        n.attributes
            .values()
            .map(|r| AttributeView {
                name: r.name(),
                value: r.value(),
                supported: r.is_supported(),
                extension: false,
            })
            .chain(n.extension_attributes.iter().map(|(name, value)| AttributeView {
                name,
                value: Some(value.as_str()),
                supported: true,
                extension: true,
            }))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over strict ancestors
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over strict descendants
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

/// Borrowed view of one node with the typed accessors the validator reads
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("xml_id", &self.xml_id())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl<'a> NodeRef<'a> {
    /// Owning document
    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Node index
    pub fn node_id(&self) -> NodeId {
        self.id
    }

    /// Element kind
    pub fn kind(&self) -> ElementKind {
        self.doc.kind(self.id)
    }

    /// Qualified name
    pub fn name(&self) -> &'a XmlName {
        self.doc.name(self.id)
    }

    /// Parent
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.doc.parent(self.id).map(|p| self.doc.get(p))
    }

    /// Ordered children, text included
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.children(self.id).iter().map(move |c| doc.get(*c))
    }

    /// Children of the given kind
    pub fn children_of(&self, kind: ElementKind) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children().filter(move |c| c.kind() == kind)
    }

    /// First child of the given kind
    pub fn child(&self, kind: ElementKind) -> Option<NodeRef<'a>> {
        self.children().find(|c| c.kind() == kind)
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.ancestors(self.id).map(move |a| doc.get(a))
    }

    /// Nearest ancestor of the given kind
    pub fn ancestor(&self, kind: ElementKind) -> Option<NodeRef<'a>> {
        self.ancestors().find(|a| a.kind() == kind)
    }

    /// Strict descendants in document order
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        doc.descendants(self.id).map(move |d| doc.get(d))
    }

    /// Text of a text node
    pub fn text(&self) -> Option<&'a str> {
        self.doc.text(self.id)
    }

    /// Concatenated descendant text
    pub fn text_content(&self) -> String {
        self.doc.text_content(self.id)
    }

    /// Own attribute value (absent, unregistered and disabled all read as `None`)
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.doc.own_value(self.id, name)
    }

    /// Effective attribute value (`None` when absent everywhere or unsupported)
    pub fn value(&self, name: &str) -> Option<String> {
        self.doc.effective_value(self.id, name).ok().flatten()
    }

    /// Own value, else the registered default, without ancestor lookup
    pub fn value_or_default(&self, name: &str) -> Option<&'a str> {
        self.doc
            .record(self.id, name)
            .ok()
            .and_then(AttributeRecord::value_or_default)
    }

    /// Whether an attribute is registered and enabled
    pub fn supports(&self, name: &str) -> bool {
        self.doc.is_supported(self.id, name)
    }

    /// Whether the effective value of a yes/no attribute is `yes`
    pub fn is_yes(&self, name: &str) -> bool {
        self.value(name).as_deref() == Some("yes")
    }

    /// Extension attributes
    pub fn extension_attributes(&self) -> impl Iterator<Item = (&'a XmlName, &'a str)> + 'a {
        self.doc.extension_attributes(self.id)
    }

    /// `id` attribute
    pub fn xml_id(&self) -> Option<&'a str> {
        self.attr("id")
    }

    /// `type` attribute
    pub fn type_(&self) -> Option<&'a str> {
        self.attr("type")
    }

    /// `subType` attribute
    pub fn sub_type(&self) -> Option<&'a str> {
        self.attr("subType")
    }

    /// `startRef` attribute
    pub fn start_ref(&self) -> Option<&'a str> {
        self.attr("startRef")
    }

    /// `copyOf` attribute
    pub fn copy_of(&self) -> Option<&'a str> {
        self.attr("copyOf")
    }

    /// Effective `canCopy`
    pub fn can_copy(&self) -> bool {
        self.is_yes("canCopy")
    }

    /// Effective `canDelete`
    pub fn can_delete(&self) -> bool {
        self.is_yes("canDelete")
    }

    /// Effective `canOverlap`
    pub fn can_overlap(&self) -> bool {
        self.is_yes("canOverlap")
    }

    /// Effective `canReorder`
    pub fn can_reorder(&self) -> ReorderState {
        self.value("canReorder")
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(ReorderState::Yes)
    }

    /// Effective `isolated`
    pub fn is_isolated(&self) -> bool {
        self.is_yes("isolated")
    }

    /// Effective `dir`
    pub fn directionality(&self) -> Option<Directionality> {
        self.value("dir").and_then(|v| v.parse().ok())
    }

    /// Whether the node sits inside a `<target>`
    pub fn is_in_target(&self) -> bool {
        self.ancestors()
            .find(|a| matches!(a.kind(), ElementKind::Source | ElementKind::Target))
            .map(|a| a.kind() == ElementKind::Target)
            .unwrap_or(false)
    }

    /// Whether the node can be addressed by a selector
    pub fn is_selectable(&self) -> bool {
        selectors::selector_id(self.doc, self.id).is_some()
    }

    /// Prefixed selector id (`f=file1`, `t=pc1`, `s1`, ...)
    pub fn selector_id(&self) -> Option<String> {
        selectors::selector_id(self.doc, self.id)
    }

    /// Whether selector paths end at this node
    pub fn is_leaf_fragment(&self) -> bool {
        self.kind().declaration().leaf_fragment
    }

    /// Absolute selector path (`#/f=file1/u=unit1/s1`)
    pub fn selector_path(&self) -> String {
        selectors::selector_path(self.doc, self.id)
    }
}

//! Element variants and their static declaration tables
//!
//! Each [`ElementKind`] maps to one [`ElementDeclaration`] built once on first use:
//! the attributes it registers (with defaults, inheritance and converters), the
//! child kinds it accepts, the base attributes it disables, and its selector
//! identity. This replaces discovering attributes and children at run time.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::documents::{Document, NodeId};
use crate::names::XmlName;
use crate::namespaces as ns;

use super::attributes::{AttributeDecl, ValueConverter};

/// Every element variant of the object model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// `<xliff>` root
    Document,
    /// `<file>`
    File,
    /// `<skeleton>`
    Skeleton,
    /// `<group>`
    Group,
    /// `<unit>`
    Unit,
    /// `<notes>`
    Notes,
    /// `<note>`
    Note,
    /// `<originalData>`
    OriginalData,
    /// `<data>`
    Data,
    /// `<segment>`
    Segment,
    /// `<ignorable>`
    Ignorable,
    /// `<source>`
    Source,
    /// `<target>`
    Target,
    /// `<cp>` code point
    CodePoint,
    /// `<ph>` standalone code
    StandaloneCode,
    /// `<pc>` spanning code
    SpanningCode,
    /// `<sc>` spanning code start
    SpanningCodeStart,
    /// `<ec>` spanning code end
    SpanningCodeEnd,
    /// `<mrk>` marked span
    MarkedSpan,
    /// `<sm>` marked span start
    MarkedSpanStart,
    /// `<em>` marked span end
    MarkedSpanEnd,
    /// Character data
    Text,
    /// `<mtc:matches>`
    Matches,
    /// `<mtc:match>`
    Match,
    /// `<gls:glossary>`
    Glossary,
    /// `<gls:glossEntry>`
    GlossaryEntry,
    /// `<gls:term>`
    Term,
    /// `<gls:translation>`
    Translation,
    /// `<gls:definition>`
    Definition,
    /// `<mda:metadata>`
    Metadata,
    /// `<mda:metaGroup>`
    MetaGroup,
    /// `<mda:meta>`
    Meta,
    /// `<res:resourceData>`
    ResourceData,
    /// `<res:resourceItem>`
    ResourceItem,
    /// `<res:resourceItemRef>`
    ResourceItemRef,
    /// `<res:source>`
    ResourceSource,
    /// `<res:target>`
    ResourceTarget,
    /// `<res:reference>`
    ResourceReference,
    /// `<ctr:changeTrack>`
    ChangeTrack,
    /// `<ctr:revisions>`
    Revisions,
    /// `<ctr:revision>`
    Revision,
    /// `<ctr:item>`
    RevisionItem,
    /// `<val:validation>`
    Validation,
    /// `<val:rule>`
    Rule,
    /// Element from a foreign namespace
    Extension,
}

use ElementKind::*;

/// Inline content kinds allowed in source, target, pc and mrk
pub const INLINE: &[ElementKind] = &[
    Text,
    CodePoint,
    StandaloneCode,
    SpanningCode,
    SpanningCodeStart,
    SpanningCodeEnd,
    MarkedSpan,
    MarkedSpanStart,
    MarkedSpanEnd,
];

/// Inline tags that take part in editing hints
pub const INLINE_CODES: &[ElementKind] = &[
    StandaloneCode,
    SpanningCode,
    SpanningCodeStart,
    SpanningCodeEnd,
];

const STRUCTURAL: &[ElementKind] = &[Unit, Group, File];
const STRUCTURAL_OR_ROOT: &[ElementKind] = &[Unit, Group, File, Document];
const SPACE_SCOPES: &[ElementKind] = &[
    SpanningCode,
    Source,
    Target,
    Unit,
    Group,
    File,
    Document,
];
const ANNOTATION_SCOPES: &[ElementKind] = &[MarkedSpan, Unit, Group, File];

/// Static description of an element variant
#[derive(Debug, Clone)]
pub struct ElementDeclaration {
    /// Namespace URI
    pub namespace: Option<&'static str>,
    /// Namespace prefix
    pub prefix: Option<&'static str>,
    /// Local name
    pub local_name: &'static str,
    /// Declared attributes in rendering order
    pub attributes: Vec<AttributeDecl>,
    /// Accepted child kinds
    pub children: &'static [ElementKind],
    /// Child kinds that may occur at most once
    pub singletons: &'static [ElementKind],
    /// Base attributes disabled on this variant
    pub disabled: &'static [&'static str],
    /// Selector prefix (`Some("")` for unprefixed ids, `None` when not selectable)
    pub selector_prefix: Option<&'static str>,
    /// Whether a selector path ends at this node
    pub leaf_fragment: bool,
    /// Whether the node accepts extension attributes
    pub extensible: bool,
}

impl ElementDeclaration {
    fn new(prefix: Option<&'static str>, local_name: &'static str) -> Self {
        let namespace = match prefix {
            Some(p) => ns::namespace_for(p),
            None => Some(ns::XLIFF_CORE),
        };
        Self {
            namespace,
            prefix,
            local_name,
            attributes: Vec::new(),
            children: &[],
            singletons: &[],
            disabled: &[],
            selector_prefix: None,
            leaf_fragment: true,
            extensible: false,
        }
    }

    fn attrs(mut self, attrs: impl IntoIterator<Item = AttributeDecl>) -> Self {
        self.attributes.extend(attrs);
        self
    }

    fn children(mut self, children: &'static [ElementKind]) -> Self {
        self.children = children;
        self
    }

    fn singletons(mut self, singletons: &'static [ElementKind]) -> Self {
        self.singletons = singletons;
        self
    }

    fn disable(mut self, disabled: &'static [&'static str]) -> Self {
        self.disabled = disabled;
        self
    }

    fn selectable(mut self, prefix: &'static str, leaf: bool) -> Self {
        self.selector_prefix = Some(prefix);
        self.leaf_fragment = leaf;
        self
    }

    fn extensible(mut self) -> Self {
        self.extensible = true;
        self
    }

    fn container(mut self) -> Self {
        self.leaf_fragment = false;
        self
    }

    fn unqualified(mut self) -> Self {
        self.namespace = None;
        self
    }

    /// Qualified name of the variant
    pub fn xml_name(&self) -> XmlName {
        XmlName {
            namespace: self.namespace.map(str::to_string),
            prefix: self.prefix.map(str::to_string),
            local_name: self.local_name.to_string(),
        }
    }

    /// Find an attribute declaration by property name
    pub fn attribute(&self, property: &str) -> Option<&AttributeDecl> {
        self.attributes.iter().find(|a| a.property == property)
    }

    /// Whether a child kind is accepted
    pub fn accepts(&self, kind: ElementKind) -> bool {
        self.children.contains(&kind)
    }
}

impl ElementKind {
    /// The static declaration of this variant
    pub fn declaration(self) -> &'static ElementDeclaration {
        // Every variant is registered by `build_declarations`
        &DECLARATIONS[&self]
    }

    /// Qualified name of the variant
    pub fn xml_name(self) -> XmlName {
        self.declaration().xml_name()
    }

    /// Find the variant for a namespace and local name
    pub fn from_name(namespace: &str, local_name: &str) -> Option<ElementKind> {
        DECLARATIONS
            .iter()
            .filter(|(kind, _)| !matches!(kind, Text | Extension))
            .find(|(_, decl)| decl.namespace == Some(namespace) && decl.local_name == local_name)
            .map(|(kind, _)| *kind)
    }

    /// Whether this is an inline content kind (including text)
    pub fn is_inline(self) -> bool {
        INLINE.contains(&self)
    }

    /// Whether this is an inline code taking part in editing hints
    pub fn is_inline_code(self) -> bool {
        INLINE_CODES.contains(&self)
    }

    /// Whether this is an inline tag that can carry an id (codes and markers)
    pub fn is_inline_tag(self) -> bool {
        self.is_inline() && !matches!(self, Text | CodePoint)
    }
}

static DECLARATIONS: Lazy<HashMap<ElementKind, ElementDeclaration>> =
    Lazy::new(build_declarations);

const YES_NO: ValueConverter = ValueConverter::YesNo;
const CODE_TYPES: &[&str] = &["fmt", "ui", "quote", "link", "image", "other"];
const STATES: &[&str] = &["initial", "translated", "reviewed", "final"];
const APPLIES_TO: &[&str] = &["source", "target"];
const MATCH_TYPES: &[&str] = &["am", "mt", "icm", "idm", "tb", "tm", "other"];
const NORMALIZATION: &[&str] = &["none", "nfc", "nfd"];

fn id() -> AttributeDecl {
    AttributeDecl::new("id")
}

fn required_id() -> AttributeDecl {
    AttributeDecl::new("id").required()
}

fn space(scopes: &'static [ElementKind]) -> AttributeDecl {
    AttributeDecl::new("xml:space")
        .with_default("default")
        .with_converter(ValueConverter::Space)
        .inherit_from(scopes, "xml:space")
}

fn format_style() -> [AttributeDecl; 2] {
    [AttributeDecl::new("fs:fs"), AttributeDecl::new("fs:subFs")]
}

/// Attributes shared by file, group and unit
fn structural(inherits: &'static [ElementKind]) -> Vec<AttributeDecl> {
    let inherited = |decl: AttributeDecl, property| {
        if inherits.is_empty() {
            decl
        } else {
            decl.inherit_from(inherits, property)
        }
    };
    vec![
        inherited(
            AttributeDecl::new("canResegment")
                .with_default("yes")
                .with_converter(YES_NO),
            "canResegment",
        ),
        inherited(
            AttributeDecl::new("translate")
                .with_default("yes")
                .with_converter(YES_NO),
            "translate",
        ),
        inherited(
            AttributeDecl::new("srcDir")
                .with_default("auto")
                .with_converter(ValueConverter::Direction),
            "srcDir",
        ),
        inherited(
            AttributeDecl::new("trgDir")
                .with_default("auto")
                .with_converter(ValueConverter::Direction),
            "trgDir",
        ),
    ]
}

/// Editing hints and code attributes shared by ph, pc, sc and ec
fn code_common(can_overlap: Option<&'static str>) -> Vec<AttributeDecl> {
    let mut attrs = vec![
        AttributeDecl::new("canCopy")
            .with_default("yes")
            .with_converter(YES_NO),
        AttributeDecl::new("canDelete")
            .with_default("yes")
            .with_converter(YES_NO),
        AttributeDecl::new("canReorder")
            .with_default("yes")
            .with_converter(ValueConverter::Reorder),
    ];
    if let Some(default) = can_overlap {
        attrs.push(
            AttributeDecl::new("canOverlap")
                .with_default(default)
                .with_converter(YES_NO),
        );
    }
    attrs.extend([
        AttributeDecl::new("copyOf"),
        AttributeDecl::new("type").with_converter(ValueConverter::Enumerated(CODE_TYPES)),
        AttributeDecl::new("subType"),
    ]);
    attrs.extend(format_style());
    attrs
}

fn inline_dir() -> AttributeDecl {
    AttributeDecl::new("dir")
        .with_converter(ValueConverter::Direction)
        .inherit_with(resolve_inline_directionality)
}

fn annotation() -> Vec<AttributeDecl> {
    vec![
        AttributeDecl::new("translate")
            .with_converter(YES_NO)
            .with_default("yes")
            .inherit_from(ANNOTATION_SCOPES, "translate"),
        AttributeDecl::new("type")
            .with_default("generic")
            .with_converter(ValueConverter::EnumeratedOrPrefixed(&[
                "generic", "comment", "term",
            ])),
        AttributeDecl::new("ref"),
        AttributeDecl::new("value"),
    ]
}

/// Base shared by segment and ignorable
fn container_base() -> Vec<AttributeDecl> {
    vec![
        id(),
        AttributeDecl::new("canResegment")
            .with_default("yes")
            .with_converter(YES_NO)
            .inherit_from(STRUCTURAL, "canResegment"),
        AttributeDecl::new("state")
            .with_default("initial")
            .with_converter(ValueConverter::Enumerated(STATES)),
        AttributeDecl::new("subState"),
    ]
}

/// Base shared by source and target
fn content_base(lang: fn(&Document, NodeId, &str) -> Option<String>) -> Vec<AttributeDecl> {
    vec![
        AttributeDecl::new("xml:lang").inherit_with(lang),
        space(SPACE_SCOPES),
        AttributeDecl::new("order").with_converter(ValueConverter::Unsigned),
    ]
}

fn language_ref() -> [AttributeDecl; 2] {
    [AttributeDecl::new("href"), AttributeDecl::new("xml:lang")]
}

fn build_declarations() -> HashMap<ElementKind, ElementDeclaration> {
    let mut m = HashMap::new();
    let core = |local| ElementDeclaration::new(None, local);
    let module = |prefix, local| ElementDeclaration::new(Some(prefix), local);

    m.insert(
        Document,
        core("xliff")
            .attrs([
                AttributeDecl::new("version").required(),
                AttributeDecl::new("srcLang").required(),
                AttributeDecl::new("trgLang"),
                space(&[]),
            ])
            .children(&[File])
            .container()
            .extensible(),
    );
    m.insert(
        File,
        core("file")
            .attrs([required_id(), AttributeDecl::new("original"), space(STRUCTURAL_OR_ROOT)])
            .attrs(structural(&[]))
            .children(&[
                Skeleton,
                Metadata,
                ResourceData,
                ChangeTrack,
                Validation,
                Notes,
                Group,
                Unit,
                Extension,
            ])
            .singletons(&[Skeleton, Metadata, ResourceData, ChangeTrack, Validation, Notes])
            .selectable("f", false)
            .extensible(),
    );
    m.insert(
        Skeleton,
        core("skeleton")
            .attrs([AttributeDecl::new("href")])
            .children(&[Text, Extension]),
    );
    m.insert(
        Group,
        core("group")
            .attrs([
                required_id(),
                AttributeDecl::new("name"),
                AttributeDecl::new("type"),
                space(STRUCTURAL_OR_ROOT),
            ])
            .attrs(structural(&[Group, File]))
            .children(&[
                Metadata,
                ResourceData,
                ChangeTrack,
                Validation,
                Notes,
                Group,
                Unit,
                Extension,
            ])
            .singletons(&[Metadata, ResourceData, ChangeTrack, Validation, Notes])
            .selectable("g", false)
            .extensible(),
    );
    m.insert(
        Unit,
        core("unit")
            .attrs([
                required_id(),
                AttributeDecl::new("name"),
                AttributeDecl::new("type"),
                space(STRUCTURAL_OR_ROOT),
            ])
            .attrs(structural(&[Group, File]))
            .attrs(format_style())
            .children(&[
                Matches,
                Glossary,
                Metadata,
                ResourceData,
                ChangeTrack,
                Validation,
                Notes,
                OriginalData,
                Segment,
                Ignorable,
                Extension,
            ])
            .singletons(&[
                Matches,
                Glossary,
                Metadata,
                ResourceData,
                ChangeTrack,
                Validation,
                Notes,
                OriginalData,
            ])
            .selectable("u", false)
            .extensible(),
    );
    m.insert(Notes, core("notes").children(&[Note]));
    m.insert(
        Note,
        core("note")
            .attrs([
                id(),
                AttributeDecl::new("appliesTo")
                    .with_converter(ValueConverter::Enumerated(APPLIES_TO)),
                AttributeDecl::new("category"),
                AttributeDecl::new("priority")
                    .with_default("1")
                    .with_converter(ValueConverter::Unsigned),
            ])
            .attrs(format_style())
            .children(&[Text])
            .selectable("n", true)
            .extensible(),
    );
    m.insert(OriginalData, core("originalData").children(&[Data]));
    m.insert(
        Data,
        core("data")
            .attrs([
                required_id(),
                AttributeDecl::new("dir")
                    .with_default("auto")
                    .with_converter(ValueConverter::Direction),
                AttributeDecl::new("xml:space")
                    .with_default("preserve")
                    .with_converter(ValueConverter::Space),
            ])
            .children(&[Text, CodePoint])
            .selectable("d", true),
    );
    m.insert(
        Segment,
        core("segment")
            .attrs(container_base())
            .children(&[Source, Target])
            .singletons(&[Source, Target])
            .selectable("", true),
    );
    m.insert(
        Ignorable,
        core("ignorable")
            .attrs(container_base())
            .disable(&["canResegment", "state", "subState"])
            .children(&[Source, Target])
            .singletons(&[Source, Target])
            .selectable("", true),
    );
    m.insert(
        Source,
        core("source")
            .attrs(content_base(resolve_source_language))
            .disable(&["order"])
            .children(INLINE),
    );
    m.insert(
        Target,
        core("target")
            .attrs(content_base(resolve_target_language))
            .children(INLINE),
    );
    m.insert(
        CodePoint,
        core("cp").attrs([AttributeDecl::new("hex").required()]),
    );
    m.insert(
        StandaloneCode,
        core("ph")
            .attrs([
                required_id(),
                AttributeDecl::new("disp"),
                AttributeDecl::new("equiv"),
                AttributeDecl::new("dataRef"),
                AttributeDecl::new("subFlows"),
            ])
            .attrs(code_common(None))
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        SpanningCode,
        core("pc")
            .attrs([
                required_id(),
                AttributeDecl::new("dispStart"),
                AttributeDecl::new("dispEnd"),
                AttributeDecl::new("equivStart"),
                AttributeDecl::new("equivEnd"),
                AttributeDecl::new("dataRefStart"),
                AttributeDecl::new("dataRefEnd"),
                AttributeDecl::new("subFlowsStart"),
                AttributeDecl::new("subFlowsEnd"),
                inline_dir(),
            ])
            .attrs(code_common(Some("no")))
            .children(INLINE)
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        SpanningCodeStart,
        core("sc")
            .attrs([
                required_id(),
                AttributeDecl::new("disp"),
                AttributeDecl::new("equiv"),
                AttributeDecl::new("dataRef"),
                AttributeDecl::new("subFlows"),
                AttributeDecl::new("isolated")
                    .with_default("no")
                    .with_converter(YES_NO),
                inline_dir(),
            ])
            .attrs(code_common(Some("yes")))
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        SpanningCodeEnd,
        core("ec")
            .attrs([
                id(),
                AttributeDecl::new("startRef"),
                AttributeDecl::new("disp"),
                AttributeDecl::new("equiv"),
                AttributeDecl::new("dataRef"),
                AttributeDecl::new("subFlows"),
                AttributeDecl::new("isolated")
                    .with_default("no")
                    .with_converter(YES_NO),
                inline_dir(),
            ])
            .attrs(code_common(Some("yes")))
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        MarkedSpan,
        core("mrk")
            .attrs([required_id()])
            .attrs(annotation())
            .attrs(format_style())
            .children(INLINE)
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        MarkedSpanStart,
        core("sm")
            .attrs([required_id()])
            .attrs(annotation())
            .attrs(format_style())
            .selectable("", true)
            .extensible(),
    );
    m.insert(
        MarkedSpanEnd,
        core("em").attrs([AttributeDecl::new("startRef").required()]),
    );
    m.insert(Text, core("#text").unqualified());

    // Translation candidates
    m.insert(Matches, module("mtc", "matches").children(&[Match]));
    m.insert(
        Match,
        module("mtc", "match")
            .attrs([
                id(),
                AttributeDecl::new("matchQuality").with_converter(ValueConverter::Decimal),
                AttributeDecl::new("matchSuitability").with_converter(ValueConverter::Decimal),
                AttributeDecl::new("origin"),
                AttributeDecl::new("ref").required(),
                AttributeDecl::new("reference")
                    .with_default("no")
                    .with_converter(YES_NO),
                AttributeDecl::new("similarity").with_converter(ValueConverter::Decimal),
                AttributeDecl::new("type")
                    .with_default("tm")
                    .with_converter(ValueConverter::Enumerated(MATCH_TYPES)),
                AttributeDecl::new("subType"),
            ])
            .children(&[Metadata, OriginalData, Source, Target, Extension])
            .singletons(&[Metadata, OriginalData, Source, Target])
            .selectable("mtc", false)
            .extensible(),
    );

    // Glossary
    m.insert(Glossary, module("gls", "glossary").children(&[GlossaryEntry]));
    m.insert(
        GlossaryEntry,
        module("gls", "glossEntry")
            .attrs([id(), AttributeDecl::new("ref")])
            .children(&[Term, Translation, Definition, Extension])
            .singletons(&[Term, Definition])
            .selectable("gls", true)
            .extensible(),
    );
    m.insert(
        Term,
        module("gls", "term")
            .attrs([AttributeDecl::new("source")])
            .children(&[Text])
            .extensible(),
    );
    m.insert(
        Translation,
        module("gls", "translation")
            .attrs([id(), AttributeDecl::new("ref"), AttributeDecl::new("source")])
            .children(&[Text])
            .selectable("gls", true)
            .extensible(),
    );
    m.insert(
        Definition,
        module("gls", "definition")
            .attrs([AttributeDecl::new("source")])
            .children(&[Text])
            .extensible(),
    );

    // Metadata
    m.insert(
        Metadata,
        module("mda", "metadata")
            .attrs([id()])
            .children(&[MetaGroup])
            .selectable("mda", true),
    );
    m.insert(
        MetaGroup,
        module("mda", "metaGroup")
            .attrs([
                id(),
                AttributeDecl::new("category"),
                AttributeDecl::new("appliesTo")
                    .with_converter(ValueConverter::Enumerated(&["source", "target", "ignorable"])),
            ])
            .children(&[MetaGroup, Meta])
            .selectable("mda", true),
    );
    m.insert(
        Meta,
        module("mda", "meta")
            .attrs([AttributeDecl::new("type").required()])
            .children(&[Text]),
    );

    // Resource data
    m.insert(
        ResourceData,
        module("res", "resourceData")
            .attrs([id()])
            .children(&[ResourceItemRef, ResourceItem])
            .selectable("res", true),
    );
    m.insert(
        ResourceItem,
        module("res", "resourceItem")
            .attrs([
                id(),
                AttributeDecl::new("context")
                    .with_default("yes")
                    .with_converter(YES_NO),
                AttributeDecl::new("mimeType"),
            ])
            .children(&[ResourceSource, ResourceTarget, ResourceReference])
            .singletons(&[ResourceSource, ResourceTarget, ResourceReference])
            .selectable("res", true)
            .extensible(),
    );
    m.insert(
        ResourceItemRef,
        module("res", "resourceItemRef")
            .attrs([id(), AttributeDecl::new("ref").required()])
            .selectable("res", true)
            .extensible(),
    );
    m.insert(
        ResourceSource,
        module("res", "source")
            .attrs(language_ref())
            .children(&[Text, Extension])
            .extensible(),
    );
    m.insert(
        ResourceTarget,
        module("res", "target")
            .attrs(language_ref())
            .children(&[Text, Extension])
            .extensible(),
    );
    m.insert(
        ResourceReference,
        module("res", "reference")
            .attrs(language_ref())
            .extensible(),
    );

    // Change tracking
    m.insert(ChangeTrack, module("ctr", "changeTrack").children(&[Revisions]));
    m.insert(
        Revisions,
        module("ctr", "revisions")
            .attrs([
                AttributeDecl::new("appliesTo").required(),
                AttributeDecl::new("ref"),
                AttributeDecl::new("currentVersion"),
            ])
            .children(&[Revision])
            .extensible(),
    );
    m.insert(
        Revision,
        module("ctr", "revision")
            .attrs([
                AttributeDecl::new("author"),
                AttributeDecl::new("datetime"),
                AttributeDecl::new("version"),
            ])
            .children(&[RevisionItem])
            .extensible(),
    );
    m.insert(
        RevisionItem,
        module("ctr", "item")
            .attrs([AttributeDecl::new("property").required()])
            .children(&[Text])
            .extensible(),
    );

    // Validation
    m.insert(Validation, module("val", "validation").children(&[Rule]));
    m.insert(
        Rule,
        module("val", "rule")
            .attrs([
                AttributeDecl::new("isPresent"),
                AttributeDecl::new("occurs").with_converter(ValueConverter::Unsigned),
                AttributeDecl::new("isNotPresent"),
                AttributeDecl::new("startsWith"),
                AttributeDecl::new("endsWith"),
                AttributeDecl::new("existsInSource")
                    .with_default("no")
                    .with_converter(YES_NO),
                AttributeDecl::new("caseSensitive")
                    .with_default("yes")
                    .with_converter(YES_NO),
                AttributeDecl::new("normalization")
                    .with_default("nfc")
                    .with_converter(ValueConverter::Enumerated(NORMALIZATION)),
                AttributeDecl::new("disabled")
                    .with_default("no")
                    .with_converter(YES_NO),
            ])
            .extensible(),
    );

    m.insert(
        Extension,
        ElementDeclaration::new(None, "extension")
            .unqualified()
            .children(&[Text, Extension])
            .extensible(),
    );

    m
}

/// `source/@xml:lang` comes from the document's `srcLang`
fn resolve_source_language(doc: &Document, _node: NodeId, _property: &str) -> Option<String> {
    doc.own_value(doc.root(), "srcLang").map(str::to_string)
}

/// `target/@xml:lang` comes from the document's `trgLang`
fn resolve_target_language(doc: &Document, _node: NodeId, _property: &str) -> Option<String> {
    doc.own_value(doc.root(), "trgLang").map(str::to_string)
}

/// Inline `dir`: the enclosing `pc`, else the unit direction of the enclosing content
fn resolve_inline_directionality(doc: &Document, node: NodeId, _property: &str) -> Option<String> {
    for ancestor in doc.ancestors(node) {
        let property = match doc.kind(ancestor) {
            SpanningCode => return doc.effective_value(ancestor, "dir").ok().flatten(),
            Source => "srcDir",
            Target => "trgDir",
            _ => continue,
        };
        let unit = doc.ancestors(ancestor).find(|a| doc.kind(*a) == Unit)?;
        return doc.effective_value(unit, property).ok().flatten();
    }
    None
}

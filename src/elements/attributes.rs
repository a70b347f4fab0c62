//! Attribute declarations and per-node attribute records
//!
//! Every element variant declares its attributes once in a static table (see
//! [`super::kinds`]). When a node is created each declaration becomes an
//! [`AttributeRecord`] holding the node's own value, its default, the inheritance
//! descriptor used to resolve a missing value, and the converter guarding writes.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::documents::{Document, NodeId};
use crate::error::{Error, Result};
use crate::names::{is_prefixed_value, XmlName};
use crate::namespaces;

use super::kinds::ElementKind;

/// Custom inheritance resolver: `(document, node, property) -> value`
///
/// Used when a property inherits from somewhere other than an ancestor of a given
/// type, e.g. `source/@xml:lang` which comes from the document's `srcLang`.
pub type InheritanceResolver = fn(&Document, NodeId, &str) -> Option<String>;

/// How a missing attribute value is looked up
#[derive(Clone, Copy)]
pub enum Inheritance {
    /// No inheritance: fall back to the default
    None,
    /// Walk upward to the nearest ancestor of one of `kinds` and read `property` on it
    Ancestor {
        /// Ancestor kinds that can supply the value
        kinds: &'static [ElementKind],
        /// Property name on the ancestor (may differ from the inheriting attribute)
        property: &'static str,
    },
    /// Delegate to a resolver function
    Custom(InheritanceResolver),
}

impl Inheritance {
    /// Whether the descriptor performs any lookup
    pub fn is_inherited(&self) -> bool {
        !matches!(self, Inheritance::None)
    }
}

impl fmt::Debug for Inheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inheritance::None => write!(f, "None"),
            Inheritance::Ancestor { kinds, property } => f
                .debug_struct("Ancestor")
                .field("kinds", kinds)
                .field("property", property)
                .finish(),
            Inheritance::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Lexical converter guarding attribute writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueConverter {
    /// Any string
    Text,
    /// `yes` or `no`
    YesNo,
    /// `yes`, `no` or `firstNo`
    Reorder,
    /// `ltr`, `rtl` or `auto`
    Direction,
    /// `default` or `preserve`
    Space,
    /// Non-negative integer
    Unsigned,
    /// Decimal number
    Decimal,
    /// One of a fixed set of values
    Enumerated(&'static [&'static str]),
    /// One of a fixed set of values, or a custom `prefix:value`
    EnumeratedOrPrefixed(&'static [&'static str]),
}

impl ValueConverter {
    /// Check a value, returning the reason it is rejected
    pub fn check(&self, value: &str) -> std::result::Result<(), String> {
        let allowed = |choices: &[&str]| {
            if choices.contains(&value) {
                Ok(())
            } else {
                Err(format!("expected one of {}", choices.join(", ")))
            }
        };
        match self {
            ValueConverter::Text => Ok(()),
            ValueConverter::YesNo => allowed(&["yes", "no"]),
            ValueConverter::Reorder => allowed(&["yes", "no", "firstNo"]),
            ValueConverter::Direction => allowed(&["ltr", "rtl", "auto"]),
            ValueConverter::Space => allowed(&["default", "preserve"]),
            ValueConverter::Unsigned => value
                .parse::<u64>()
                .map(|_| ())
                .map_err(|_| "expected a non-negative integer".to_string()),
            ValueConverter::Decimal => Decimal::from_str(value.trim())
                .map(|_| ())
                .map_err(|_| "expected a decimal number".to_string()),
            ValueConverter::Enumerated(choices) => allowed(choices),
            ValueConverter::EnumeratedOrPrefixed(choices) => {
                if choices.contains(&value) || is_prefixed_value(value) {
                    Ok(())
                } else {
                    Err(format!(
                        "expected one of {} or a prefix:value",
                        choices.join(", ")
                    ))
                }
            }
        }
    }
}

/// Static declaration of one attribute on an element variant
#[derive(Debug, Clone, Copy)]
pub struct AttributeDecl {
    /// Property name (`id`, `canCopy`, `xml:lang`, `fs:fs`, ...)
    pub property: &'static str,
    /// Namespace of the attribute, if any
    pub namespace: Option<&'static str>,
    /// Registered default value
    pub default: Option<&'static str>,
    /// Whether the attribute may be omitted
    pub optional: bool,
    /// Inheritance descriptor
    pub inheritance: Inheritance,
    /// Converter applied on writes
    pub converter: ValueConverter,
}

impl AttributeDecl {
    /// Declare an optional, non-inherited text attribute
    pub fn new(property: &'static str) -> Self {
        let namespace = property
            .split_once(':')
            .and_then(|(prefix, _)| namespaces::namespace_for(prefix));
        Self {
            property,
            namespace,
            default: None,
            optional: true,
            inheritance: Inheritance::None,
            converter: ValueConverter::Text,
        }
    }

    /// Mark the attribute as required
    pub fn required(mut self) -> Self {
        self.optional = false;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the converter
    pub fn with_converter(mut self, converter: ValueConverter) -> Self {
        self.converter = converter;
        self
    }

    /// Inherit from the nearest ancestor of one of `kinds`, reading `property`
    pub fn inherit_from(mut self, kinds: &'static [ElementKind], property: &'static str) -> Self {
        self.inheritance = Inheritance::Ancestor { kinds, property };
        self
    }

    /// Inherit through a custom resolver
    pub fn inherit_with(mut self, resolver: InheritanceResolver) -> Self {
        self.inheritance = Inheritance::Custom(resolver);
        self
    }

    /// Qualified name of the attribute
    pub fn xml_name(&self) -> XmlName {
        match self.property.split_once(':') {
            Some((prefix, local)) => XmlName {
                namespace: self.namespace.map(str::to_string),
                prefix: Some(prefix.to_string()),
                local_name: local.to_string(),
            },
            None => XmlName::local(self.property),
        }
    }
}

/// Attribute state held by a node
#[derive(Debug, Clone)]
pub struct AttributeRecord {
    name: XmlName,
    value: Option<String>,
    default: Option<&'static str>,
    optional: bool,
    supported: bool,
    inheritance: Inheritance,
    converter: ValueConverter,
}

impl AttributeRecord {
    /// Create a record from its declaration
    pub fn from_decl(decl: &AttributeDecl) -> Self {
        Self {
            name: decl.xml_name(),
            value: None,
            default: decl.default,
            optional: decl.optional,
            supported: true,
            inheritance: decl.inheritance,
            converter: decl.converter,
        }
    }

    /// Qualified name
    pub fn name(&self) -> &XmlName {
        &self.name
    }

    /// Own value, if set
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the node carries its own value
    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Registered default
    pub fn default(&self) -> Option<&'static str> {
        self.default
    }

    /// Own value, else the registered default (no ancestor lookup)
    pub fn value_or_default(&self) -> Option<&str> {
        self.value.as_deref().or(self.default)
    }

    /// Whether the attribute may be omitted
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the attribute is enabled on this node
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Inheritance descriptor
    pub fn inheritance(&self) -> Inheritance {
        self.inheritance
    }

    /// Converter
    pub fn converter(&self) -> ValueConverter {
        self.converter
    }

    pub(crate) fn set_supported(&mut self, supported: bool) {
        self.supported = supported;
        if !supported {
            self.value = None;
        }
    }

    /// Store a value after running it through the converter
    pub(crate) fn set(&mut self, value: String) -> Result<()> {
        if let Err(reason) = self.converter.check(&value) {
            return Err(Error::InvalidAttributeValue {
                attribute: self.name.qualified(),
                value,
                reason,
            });
        }
        self.value = Some(value);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.value = None;
    }
}

/// Read-only view of one attribute, as enumerated by [`Document::attributes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeView<'a> {
    /// Qualified name
    pub name: &'a XmlName,
    /// Own value
    pub value: Option<&'a str>,
    /// Whether the attribute is enabled on the node (extension attributes always are)
    pub supported: bool,
    /// Whether this is an extension attribute rather than a declared one
    pub extension: bool,
}

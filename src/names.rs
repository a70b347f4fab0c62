//! XML names and lexical name checks
//!
//! This module provides the immutable `(namespace, prefix, local-name)` triple used
//! for every element and attribute of the object model, plus the NMTOKEN, NCName and
//! `prefix:value` syntax checks that XLIFF identifiers rely on.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// `prefix:value` where the prefix holds no colon and neither part holds whitespace
static PREFIXED_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s:]+:[^\s]+$").expect("static regex"));

/// Qualified XML name: namespace URI, preferred prefix and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Prefix used when rendering the name
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
}

impl XmlName {
    /// Create a new name
    pub fn new(
        namespace: Option<impl Into<String>>,
        prefix: Option<impl Into<String>>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.map(Into::into),
            prefix: prefix.map(Into::into),
            local_name: local_name.into(),
        }
    }

    /// Create a name without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            prefix: None,
            local_name: local_name.into(),
        }
    }

    /// Create a namespaced name with its prefix
    pub fn namespaced(
        namespace: impl Into<String>,
        prefix: impl Into<String>,
        local_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: Some(namespace.into()),
            prefix: Some(prefix.into()),
            local_name: local_name.into(),
        }
    }

    /// The `prefix:local` rendering, or just the local name when unprefixed
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(p) if !p.is_empty() => format!("{}:{}", p, self.local_name),
            _ => self.local_name.clone(),
        }
    }

    /// Clark notation `{namespace}local`
    pub fn expanded(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{}}}{}", ns, self.local_name),
            None => self.local_name.clone(),
        }
    }

    /// Whether both names denote the same namespace and local name, ignoring prefixes
    pub fn matches(&self, other: &XmlName) -> bool {
        self.namespace == other.namespace && self.local_name == other.local_name
    }
}

impl fmt::Display for XmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

/// Check if a character may start an XML Name (XML 1.0 fifth edition)
pub fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

/// Check if a character may appear inside an XML Name
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// Check if a string is a valid NMTOKEN
pub fn is_nmtoken(value: &str) -> bool {
    !value.is_empty() && value.chars().all(is_name_char)
}

/// Check if a string is a valid NCName (a Name without colons)
pub fn is_ncname(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c != ':' && is_name_start_char(c) => chars.all(|c| c != ':' && is_name_char(c)),
        _ => false,
    }
}

/// Check if a string has the `prefix:value` form used by XLIFF sub-types and custom values
pub fn is_prefixed_value(value: &str) -> bool {
    PREFIXED_VALUE.is_match(value)
}

/// Split a `prefix:value` string
pub fn split_prefixed(value: &str) -> Option<(&str, &str)> {
    if is_prefixed_value(value) {
        value.split_once(':')
    } else {
        None
    }
}

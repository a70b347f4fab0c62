//! XLIFF namespaces
//!
//! Namespace URIs of the XLIFF 2.0 core and its modules, and the canonical
//! prefixes the object model uses when naming module elements and attributes.

/// XLIFF 2.0 core namespace
pub const XLIFF_CORE: &str = "urn:oasis:names:tc:xliff:document:2.0";

/// XML namespace (`xml:lang`, `xml:space`, `xml:id`)
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

/// Translation candidates module
pub const MATCHES: &str = "urn:oasis:names:tc:xliff:matches:2.0";

/// Glossary module
pub const GLOSSARY: &str = "urn:oasis:names:tc:xliff:glossary:2.0";

/// Format style module
pub const FORMAT_STYLE: &str = "urn:oasis:names:tc:xliff:fs:2.0";

/// Metadata module
pub const METADATA: &str = "urn:oasis:names:tc:xliff:metadata:2.0";

/// Resource data module
pub const RESOURCE_DATA: &str = "urn:oasis:names:tc:xliff:resourcedata:2.0";

/// Change tracking module
pub const CHANGE_TRACKING: &str = "urn:oasis:names:tc:xliff:changetracking:2.0";

/// Size and length restriction module
pub const SIZE_RESTRICTION: &str = "urn:oasis:names:tc:xliff:sizerestriction:2.0";

/// Validation module
pub const VALIDATION: &str = "urn:oasis:names:tc:xliff:validation:2.0";

/// Known namespaces and their canonical prefixes
const PREFIXES: &[(&str, &str)] = &[
    (XML, "xml"),
    (MATCHES, "mtc"),
    (GLOSSARY, "gls"),
    (FORMAT_STYLE, "fs"),
    (METADATA, "mda"),
    (RESOURCE_DATA, "res"),
    (CHANGE_TRACKING, "ctr"),
    (SIZE_RESTRICTION, "slr"),
    (VALIDATION, "val"),
];

/// Get the canonical prefix of a known namespace
pub fn prefix_for(namespace: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(ns, _)| *ns == namespace)
        .map(|(_, prefix)| *prefix)
}

/// Get the namespace bound to a canonical prefix
pub fn namespace_for(prefix: &str) -> Option<&'static str> {
    PREFIXES
        .iter()
        .find(|(_, p)| *p == prefix)
        .map(|(ns, _)| *ns)
}

/// Whether a namespace belongs to XLIFF (core or a module) or XML itself
///
/// Anything else is an extension namespace.
pub fn is_known(namespace: &str) -> bool {
    namespace == XLIFF_CORE || prefix_for(namespace).is_some()
}

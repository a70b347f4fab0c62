//! Error types for xliff
//!
//! This module defines the errors raised while building, navigating and loading
//! an XLIFF object model. Conformance failures found by the validator are reported
//! separately through [`crate::validators::ValidationError`].

use thiserror::Error;

/// Result type alias using xliff Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for object model operations
#[derive(Error, Debug)]
pub enum Error {
    /// Attribute is not registered for the element, or disabled on it
    #[error("attribute '{attribute}' is not supported on <{element}>")]
    UnsupportedAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: String,
    },

    /// Attribute value rejected by the attribute's converter
    #[error("invalid value '{value}' for attribute '{attribute}': {reason}")]
    InvalidAttributeValue {
        /// Attribute name
        attribute: String,
        /// Offending value
        value: String,
        /// Why the converter rejected it
        reason: String,
    },

    /// The parent element does not accept this kind of child
    #[error("<{parent}> cannot contain <{child}>{}", reason.as_deref().map(|r| format!(": {}", r)).unwrap_or_default())]
    InvalidChild {
        /// Parent element name
        parent: String,
        /// Child element name
        child: String,
        /// Additional reason from the variant's store step
        reason: Option<String>,
    },

    /// The node already belongs to a parent
    #[error("<{0}> is already attached to a parent")]
    AlreadyParented(String),

    /// Attaching the node would create a cycle
    #[error("attaching <{0}> would create a cycle")]
    Cycle(String),

    /// The node index does not belong to this document
    #[error("node {0} does not exist in this document")]
    NodeNotFound(usize),

    /// Text content set on a node that cannot carry text
    #[error("<{0}> cannot hold text content")]
    TextNotAllowed(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// XML reading error
    #[error("XML error: {0}")]
    Xml(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

//! # xliff
//!
//! An object model and conformance validator for XLIFF 2.0 localization documents.
//!
//! ## Features
//!
//! - Arena-backed element tree with typed attribute records and inherited values
//! - Core XLIFF 2.0 vocabulary plus the matches, glossary, metadata, resource data,
//!   change tracking, validation and format style modules
//! - Extension elements and attributes from foreign namespaces
//! - Fragment selectors (`#/f=f1/u=u1/s1`) for addressing and resolving nodes
//! - A first-failure validator reporting a stable error code and the selector path
//!   of the offending node
//! - Resource limits on depth, node count and input size
//!
//! ## Example
//!
//! ```rust
//! use xliff::{Document, ElementKind};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! doc.set_attribute(root, "version", "2.0")?;
//! doc.set_attribute(root, "srcLang", "en")?;
//! let file = doc.append_with(root, ElementKind::File, &[("id", "f1")])?;
//! let unit = doc.append_with(file, ElementKind::Unit, &[("id", "u1")])?;
//! let segment = doc.append(unit, ElementKind::Segment)?;
//! let source = doc.append(segment, ElementKind::Source)?;
//! doc.append_text(source, "Hello")?;
//!
//! assert!(xliff::validate(&doc).is_ok());
//! # Ok::<(), xliff::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod names;
pub mod namespaces;

// Object model
pub mod documents;
pub mod elements;
pub mod selectors;

// Loading
pub mod loaders;

// Validation
pub mod validators;

pub use documents::{Document, NodeId, NodeRef};
pub use elements::ElementKind;
pub use error::{Error, Result};
pub use limits::Limits;
pub use loaders::Loader;
pub use validators::{validate, ErrorCode, StandardValidator, ValidationError, ValidationResult};

/// Version of the xliff library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

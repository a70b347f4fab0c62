//! XLIFF 2.0 validators
//!
//! The standard validator walks a [`Document`] top-down and enforces the core
//! constraints plus those of the supported modules, stopping at the first
//! violation. Every violation carries an [`ErrorCode`] and, where one exists, the
//! selector path of the offending node.

pub mod exceptions;
pub mod helpers;

mod extensions;
mod modules;
mod references;
mod sequences;
mod standard;
mod tags;

pub use exceptions::{ErrorCode, ValidationError};
pub use standard::{StandardValidator, ValidationResult};

use crate::documents::Document;

/// Validate `doc` with a fresh [`StandardValidator`] and default limits
pub fn validate(doc: &Document) -> ValidationResult {
    StandardValidator::new().validate(doc)
}

//! Element variants, attribute declarations and attribute records
//!
//! This module holds the static side of the object model: what each element
//! variant is called, which attributes it registers and how their missing values
//! are resolved, and which children it accepts.

use std::str::FromStr;

use crate::error::Error;

pub mod attributes;
pub mod kinds;

pub use attributes::{
    AttributeDecl, AttributeRecord, AttributeView, Inheritance, InheritanceResolver,
    ValueConverter,
};
pub use kinds::{ElementDeclaration, ElementKind, INLINE, INLINE_CODES};

/// Reorder state of an inline code (`canReorder`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderState {
    /// Freely reorderable
    Yes,
    /// First member of a non-reorderable sequence
    FirstNo,
    /// Continuation member of a non-reorderable sequence
    No,
}

impl FromStr for ReorderState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "firstNo" => Ok(Self::FirstNo),
            "no" => Ok(Self::No),
            _ => Err(invalid("canReorder", s, "expected yes, firstNo or no")),
        }
    }
}

/// Text directionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directionality {
    /// Left to right
    Ltr,
    /// Right to left
    Rtl,
    /// Determined from content
    Auto,
}

impl FromStr for Directionality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            "auto" => Ok(Self::Auto),
            _ => Err(invalid("dir", s, "expected ltr, rtl or auto")),
        }
    }
}

fn invalid(attribute: &str, value: &str, reason: &str) -> Error {
    Error::InvalidAttributeValue {
        attribute: attribute.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

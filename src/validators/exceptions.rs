//! Validation errors
//!
//! Every rule the standard validator enforces has a stable numeric [`ErrorCode`].
//! The first violation found is reported as a [`ValidationError`] carrying the
//! code, a message, the selector path of the offending node and, for internal
//! failures, the wrapped cause.

use std::fmt;

use crate::error::Error;

/// Stable numeric code of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ErrorCode {
    // Document and file
    /// `version` missing or not `2.x`
    InvalidVersion = 10,
    /// `srcLang` missing
    MissingSourceLanguage = 11,
    /// `srcLang` is not a BCP-47 tag
    InvalidSourceLanguage = 12,
    /// `trgLang` missing while a target exists
    MissingTargetLanguage = 13,
    /// `trgLang` is not a BCP-47 tag
    InvalidTargetLanguage = 14,
    /// `source/@xml:lang` differs from `srcLang`
    SourceLanguageMismatch = 15,
    /// `target/@xml:lang` differs from `trgLang`
    TargetLanguageMismatch = 16,
    /// Document without any `<file>`
    NoFiles = 17,
    /// File without any group or unit
    EmptyFile = 18,
    /// Unit without any segment or ignorable
    EmptyUnit = 19,

    // Identity
    /// Required `id` missing
    MissingId = 20,
    /// `id` is not an NMTOKEN
    InvalidId = 21,
    /// Two files share an id
    DuplicateFileId = 22,
    /// Two groups of a file share an id
    DuplicateGroupId = 23,
    /// Two units of a file share an id
    DuplicateUnitId = 24,
    /// Two nodes share an id within a uniqueness scope
    DuplicateId = 25,
    /// Two sibling extension elements share an id
    DuplicateExtensionId = 26,

    // Structure
    /// Required attribute missing
    MissingAttribute = 30,
    /// Container that must hold at least one child is empty
    EmptyContainer = 31,
    /// Segment or ignorable without `<source>`
    MissingSource = 32,
    /// Skeleton without exactly one of `href` and content
    InvalidSkeleton = 33,
    /// `order` outside `1..=n`
    InvalidTargetOrder = 34,
    /// Two targets of a unit share an `order`
    DuplicateTargetOrder = 35,
    /// `subState` without `state` or not `prefix:value`
    InvalidSubState = 36,
    /// Note `priority` outside `1..=10`
    InvalidNotePriority = 37,
    /// Value is not a valid IRI
    InvalidIri = 38,

    // Inline content
    /// `cp/@hex` is not a code point that needs escaping
    InvalidCodePoint = 40,
    /// `subType` malformed, without `type`, or reserved value on the wrong `type`
    InvalidSubType = 41,
    /// Comment annotation without exactly one of `value` and `ref`
    InvalidCommentAnnotation = 42,
    /// Isolated end tag with a `startRef`, or without an `id`
    InvalidIsolatedTag = 43,

    // Tag pairs
    /// End tag references no start tag
    StartTagNotFound = 50,
    /// Start tag occurs after its end tag
    StartTagAfterEnd = 51,
    /// Start tag without end tag that is not isolated
    UnmatchedStartTag = 52,
    /// `canCopy` differs between start and end
    CanCopyMismatch = 53,
    /// `canDelete` differs between start and end
    CanDeleteMismatch = 54,
    /// `canReorder` differs between start and end
    CanReorderMismatch = 55,
    /// `canOverlap` differs between start and end
    CanOverlapMismatch = 56,
    /// `dir` differs between start and end
    DirectionalityMismatch = 57,
    /// `type` differs between start and end
    TypeMismatch = 58,
    /// `subType` differs between start and end
    SubTypeMismatch = 59,

    // Editing hints
    /// Non-reorderable tag that can be copied or deleted
    InvalidEditingHints = 60,
    /// Sequence members neither flat nor nested under the first member
    InvalidSequenceHierarchy = 61,
    /// Source sequence has no counterpart in the target
    SequenceNotFound = 62,
    /// Target sequence differs from the source sequence
    SequenceMismatch = 63,
    /// `copyOf` references a missing, different or non-copyable tag
    InvalidCopyOf = 64,
    /// Tag with `canDelete="no"` missing from the target
    MissingUndeletableTag = 65,

    // References
    /// Data reference not found in the unit's original data
    InvalidDataReference = 70,
    /// Sub-flow references a unit not present in the file
    InvalidSubFlows = 71,
    /// Fragment reference cannot be resolved
    InvalidReference = 72,
    /// Comment annotation `ref` does not point at a note
    InvalidCommentReference = 73,

    // Modules
    /// Malformed change tracking revision
    InvalidRevision = 80,
    /// Glossary entry without definition or translation
    InvalidGlossaryEntry = 81,
    /// Resource item without source, target or reference
    InvalidResourceItem = 82,
    /// Resource item reference does not resolve
    InvalidResourceReference = 83,
    /// Resource content language differs from the document language
    InvalidResourceLanguage = 84,
    /// Validation rule without exactly one test
    InvalidRule = 85,
    /// Match without source and target
    InvalidMatch = 86,
    /// Match score outside `0..=100`
    InvalidMatchRange = 87,
    /// Format style attributes malformed
    InvalidFormatStyle = 88,

    /// Unexpected failure while validating
    Internal = 99,
}

impl ErrorCode {
    /// Numeric value
    pub fn value(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.value(), self)
    }
}

/// First rule violation found in a document
#[derive(Debug)]
pub struct ValidationError {
    code: ErrorCode,
    message: String,
    path: Option<String>,
    cause: Option<Box<Error>>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            cause: None,
        }
    }

    /// Wrap an unexpected failure
    pub fn internal(cause: Error) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: format!("internal error: {}", cause),
            path: None,
            cause: Some(Box::new(cause)),
        }
    }

    /// Set the selector path of the offending node
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the underlying cause
    pub fn with_cause(mut self, cause: Error) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Rule code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Selector path of the offending node
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Underlying cause
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_deref()
    }
}

impl From<Error> for ValidationError {
    fn from(err: Error) -> Self {
        ValidationError::internal(err)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        write!(f, "\nCode: {}", self.code)?;
        if let Some(ref path) = self.path {
            write!(f, "\nPath: {}", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

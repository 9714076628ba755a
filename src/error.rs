//! Error types for loresync.
//!
//! All errors are strongly typed using thiserror, one enum per failure
//! domain, with a top-level [`SyncError`] for callers that handle both
//! serialization paths uniformly.
//!
//! Decoding is all-or-nothing: a failed decode surfaces an error to the
//! immediate caller and leaves no partially populated record behind.
//! Reconciliation and merging never fail; an owner or entry that cannot
//! be resolved is a classification, not an error.

use std::io;

use thiserror::Error;

/// Errors raised while reading a tagged research document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A required field is absent.
    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    /// A field is present but holds the wrong kind of value.
    #[error("Field '{field}' has the wrong type (expected {expected})")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// An integer field does not fit the identifier/count range.
    #[error("Field '{field}' value {value} is out of range")]
    OutOfRange {
        field: String,
        value: i64,
    },
}

/// Errors raised while reading the binary wire format.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended before the record was complete.
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    /// A variable-length integer ran past its maximum width.
    #[error("Variable-length integer exceeds 32 bits")]
    VarIntTooLong,

    /// A length-prefixed string is not valid UTF-8.
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// The underlying reader failed.
    #[error("Read failed: {0}")]
    Io(io::Error),
}

impl From<io::Error> for DecodeError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::Io(err)
        }
    }
}

/// Top-level error type for loresync.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Tagged-document read failed.
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Wire decode failed.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// JSON text could not be parsed into a document.
    #[error("Malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

impl SyncError {
    /// Returns true if this is a tagged-document error.
    #[must_use]
    pub const fn is_document(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// Returns true if this is a wire decode error.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Result type alias for loresync operations.
pub type SyncResult<T> = Result<T, SyncError>;

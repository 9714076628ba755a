//! Entry identifiers and their range partition.
//!
//! Every trackable entry is referenced by an [`EntryId`], an opaque
//! non-negative integer assigned by the host catalog. The identifier
//! space is split at the catalog's built-in limit: ids below it are
//! stable across sessions and processes, ids at or above it belong to
//! externally provided owners and are only meaningful while that owner
//! is loaded in the current session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a trackable entry within one session.
///
/// # Examples
///
/// ```
/// use loresync::EntryId;
///
/// let id = EntryId::new(42);
/// assert_eq!(id.raw(), 42);
/// assert!(id.is_builtin(5042));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u32);

impl EntryId {
    /// Creates an entry ID from its raw catalog value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns true if this id falls in the stable built-in range.
    ///
    /// `builtin_limit` is the catalog's partition point; ids below it
    /// are identical across sessions, ids at or above it are valid only
    /// while their owner is loaded.
    #[must_use]
    pub const fn is_builtin(self, builtin_limit: u32) -> bool {
        self.0 < builtin_limit
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntryId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<EntryId> for u32 {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

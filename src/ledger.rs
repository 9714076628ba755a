//! The host's unresolved-research ledger.
//!
//! The ledger is an ordered list of `(owner, name, count)` records owned
//! by a different subsystem of the host; this crate reads it at capture
//! time and writes into it at apply time, but never manages its
//! lifecycle. The host grants access by handing over a `&mut Vec` of
//! entries, not through runtime introspection.
//!
//! Lookups are linear scans: ledgers hold tens of entries, low hundreds
//! at the outside.

use serde::{Deserialize, Serialize};

/// The ledger's own cap for a fully satisfied count.
///
/// The fully-researched marker is internal to the reconciliation record;
/// at the ledger boundary it is normalized to this cap so downstream
/// consumers see an ordinary count.
pub const SATISFIED_COUNT_CAP: u32 = 9999;

/// One unresolved-research record in the host ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedEntry {
    /// Name of the owning module.
    pub owner: String,
    /// Stable entry name within the owner.
    pub name: String,
    /// Progress count carried for the entry.
    pub count: u32,
}

impl UnresolvedEntry {
    /// Creates a ledger record.
    #[must_use]
    pub fn new(owner: impl Into<String>, name: impl Into<String>, count: u32) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            count,
        }
    }
}

/// Merges a count into the ledger, monotonically.
///
/// Absent `(owner, name)` records are appended; present records are
/// overwritten only when `count` is strictly greater, so a stored count
/// never decreases and re-merging equal data is a no-op.
pub fn merge_progress(ledger: &mut Vec<UnresolvedEntry>, owner: &str, name: &str, count: u32) {
    match ledger
        .iter_mut()
        .find(|entry| entry.owner == owner && entry.name == name)
    {
        Some(entry) => {
            if entry.count < count {
                entry.count = count;
            }
        }
        None => ledger.push(UnresolvedEntry::new(owner, name, count)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_when_absent() {
        let mut ledger = Vec::new();
        merge_progress(&mut ledger, "gadgets", "Widget", 30);
        assert_eq!(ledger, vec![UnresolvedEntry::new("gadgets", "Widget", 30)]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut ledger = vec![UnresolvedEntry::new("gadgets", "Widget", 30)];
        merge_progress(&mut ledger, "gadgets", "Widget", 30);
        assert_eq!(ledger, vec![UnresolvedEntry::new("gadgets", "Widget", 30)]);
    }

    #[test]
    fn test_merge_is_monotonic() {
        let mut ledger = vec![UnresolvedEntry::new("gadgets", "Widget", 30)];
        merge_progress(&mut ledger, "gadgets", "Widget", 10);
        assert_eq!(ledger[0].count, 30);

        merge_progress(&mut ledger, "gadgets", "Widget", 45);
        assert_eq!(ledger[0].count, 45);
    }

    #[test]
    fn test_merge_distinguishes_owners() {
        let mut ledger = vec![UnresolvedEntry::new("gadgets", "Widget", 30)];
        merge_progress(&mut ledger, "trinkets", "Widget", 5);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger[1], UnresolvedEntry::new("trinkets", "Widget", 5));
    }
}

//! The research-progress reconciliation record.
//!
//! [`ResearchData`] tracks one snapshot of research progress across
//! three disjoint classifications:
//!
//! - **resolved**: entries the current session can reference directly
//!   by id, fully researched;
//! - **unresolved**: entries known only by `(owner, name)` because
//!   their owner is not loaded (or the name no longer resolves), each
//!   carrying a progress count;
//! - **pending**: previously unresolved entries whose owner came back
//!   this session, re-keyed by their current id and awaiting a
//!   sufficiency check against live tracker state.
//!
//! A record is populated once at store time, read any number of times
//! at apply time, and rebuilt fresh by each deserialization. It is not
//! safe for concurrent mutation; the host serializes access by owning
//! each instance from a single update loop.

use std::collections::{HashMap, HashSet};

use crate::catalog::ResearchTracker;
use crate::id::EntryId;
use crate::ledger::{merge_progress, UnresolvedEntry, SATISFIED_COUNT_CAP};
use crate::pair::NameCount;

/// Reserved count marker: the entry is fully researched.
///
/// Written where a count would be, never a literal remaining count of
/// zero. At the ledger boundary it is normalized to
/// [`SATISFIED_COUNT_CAP`].
pub const FULLY_RESEARCHED: u32 = 0;

/// A snapshot of research progress, ready to persist, transmit, or
/// merge forward.
///
/// Cloning produces a fully independent copy; all collections are owned,
/// so the host can duplicate its containing instance freely without the
/// two copies sharing state.
#[derive(Debug, Clone, Default)]
pub struct ResearchData {
    resolved: HashSet<EntryId>,
    unresolved: HashMap<String, Vec<NameCount>>,
    pending: HashMap<EntryId, u32>,
}

impl ResearchData {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from explicit collections.
    ///
    /// Overlap between the three collections is tolerated here; the
    /// classifications are made disjoint by the load and store paths,
    /// not by construction.
    #[must_use]
    pub fn from_parts(
        resolved: HashSet<EntryId>,
        unresolved: HashMap<String, Vec<NameCount>>,
        pending: HashMap<EntryId, u32>,
    ) -> Self {
        Self {
            resolved,
            unresolved,
            pending,
        }
    }

    /// Builds a fully populated record at store time.
    ///
    /// `researched` is the tracker's list of fully researched ids;
    /// `ledger`, when granted, contributes the host's unresolved
    /// records, grouped by owner with first-write-wins de-duplication
    /// by name. Pending starts empty: it only ever gains members during
    /// load-time reconciliation.
    #[must_use]
    pub fn capture(
        researched: impl IntoIterator<Item = EntryId>,
        ledger: Option<&[UnresolvedEntry]>,
    ) -> Self {
        let resolved: HashSet<EntryId> = researched.into_iter().collect();

        let mut unresolved: HashMap<String, Vec<NameCount>> = HashMap::new();
        if let Some(entries) = ledger {
            for entry in entries {
                let list = unresolved.entry(entry.owner.clone()).or_default();
                push_unique(list, NameCount::new(entry.name.clone(), entry.count));
            }
        }

        Self {
            resolved,
            unresolved,
            pending: HashMap::new(),
        }
    }

    /// The externally displayed progress counter: resolved plus pending.
    ///
    /// Unresolved entries are counted separately and never included.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.resolved.len() + self.pending.len()
    }

    /// Total unresolved entries across all owners.
    #[must_use]
    pub fn unresolved_entry_count(&self) -> usize {
        self.unresolved.values().map(Vec::len).sum()
    }

    /// Number of fully resolved ids.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Number of owners holding unresolved entries.
    #[must_use]
    pub fn unresolved_owner_count(&self) -> usize {
        self.unresolved.len()
    }

    /// Number of pending entries.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// True when all three collections are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.unresolved.is_empty() && self.pending.is_empty()
    }

    /// Membership test against the resolved set.
    #[must_use]
    pub fn contains_resolved(&self, id: EntryId) -> bool {
        self.resolved.contains(&id)
    }

    /// Iterates the resolved ids (unordered).
    pub fn resolved_ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.resolved.iter().copied()
    }

    /// Iterates pending `(id, carried count)` entries (unordered).
    pub fn pending(&self) -> impl Iterator<Item = (EntryId, u32)> + '_ {
        self.pending.iter().map(|(&id, &count)| (id, count))
    }

    /// Iterates unresolved owners with their entry lists.
    ///
    /// Owner order is unspecified; within an owner, list order is
    /// insertion order.
    pub fn unresolved(&self) -> impl Iterator<Item = (&str, &[NameCount])> + '_ {
        self.unresolved
            .iter()
            .map(|(owner, list)| (owner.as_str(), list.as_slice()))
    }

    /// Merges this record into live host state.
    ///
    /// - Every resolved id is marked fully researched, unconditionally.
    /// - Every pending entry is marked researched when the tracker
    ///   reports a finite remaining count and either the carried count
    ///   is [`FULLY_RESEARCHED`] or the remaining count fits within it;
    ///   otherwise it is left untouched.
    /// - Every unresolved entry is merged into `ledger` (when granted)
    ///   with the monotonic, never-decreasing policy of
    ///   [`merge_progress`], the fully-researched marker normalized to
    ///   [`SATISFIED_COUNT_CAP`].
    ///
    /// The record itself is read-only here; apply may run any number of
    /// times.
    pub fn apply(
        &self,
        tracker: &mut dyn ResearchTracker,
        ledger: Option<&mut Vec<UnresolvedEntry>>,
    ) {
        for &id in &self.resolved {
            tracker.mark_researched(id);
        }

        for (&id, &count) in &self.pending {
            if let Some(remaining) = tracker.remaining_for(id) {
                if count == FULLY_RESEARCHED || remaining <= count {
                    tracker.mark_researched(id);
                }
            }
        }

        if let Some(ledger) = ledger {
            for (owner, entries) in &self.unresolved {
                for pair in entries {
                    let count = if pair.is_fully_researched() {
                        SATISFIED_COUNT_CAP
                    } else {
                        pair.count()
                    };
                    merge_progress(ledger, owner, pair.name(), count);
                }
            }
        }
    }
}

/// Appends `pair` unless a same-named entry is already present.
///
/// First write wins: a later pair with the same name is dropped even if
/// its count differs.
pub(crate) fn push_unique(list: &mut Vec<NameCount>, pair: NameCount) {
    if !list.contains(&pair) {
        list.push(pair);
    }
}

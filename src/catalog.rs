//! Capability traits granted by the host.
//!
//! The reconciliation record never introspects the host. Everything it
//! needs to resolve names, enumerate the trackable universe, or query
//! research progress arrives through these traits, implemented by the
//! host session and passed in by reference. [`MemoryCatalog`] provides
//! an in-memory implementation for tests and embedded use.
//!
//! [`MemoryCatalog`]: crate::memory::MemoryCatalog

use std::collections::HashSet;

use crate::id::EntryId;

/// Read-only resolution of owners, names, and the trackable universe.
///
/// # Determinism
/// `universe` must enumerate ids in ascending numeric order, and its
/// membership must be identical on both ends of a wire exchange. The
/// reversed (exclusion) wire encoding reconstructs a set by subtracting
/// from this enumeration, so any divergence between encoder and decoder
/// corrupts the result silently.
pub trait Catalog {
    /// The partition point of the identifier space: ids below this are
    /// built-in and stable across sessions.
    fn builtin_limit(&self) -> u32;

    /// Returns true if the named owner is loaded this session.
    fn owner_loaded(&self, owner: &str) -> bool;

    /// Resolves an entry name within an owner to its current id.
    fn find(&self, owner: &str, name: &str) -> Option<EntryId>;

    /// The owner name of a provided-range id, if the id is known.
    ///
    /// Built-in ids have no owner and yield `None`.
    fn owner_of(&self, id: EntryId) -> Option<String>;

    /// The stable entry name of a provided-range id, if the id is known.
    fn name_of(&self, id: EntryId) -> Option<String>;

    /// All trackable entry ids this session, ascending.
    fn universe(&self) -> Vec<EntryId>;

    /// The number of trackable entries this session.
    fn universe_size(&self) -> usize {
        self.universe().len()
    }
}

/// Mutable research-progress state owned by the host tracker.
pub trait ResearchTracker {
    /// Ids currently researched to completion, ascending.
    fn researched_ids(&self) -> Vec<EntryId>;

    /// Remaining sacrifices needed before `id` is fully researched.
    ///
    /// `None` means the entry needs no research or is unknown to the
    /// tracker; callers must leave such entries untouched.
    fn remaining_for(&self, id: EntryId) -> Option<u32>;

    /// Marks `id` fully researched. Idempotent.
    fn mark_researched(&mut self, id: EntryId);
}

/// Filters candidate built-in ids down to those the catalog actually
/// tracks this session.
///
/// Hosts retire the occasional built-in entry from the trackable set;
/// the survivors of this filter are subtracted from display totals. The
/// result is session-scoped state: build it at session start and drop
/// it with the session, rather than holding it in a global.
#[must_use]
pub fn deprecated_ids(catalog: &dyn Catalog, candidates: &[EntryId]) -> HashSet<EntryId> {
    let universe: HashSet<EntryId> = catalog.universe().into_iter().collect();
    candidates
        .iter()
        .copied()
        .filter(|id| universe.contains(id))
        .collect()
}

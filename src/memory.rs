//! In-memory catalog and tracker backend.
//!
//! [`MemoryCatalog`] implements both host capabilities over plain
//! collections, for tests and embedded use. `BTreeMap` keys give the
//! ascending universe enumeration the wire codec's exclusion encoding
//! depends on.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, ResearchTracker};
use crate::id::EntryId;

#[derive(Debug, Clone)]
struct CatalogEntry {
    owner: Option<String>,
    name: String,
    required: u32,
}

/// An in-memory implementation of [`Catalog`] and [`ResearchTracker`].
///
/// Entries are registered up front for one simulated session; research
/// state mutates freely afterwards. Sessions with different loaded
/// content are modeled as separate catalogs.
///
/// # Examples
///
/// ```
/// use loresync::{EntryId, MemoryCatalog, ResearchTracker};
///
/// let mut catalog = MemoryCatalog::new(100);
/// catalog.register_builtin(1, "IronBar", 25);
/// catalog.register("gadgets", "Widget", 200, 5);
///
/// catalog.mark_researched(EntryId::new(1));
/// assert_eq!(catalog.researched_ids(), vec![EntryId::new(1)]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    builtin_limit: u32,
    entries: BTreeMap<u32, CatalogEntry>,
    loaded: BTreeSet<String>,
    researched: BTreeSet<u32>,
}

impl MemoryCatalog {
    /// Creates an empty catalog with the given built-in partition point.
    #[must_use]
    pub fn new(builtin_limit: u32) -> Self {
        Self {
            builtin_limit,
            ..Self::default()
        }
    }

    /// Registers a built-in entry. `raw` must sit below the built-in
    /// limit.
    pub fn register_builtin(&mut self, raw: u32, name: impl Into<String>, required: u32) {
        debug_assert!(raw < self.builtin_limit);
        self.entries.insert(
            raw,
            CatalogEntry {
                owner: None,
                name: name.into(),
                required,
            },
        );
    }

    /// Registers a provided entry under `owner`, marking the owner
    /// loaded. `raw` must sit at or above the built-in limit.
    pub fn register(
        &mut self,
        owner: impl Into<String>,
        name: impl Into<String>,
        raw: u32,
        required: u32,
    ) {
        debug_assert!(raw >= self.builtin_limit);
        let owner = owner.into();
        self.loaded.insert(owner.clone());
        self.entries.insert(
            raw,
            CatalogEntry {
                owner: Some(owner),
                name: name.into(),
                required,
            },
        );
    }

    /// Marks an owner loaded without registering entries for it.
    pub fn load_owner(&mut self, owner: impl Into<String>) {
        self.loaded.insert(owner.into());
    }

    /// Returns true if the entry is currently researched.
    #[must_use]
    pub fn is_researched(&self, id: EntryId) -> bool {
        self.researched.contains(&id.raw())
    }
}

impl Catalog for MemoryCatalog {
    fn builtin_limit(&self) -> u32 {
        self.builtin_limit
    }

    fn owner_loaded(&self, owner: &str) -> bool {
        self.loaded.contains(owner)
    }

    fn find(&self, owner: &str, name: &str) -> Option<EntryId> {
        self.entries.iter().find_map(|(&raw, entry)| {
            (entry.owner.as_deref() == Some(owner) && entry.name == name)
                .then(|| EntryId::new(raw))
        })
    }

    fn owner_of(&self, id: EntryId) -> Option<String> {
        self.entries.get(&id.raw())?.owner.clone()
    }

    fn name_of(&self, id: EntryId) -> Option<String> {
        Some(self.entries.get(&id.raw())?.name.clone())
    }

    fn universe(&self) -> Vec<EntryId> {
        self.entries.keys().copied().map(EntryId::new).collect()
    }

    fn universe_size(&self) -> usize {
        self.entries.len()
    }
}

impl ResearchTracker for MemoryCatalog {
    fn researched_ids(&self) -> Vec<EntryId> {
        self.researched.iter().copied().map(EntryId::new).collect()
    }

    fn remaining_for(&self, id: EntryId) -> Option<u32> {
        let entry = self.entries.get(&id.raw())?;
        if self.researched.contains(&id.raw()) {
            Some(0)
        } else {
            Some(entry.required)
        }
    }

    fn mark_researched(&mut self, id: EntryId) {
        if self.entries.contains_key(&id.raw()) {
            self.researched.insert(id.raw());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new(100);
        catalog.register("gadgets", "Widget", 210, 5);
        catalog.register_builtin(7, "IronBar", 25);
        catalog.register_builtin(3, "GoldBar", 25);
        catalog
    }

    #[test]
    fn test_universe_is_ascending() {
        let ids: Vec<u32> = catalog().universe().iter().map(|id| id.raw()).collect();
        assert_eq!(ids, vec![3, 7, 210]);
    }

    #[test]
    fn test_name_resolution() {
        let catalog = catalog();
        assert!(catalog.owner_loaded("gadgets"));
        assert!(!catalog.owner_loaded("trinkets"));

        assert_eq!(
            catalog.find("gadgets", "Widget"),
            Some(EntryId::new(210))
        );
        assert_eq!(catalog.find("gadgets", "Gizmo"), None);

        assert_eq!(
            catalog.owner_of(EntryId::new(210)).as_deref(),
            Some("gadgets")
        );
        assert_eq!(catalog.owner_of(EntryId::new(7)), None);
        assert_eq!(catalog.name_of(EntryId::new(7)).as_deref(), Some("IronBar"));
        assert_eq!(catalog.name_of(EntryId::new(999)), None);
    }

    #[test]
    fn test_tracker_state() {
        let mut catalog = catalog();
        assert_eq!(catalog.remaining_for(EntryId::new(210)), Some(5));
        assert_eq!(catalog.remaining_for(EntryId::new(999)), None);

        catalog.mark_researched(EntryId::new(210));
        catalog.mark_researched(EntryId::new(210));
        catalog.mark_researched(EntryId::new(999)); // unknown: ignored

        assert_eq!(catalog.researched_ids(), vec![EntryId::new(210)]);
        assert_eq!(catalog.remaining_for(EntryId::new(210)), Some(0));
        assert!(catalog.is_researched(EntryId::new(210)));
    }
}

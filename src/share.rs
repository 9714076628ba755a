//! The shareable research record a host hands between players.
//!
//! [`ResearchShare`] is the top-level record: one [`ResearchData`]
//! snapshot plus the name of the player it was captured from. A share
//! starts empty; its first `store` populates it in one shot (never
//! incrementally), after which `apply` may read it outward any number
//! of times. Hosts persist and transmit the share through the codecs in
//! [`document`](crate::document) and [`wire`](crate::wire).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ResearchTracker};
use crate::id::EntryId;
use crate::ledger::UnresolvedEntry;
use crate::research::ResearchData;

/// Host-side options for share transfer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOptions {
    /// Carry unresolved research through store and apply.
    ///
    /// Off by default: unresolved records belong to another subsystem
    /// of the host, and touching its ledger is opt-in.
    pub transfer_unresolved: bool,
}

/// Progress numbers the host displays for a populated share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResearchSummary {
    /// Entries counted as researched: resolved plus pending.
    pub researched: usize,
    /// Trackable entries this session, minus deprecated ones.
    pub total: usize,
    /// Unresolved entries carried along, counted separately.
    pub unresolved: usize,
}

/// One player's research progress, packaged for another player.
#[derive(Debug, Clone, Default)]
pub struct ResearchShare {
    data: ResearchData,
    source_player: String,
}

impl ResearchShare {
    /// Creates an empty, unattributed share.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(data: ResearchData, source_player: String) -> Self {
        Self {
            data,
            source_player,
        }
    }

    /// The research snapshot.
    #[must_use]
    pub fn data(&self) -> &ResearchData {
        &self.data
    }

    /// Name of the player the snapshot was captured from.
    #[must_use]
    pub fn source_player(&self) -> &str {
        &self.source_player
    }

    /// True until the share's first store.
    ///
    /// Attribution doubles as the populated flag: a stored share always
    /// names its source player.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_player.is_empty()
    }

    /// Captures the current session's progress into this share.
    ///
    /// Replaces any previous contents wholesale. The ledger is read
    /// only when `options.transfer_unresolved` is set and the host
    /// actually granted one.
    pub fn store(
        &mut self,
        player: &str,
        tracker: &dyn ResearchTracker,
        ledger: Option<&[UnresolvedEntry]>,
        options: &SyncOptions,
    ) {
        let ledger = if options.transfer_unresolved {
            ledger
        } else {
            None
        };
        self.data = ResearchData::capture(tracker.researched_ids(), ledger);
        self.source_player = player.to_string();
    }

    /// Applies this share to the current session.
    ///
    /// See [`ResearchData::apply`] for the merge rules. The ledger is
    /// written only when `options.transfer_unresolved` is set and the
    /// host granted one.
    pub fn apply(
        &self,
        tracker: &mut dyn ResearchTracker,
        ledger: Option<&mut Vec<UnresolvedEntry>>,
        options: &SyncOptions,
    ) {
        let ledger = if options.transfer_unresolved {
            ledger
        } else {
            None
        };
        self.data.apply(tracker, ledger);
    }

    /// Progress numbers for display against the current catalog.
    ///
    /// `deprecated` is the session's set of retired built-in ids (see
    /// [`deprecated_ids`](crate::catalog::deprecated_ids)); they are
    /// subtracted from the displayed total.
    #[must_use]
    pub fn summary(&self, catalog: &dyn Catalog, deprecated: &HashSet<EntryId>) -> ResearchSummary {
        ResearchSummary {
            researched: self.data.active_count(),
            total: catalog.universe_size().saturating_sub(deprecated.len()),
            unresolved: self.data.unresolved_entry_count(),
        }
    }
}

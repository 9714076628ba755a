//! # loresync - research-progress records for game hosts
//!
//! loresync packages one player's research progress as a compact,
//! shareable record and carries it across three boundaries: the host's
//! tagged-document save store, an unreliable-framing network channel,
//! and a later session where some content owners may no longer be
//! loaded.
//!
//! ## Core Concepts
//!
//! - **EntryId**: an opaque identifier, stable in its built-in range,
//!   session-local in its provided range
//! - **ResearchData**: the reconciliation record - resolved ids,
//!   per-owner unresolved name/count pairs, and pending re-resolved
//!   entries
//! - **Catalog / ResearchTracker**: capabilities the host grants for
//!   name resolution and progress state
//! - **ResearchShare**: the attributed outer record hosts persist,
//!   transmit, and apply
//!
//! ## Usage
//!
//! ```rust
//! use loresync::{EntryId, MemoryCatalog, ResearchShare, ResearchTracker, SyncOptions};
//!
//! let mut catalog = MemoryCatalog::new(100);
//! catalog.register_builtin(1, "IronBar", 25);
//! catalog.mark_researched(EntryId::new(1));
//!
//! // Capture progress on one side...
//! let mut share = ResearchShare::new();
//! share.store("Scholar", &catalog, None, &SyncOptions::default());
//!
//! // ...ship it as bytes, and apply it on the other.
//! let mut packet = Vec::new();
//! share.encode(&mut packet, &catalog).unwrap();
//! let received = ResearchShare::decode(&mut packet.as_slice(), &catalog).unwrap();
//! received.apply(&mut catalog, None, &SyncOptions::default());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod document;
pub mod error;
pub mod id;
pub mod ledger;
pub mod memory;
pub mod pair;
pub mod research;
pub mod share;
pub mod wire;

// Re-export primary types at crate root for convenience
pub use catalog::{deprecated_ids, Catalog, ResearchTracker};
pub use error::{DecodeError, DocumentError, SyncError, SyncResult};
pub use id::EntryId;
pub use ledger::{merge_progress, UnresolvedEntry, SATISFIED_COUNT_CAP};
pub use memory::MemoryCatalog;
pub use pair::NameCount;
pub use research::{ResearchData, FULLY_RESEARCHED};
pub use share::{ResearchShare, ResearchSummary, SyncOptions};

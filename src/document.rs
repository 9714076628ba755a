//! Tagged-document persistence (the stored format).
//!
//! A research record persists as a two-field tagged document:
//!
//! ```json
//! {
//!   "vanillaIDs": [25, 117, 902],
//!   "moddedIDs": {
//!     "gadgets": [{ "n": "Widget", "c": 0 }, { "n": "Gizmo", "c": 12 }]
//!   }
//! }
//! ```
//!
//! `vanillaIDs` holds the built-in-range members of the resolved set as
//! a plain integer list. `moddedIDs` folds everything else down to
//! `(owner, name, count)` form, because provided-range ids are not
//! stable across sessions: unresolved entries are stored verbatim,
//! resolved provided-range ids are stored with the fully-researched
//! marker, and pending entries are stored with their carried count.
//! First write per name wins, so a same-named unresolved entry shadows
//! a pending count written after it; that quirk is long-standing stored
//! data behavior and is preserved.
//!
//! Reading the document back runs reconciliation against the current
//! catalog: owners that are not loaded keep their lists verbatim as
//! unresolved, loaded owners have each entry re-resolved to a live id
//! (into pending) or demoted back to unresolved when the name no longer
//! exists.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde_json::{json, Map, Value};

use crate::catalog::Catalog;
use crate::error::{DocumentError, SyncResult};
use crate::id::EntryId;
use crate::pair::NameCount;
use crate::research::{push_unique, ResearchData, FULLY_RESEARCHED};
use crate::share::ResearchShare;

impl ResearchData {
    /// Encodes this record as its persistent tagged document.
    ///
    /// Provided-range ids are resolved to owner and entry names through
    /// `catalog`; ids the catalog cannot describe are skipped (resolved
    /// and pending ids come from the live catalog, so in practice every
    /// id resolves). Output field order is deterministic.
    #[must_use]
    pub fn to_document(&self, catalog: &dyn Catalog) -> Value {
        let builtin_limit = catalog.builtin_limit();

        let mut vanilla: Vec<u32> = self
            .resolved_ids()
            .filter(|id| id.is_builtin(builtin_limit))
            .map(EntryId::raw)
            .collect();
        vanilla.sort_unstable();

        // Unresolved entries go in verbatim, then the session-local ids
        // fold down to (owner, name, count) form on top of them.
        let mut modded: BTreeMap<String, Vec<NameCount>> = BTreeMap::new();
        for (owner, list) in self.unresolved() {
            modded.insert(owner.to_string(), list.to_vec());
        }

        let mut carried: Vec<(EntryId, u32)> = self
            .resolved_ids()
            .filter(|id| !id.is_builtin(builtin_limit))
            .map(|id| (id, FULLY_RESEARCHED))
            .collect();
        carried.sort_unstable_by_key(|&(id, _)| id);

        let mut pending: Vec<(EntryId, u32)> = self.pending().collect();
        pending.sort_unstable_by_key(|&(id, _)| id);
        carried.extend(pending);

        for (id, count) in carried {
            let (Some(owner), Some(name)) = (catalog.owner_of(id), catalog.name_of(id)) else {
                continue;
            };
            push_unique(modded.entry(owner).or_default(), NameCount::new(name, count));
        }

        let mut modded_tag = Map::new();
        for (owner, list) in modded {
            let tags: Vec<Value> = list.iter().map(NameCount::to_tag).collect();
            modded_tag.insert(owner, Value::Array(tags));
        }

        json!({
            "vanillaIDs": vanilla,
            "moddedIDs": Value::Object(modded_tag),
        })
    }

    /// Decodes a persistent document, reconciling stored names against
    /// the current catalog.
    ///
    /// # Errors
    /// Fails if a required field is absent or mistyped. An owner or
    /// entry that no longer resolves is not an error; it lands in the
    /// unresolved collection.
    pub fn from_document(doc: &Value, catalog: &dyn Catalog) -> Result<Self, DocumentError> {
        let obj = doc.as_object().ok_or_else(|| DocumentError::WrongType {
            field: "document".to_string(),
            expected: "map",
        })?;

        let vanilla = get_field(obj, "vanillaIDs")?
            .as_array()
            .ok_or_else(|| DocumentError::WrongType {
                field: "vanillaIDs".to_string(),
                expected: "integer list",
            })?;
        let mut resolved = HashSet::new();
        for value in vanilla {
            resolved.insert(EntryId::new(read_u32(value, "vanillaIDs")?));
        }

        let modded = get_field(obj, "moddedIDs")?
            .as_object()
            .ok_or_else(|| DocumentError::WrongType {
                field: "moddedIDs".to_string(),
                expected: "map",
            })?;

        let mut unresolved: HashMap<String, Vec<NameCount>> = HashMap::new();
        let mut pending: HashMap<EntryId, u32> = HashMap::new();

        for (owner, value) in modded {
            let tags = value.as_array().ok_or_else(|| DocumentError::WrongType {
                field: owner.clone(),
                expected: "pair list",
            })?;
            let list: Vec<NameCount> = tags
                .iter()
                .map(NameCount::from_tag)
                .collect::<Result<_, _>>()?;

            // An owner that cannot be resolved at all: none of its
            // entries can be either, so the entire list stays as-is.
            if !catalog.owner_loaded(owner) {
                unresolved.insert(owner.clone(), list);
                continue;
            }

            for pair in list {
                match catalog.find(owner, pair.name()) {
                    Some(id) => {
                        pending.insert(id, pair.count());
                    }
                    None => {
                        push_unique(unresolved.entry(owner.clone()).or_default(), pair);
                    }
                }
            }
        }

        Ok(Self::from_parts(resolved, unresolved, pending))
    }
}

impl ResearchShare {
    /// Encodes the share as its persistent document: the research data
    /// plus the attribution string.
    #[must_use]
    pub fn to_document(&self, catalog: &dyn Catalog) -> Value {
        json!({
            "data": self.data().to_document(catalog),
            "playerName": self.source_player(),
        })
    }

    /// Decodes a share from its persistent document.
    ///
    /// # Errors
    /// Fails if either field is absent or mistyped, or if the embedded
    /// research document is malformed.
    pub fn from_document(doc: &Value, catalog: &dyn Catalog) -> Result<Self, DocumentError> {
        let obj = doc.as_object().ok_or_else(|| DocumentError::WrongType {
            field: "share".to_string(),
            expected: "map",
        })?;

        let data = ResearchData::from_document(get_field(obj, "data")?, catalog)?;
        let player = get_field(obj, "playerName")?
            .as_str()
            .ok_or_else(|| DocumentError::WrongType {
                field: "playerName".to_string(),
                expected: "string",
            })?;

        Ok(Self::from_parts(data, player.to_string()))
    }

    /// Renders the persistent document as pretty JSON text.
    ///
    /// # Errors
    /// Propagates JSON rendering failures.
    pub fn to_json_pretty(&self, catalog: &dyn Catalog) -> SyncResult<String> {
        Ok(serde_json::to_string_pretty(&self.to_document(catalog))?)
    }

    /// Parses JSON text into a share, reconciling against `catalog`.
    ///
    /// # Errors
    /// Fails on malformed JSON or a malformed document.
    pub fn from_json(text: &str, catalog: &dyn Catalog) -> SyncResult<Self> {
        let doc: Value = serde_json::from_str(text)?;
        Ok(Self::from_document(&doc, catalog)?)
    }
}

fn get_field<'a>(obj: &'a Map<String, Value>, field: &str) -> Result<&'a Value, DocumentError> {
    obj.get(field).ok_or_else(|| DocumentError::MissingField {
        field: field.to_string(),
    })
}

fn read_u32(value: &Value, field: &str) -> Result<u32, DocumentError> {
    let raw = value.as_i64().ok_or_else(|| DocumentError::WrongType {
        field: field.to_string(),
        expected: "integer",
    })?;
    u32::try_from(raw).map_err(|_| DocumentError::OutOfRange {
        field: field.to_string(),
        value: raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalog;

    fn session_catalog() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new(100);
        catalog.register_builtin(1, "IronBar", 25);
        catalog.register_builtin(2, "GoldBar", 25);
        catalog.register("gadgets", "Widget", 200, 5);
        catalog.register("gadgets", "Gizmo", 201, 3);
        catalog
    }

    #[test]
    fn test_document_shape() {
        let catalog = session_catalog();
        let data = ResearchData::capture(
            [EntryId::new(1), EntryId::new(2), EntryId::new(200)],
            None,
        );

        let doc = data.to_document(&catalog);
        assert_eq!(doc["vanillaIDs"], json!([1, 2]));
        assert_eq!(
            doc["moddedIDs"],
            json!({ "gadgets": [{ "n": "Widget", "c": 0 }] })
        );
    }

    #[test]
    fn test_unresolved_shadows_pending_on_encode() {
        let catalog = session_catalog();
        let mut unresolved = HashMap::new();
        unresolved.insert("gadgets".to_string(), vec![NameCount::new("Widget", 2)]);
        let data = ResearchData::from_parts(
            HashSet::new(),
            unresolved,
            [(EntryId::new(200), 4)].into_iter().collect(),
        );

        // First write wins: the verbatim unresolved entry keeps count 2.
        let doc = data.to_document(&catalog);
        assert_eq!(
            doc["moddedIDs"],
            json!({ "gadgets": [{ "n": "Widget", "c": 2 }] })
        );
    }

    #[test]
    fn test_missing_fields_fail() {
        let catalog = session_catalog();
        let err = ResearchData::from_document(&json!({ "vanillaIDs": [] }), &catalog).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField { field } if field == "moddedIDs"));

        let err =
            ResearchData::from_document(&json!({ "moddedIDs": {} }), &catalog).unwrap_err();
        assert!(matches!(err, DocumentError::MissingField { field } if field == "vanillaIDs"));
    }

    #[test]
    fn test_mistyped_fields_fail() {
        let catalog = session_catalog();
        let doc = json!({ "vanillaIDs": ["one"], "moddedIDs": {} });
        let err = ResearchData::from_document(&doc, &catalog).unwrap_err();
        assert!(matches!(err, DocumentError::WrongType { .. }));

        let doc = json!({ "vanillaIDs": [-4], "moddedIDs": {} });
        let err = ResearchData::from_document(&doc, &catalog).unwrap_err();
        assert!(matches!(err, DocumentError::OutOfRange { .. }));
    }

    #[test]
    fn test_unloaded_owner_kept_verbatim() {
        let catalog = session_catalog();
        let doc = json!({
            "vanillaIDs": [1],
            "moddedIDs": {
                "trinkets": [{ "n": "Charm", "c": 8 }, { "n": "Amulet", "c": 0 }]
            }
        });

        let data = ResearchData::from_document(&doc, &catalog).unwrap();
        assert_eq!(data.pending_count(), 0);
        let (owner, list) = data.unresolved().next().unwrap();
        assert_eq!(owner, "trinkets");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].count(), 0);
    }

    #[test]
    fn test_loaded_owner_resolves_to_pending() {
        let catalog = session_catalog();
        let doc = json!({
            "vanillaIDs": [],
            "moddedIDs": {
                "gadgets": [
                    { "n": "Widget", "c": 4 },
                    { "n": "Retired", "c": 6 }
                ]
            }
        });

        let data = ResearchData::from_document(&doc, &catalog).unwrap();
        let pending: Vec<_> = data.pending().collect();
        assert_eq!(pending, vec![(EntryId::new(200), 4)]);

        let (owner, list) = data.unresolved().next().unwrap();
        assert_eq!(owner, "gadgets");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name(), "Retired");
    }

    #[test]
    fn test_share_document_roundtrip() {
        let catalog = session_catalog();
        let mut share = ResearchShare::new();
        share.store(
            "Scholar",
            &catalog,
            None,
            &crate::share::SyncOptions::default(),
        );

        let doc = share.to_document(&catalog);
        let back = ResearchShare::from_document(&doc, &catalog).unwrap();
        assert_eq!(back.source_player(), "Scholar");
        assert!(!back.is_empty());
    }
}

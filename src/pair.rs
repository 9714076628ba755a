//! Name/count pairs for entries known only by name.
//!
//! When an entry's owner is not loaded, the entry survives as a
//! [`NameCount`]: its stable name plus the progress count carried for
//! it. The count is auxiliary data; identity (and therefore
//! de-duplication inside per-owner lists) is by name alone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::research::FULLY_RESEARCHED;

/// An entry name with its carried progress count.
///
/// Immutable once constructed. Two pairs compare equal when their names
/// match, regardless of count; list de-duplication relies on this.
///
/// # Examples
///
/// ```
/// use loresync::NameCount;
///
/// let a = NameCount::new("CrimsonBar", 25);
/// let b = NameCount::new("CrimsonBar", 99);
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameCount {
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "c")]
    count: u32,
}

impl NameCount {
    /// Creates a pair from a name and a carried count.
    #[must_use]
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// The entry's stable name within its owner.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The carried progress count.
    ///
    /// [`FULLY_RESEARCHED`] is a reserved marker here, never a literal
    /// remaining count.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Returns true if the carried count is the fully-researched marker.
    #[must_use]
    pub const fn is_fully_researched(&self) -> bool {
        self.count == FULLY_RESEARCHED
    }

    /// Encodes the pair as its canonical two-field tagged map.
    #[must_use]
    pub fn to_tag(&self) -> serde_json::Value {
        serde_json::json!({ "n": self.name, "c": self.count })
    }

    /// Decodes a pair from its tagged map, failing if either field is
    /// absent or of the wrong type.
    pub fn from_tag(tag: &serde_json::Value) -> Result<Self, DocumentError> {
        let obj = tag.as_object().ok_or_else(|| DocumentError::WrongType {
            field: "pair".to_string(),
            expected: "map",
        })?;

        let name = obj
            .get("n")
            .ok_or_else(|| DocumentError::MissingField {
                field: "n".to_string(),
            })?
            .as_str()
            .ok_or_else(|| DocumentError::WrongType {
                field: "n".to_string(),
                expected: "string",
            })?;

        let count = obj.get("c").ok_or_else(|| DocumentError::MissingField {
            field: "c".to_string(),
        })?;
        let count = count.as_i64().ok_or_else(|| DocumentError::WrongType {
            field: "c".to_string(),
            expected: "integer",
        })?;
        let count = u32::try_from(count).map_err(|_| DocumentError::OutOfRange {
            field: "c".to_string(),
            value: count,
        })?;

        Ok(Self::new(name, count))
    }
}

impl PartialEq for NameCount {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for NameCount {}

impl fmt::Display for NameCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.count)
    }
}

//! Strongly-typed identifiers for laundry entities
//!
//! Entity IDs are UUID-based but wrapped in newtype structs for type safety.
//! The wire form is the bare UUID; `Display` adds a kind prefix for logs.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a laundry note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from either the bare UUID or the prefixed display form
    pub fn parse(id: &str) -> Option<Self> {
        let raw = id.strip_prefix("note:").unwrap_or(id);
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "note:{}", self.0)
    }
}

/// Unique identifier for a shop order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn parse(id: &str) -> Option<Self> {
        let raw = id.strip_prefix("order:").unwrap_or(id);
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

/// Human-readable note number printed on the customer's ticket
///
/// Folios order by their trailing sequence number, then by text, so
/// `N-100000` follows `N-99999` and a prefix change keeps issue order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Folio(String);

impl Folio {
    pub fn new(folio: impl Into<String>) -> Self {
        Self(folio.into())
    }

    /// Folio for the n-th note issued by a shop, e.g. `N-00042`
    pub fn from_sequence(prefix: &str, sequence: u64) -> Self {
        Self(format!("{}-{:05}", prefix, sequence))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number after the last `-`, if the folio has one
    pub fn sequence(&self) -> Option<u64> {
        let digits = self.0.rsplit('-').next()?;
        digits.parse().ok()
    }
}

impl Ord for Folio {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence()
            .cmp(&other.sequence())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Folio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Folio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Relay event types
//!
//! Every accepted write is echoed to connected clients as one event carrying
//! the full updated document. Event names follow `<entity><Action>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Name of the aggregate statistics event
pub const STATS_UPDATED: &str = "statsUpdated";

/// Entity kinds that produce relay events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Note,
    Order,
    Product,
    Service,
    User,
    Business,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Note,
        EntityKind::Order,
        EntityKind::Product,
        EntityKind::Service,
        EntityKind::User,
        EntityKind::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::Order => "order",
            EntityKind::Product => "product",
            EntityKind::Service => "service",
            EntityKind::User => "user",
            EntityKind::Business => "business",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == lower)
            .ok_or_else(|| format!("Unknown entity kind: {}", s))
    }
}

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Created,
    Updated,
    Deleted,
}

impl EventAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventAction::Created => "Created",
            EventAction::Updated => "Updated",
            EventAction::Deleted => "Deleted",
        }
    }
}

/// Envelope broadcast to every subscriber
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayEvent {
    /// Unique event ID
    pub id: Uuid,

    /// Position in the relay's global stream, strictly increasing
    pub sequence: u64,

    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Client-facing event name (`noteCreated`, `statsUpdated`, ...)
    pub name: String,

    /// Entity kind, absent for aggregate events
    pub entity: Option<EntityKind>,

    pub action: Option<EventAction>,

    /// Bare id of the affected document
    pub entity_id: Option<String>,

    /// Revision of the document after the write
    pub revision: Option<u64>,

    /// Full document, `{"_id": ..}` for deletes, or aggregate body
    pub payload: serde_json::Value,
}

impl RelayEvent {
    /// Build the event for a document write. Sequence is assigned on publish.
    pub fn entity(
        entity: EntityKind,
        action: EventAction,
        entity_id: impl Into<String>,
        revision: Option<u64>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            timestamp: chrono::Utc::now(),
            name: Self::event_name(entity, action),
            entity: Some(entity),
            action: Some(action),
            entity_id: Some(entity_id.into()),
            revision,
            payload,
        }
    }

    /// Build the `statsUpdated` aggregate event
    pub fn stats(payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            timestamp: chrono::Utc::now(),
            name: STATS_UPDATED.to_string(),
            entity: None,
            action: None,
            entity_id: None,
            revision: None,
            payload,
        }
    }

    /// `<entity><Action>`, e.g. `noteCreated`
    pub fn event_name(entity: EntityKind, action: EventAction) -> String {
        format!("{}{}", entity.as_str(), action.as_str())
    }
}

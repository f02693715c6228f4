//! Client-side mirror of an entity list
//!
//! A mirror holds the list a client fetched once and patches it from relay
//! events, keyed by document id. Events that carry an older revision than
//! the local copy are dropped, so a delayed `noteUpdated` cannot roll a
//! note back.

use crate::bus::Subscription;
use crate::error::{RelayError, RelayResult};
use laundry_types::{EntityKind, EventAction, Note, Order, RelayEvent};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A document type that can be mirrored
pub trait MirrorDocument: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity kind whose events patch this mirror
    const KIND: EntityKind;

    /// Bare document id as carried in `RelayEvent::entity_id`
    fn doc_id(&self) -> String;

    fn revision(&self) -> u64;
}

impl MirrorDocument for Note {
    const KIND: EntityKind = EntityKind::Note;

    fn doc_id(&self) -> String {
        self.id.as_uuid().to_string()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

impl MirrorDocument for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn doc_id(&self) -> String {
        self.id.as_uuid().to_string()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// What an event did to the mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Inserted,
    Replaced,
    Removed,
    /// Event was for another entity kind or an aggregate
    NotApplicable,
    /// Incoming revision is older than the local one
    Stale,
    /// Delete for an id the mirror never had
    Unknown,
}

/// Id-keyed list, newest first
#[derive(Debug, Clone)]
pub struct EntityMirror<T> {
    items: Vec<T>,
    stale_dropped: u64,
}

impl<T: MirrorDocument> Default for EntityMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: MirrorDocument> EntityMirror<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            stale_dropped: 0,
        }
    }

    /// Start from a fetched list
    pub fn from_snapshot(items: Vec<T>) -> Self {
        Self {
            items,
            stale_dropped: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.doc_id() == id)
    }

    /// Events dropped for carrying an old revision
    pub fn stale_dropped(&self) -> u64 {
        self.stale_dropped
    }

    /// Patch the list from one relay event
    pub fn apply(&mut self, event: &RelayEvent) -> RelayResult<PatchOutcome> {
        if event.entity != Some(T::KIND) {
            return Ok(PatchOutcome::NotApplicable);
        }

        match event.action {
            Some(EventAction::Created) | Some(EventAction::Updated) => {
                let document: T = serde_json::from_value(event.payload.clone())?;
                Ok(self.upsert(document))
            }
            Some(EventAction::Deleted) => {
                let Some(id) = event.entity_id.as_deref() else {
                    return Ok(PatchOutcome::Unknown);
                };
                match self.position(id) {
                    Some(index) => {
                        self.items.remove(index);
                        Ok(PatchOutcome::Removed)
                    }
                    None => Ok(PatchOutcome::Unknown),
                }
            }
            None => Ok(PatchOutcome::NotApplicable),
        }
    }

    fn upsert(&mut self, document: T) -> PatchOutcome {
        match self.position(&document.doc_id()) {
            Some(index) => {
                if document.revision() < self.items[index].revision() {
                    self.stale_dropped += 1;
                    tracing::debug!(
                        id = %document.doc_id(),
                        incoming = document.revision(),
                        local = self.items[index].revision(),
                        "Dropped stale relay event"
                    );
                    return PatchOutcome::Stale;
                }
                self.items[index] = document;
                PatchOutcome::Replaced
            }
            None => {
                self.items.insert(0, document);
                PatchOutcome::Inserted
            }
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.doc_id() == id)
    }
}

/// Feed a shared mirror from a subscription until the bus closes
pub async fn follow<T: MirrorDocument>(
    mut subscription: Subscription,
    mirror: Arc<RwLock<EntityMirror<T>>>,
) {
    loop {
        match subscription.recv().await {
            Ok(event) => {
                let mut guard = mirror.write().await;
                if let Err(e) = guard.apply(&event) {
                    tracing::warn!(name = %event.name, error = %e, "Could not patch mirror");
                }
            }
            Err(RelayError::Lagged(skipped)) => {
                let kind = T::KIND;
                tracing::warn!(skipped, kind = %kind, "Mirror lagged; list may be stale");
            }
            Err(_) => break,
        }
    }
}

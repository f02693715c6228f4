//! Broadcast event bus
//!
//! One tokio broadcast channel carries every event. Subscribers pick their
//! topics with a [`TopicFilter`]; dropping a [`Subscription`] unsubscribes.
//! The bus also keeps a bounded history so late joiners can catch up.

use crate::error::{RelayError, RelayResult};
use laundry_types::{EntityKind, EventAction, LaundryStats, RelayEvent};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Which events a subscriber wants
#[derive(Debug, Clone)]
pub struct TopicFilter {
    entities: Option<HashSet<EntityKind>>,
    include_stats: bool,
}

impl Default for TopicFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl TopicFilter {
    /// Every entity plus stats
    pub fn all() -> Self {
        Self {
            entities: None,
            include_stats: true,
        }
    }

    /// Only the given entity kinds, no stats
    pub fn entities(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            entities: Some(kinds.into_iter().collect()),
            include_stats: false,
        }
    }

    pub fn with_stats(mut self, include: bool) -> Self {
        self.include_stats = include;
        self
    }

    pub fn matches(&self, event: &RelayEvent) -> bool {
        match event.entity {
            None => self.include_stats,
            Some(kind) => self
                .entities
                .as_ref()
                .map_or(true, |kinds| kinds.contains(&kind)),
        }
    }
}

/// Event bus shared by every writer
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<RelayEvent>,
    sequence: AtomicU64,
    history: Mutex<VecDeque<RelayEvent>>,
    history_limit: usize,
}

impl EventBus {
    /// Create a bus with the given channel capacity and history length
    pub fn new(capacity: usize, history_limit: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence: AtomicU64::new(0),
            history: Mutex::new(VecDeque::with_capacity(history_limit.min(1024))),
            history_limit,
        }
    }

    /// Stamp and broadcast an event. Returns the stamped copy.
    pub fn publish(&self, mut event: RelayEvent) -> RelayEvent {
        // Holding the history lock keeps history order equal to sequence order.
        let mut history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        event.sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        if self.history_limit > 0 {
            if history.len() >= self.history_limit {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // No receivers is fine; the event still lands in history.
        let receivers = self.tx.send(event.clone()).unwrap_or(0);

        tracing::trace!(
            name = %event.name,
            sequence = event.sequence,
            receivers,
            "Published relay event"
        );

        event
    }

    /// Publish a created/updated document
    pub fn publish_document<T: Serialize>(
        &self,
        entity: EntityKind,
        action: EventAction,
        entity_id: impl Into<String>,
        revision: u64,
        document: &T,
    ) -> RelayResult<RelayEvent> {
        let payload = serde_json::to_value(document)?;
        Ok(self.publish(RelayEvent::entity(
            entity,
            action,
            entity_id,
            Some(revision),
            payload,
        )))
    }

    /// Publish a delete; payload is `{"_id": id}`
    pub fn publish_deleted(&self, entity: EntityKind, entity_id: impl Into<String>) -> RelayEvent {
        let entity_id = entity_id.into();
        let payload = serde_json::json!({ "_id": entity_id });
        self.publish(RelayEvent::entity(
            entity,
            EventAction::Deleted,
            entity_id,
            None,
            payload,
        ))
    }

    /// Publish fresh dashboard numbers
    pub fn publish_stats(&self, stats: &LaundryStats) -> RelayResult<RelayEvent> {
        let payload = serde_json::to_value(stats)?;
        Ok(self.publish(RelayEvent::stats(payload)))
    }

    /// Subscribe to the live stream
    pub fn subscribe(&self, filter: TopicFilter) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            filter,
        }
    }

    /// Most recent events matching the filter, oldest first
    pub fn recent(&self, limit: usize, filter: &TopicFilter) -> Vec<RelayEvent> {
        let history = self
            .history
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut events: Vec<RelayEvent> = history
            .iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(limit)
            .cloned()
            .collect();
        events.reverse();
        events
    }

    /// Last sequence number handed out
    pub fn last_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Live handle on the bus. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    rx: broadcast::Receiver<RelayEvent>,
    filter: TopicFilter,
}

impl Subscription {
    /// Next event matching this subscription's filter
    pub async fn recv(&mut self) -> RelayResult<RelayEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.filter.matches(&event) => return Ok(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    return Err(RelayError::Lagged(skipped))
                }
                Err(broadcast::error::RecvError::Closed) => return Err(RelayError::Closed),
            }
        }
    }

    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}

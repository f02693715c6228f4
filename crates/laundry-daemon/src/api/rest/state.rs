//! Application state for API handlers

use crate::config::DaemonConfig;
use crate::error::ApiResult;
use crate::storage::{NoteStorage, OrderStorage, Storage};
use laundry_ledger::compute_stats;
use laundry_relay::EventBus;
use laundry_types::{EntityKind, EventAction, LaundryStats, Note, Order};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub storage: Arc<dyn Storage>,

    /// Live event relay
    pub bus: Arc<EventBus>,

    /// Accepted bearer tokens; empty means open access
    pub tokens: Arc<HashSet<String>>,

    /// Folio prefix for new notes
    pub folio_prefix: Arc<str>,

    /// SSE keep-alive interval
    pub keep_alive: Duration,

    pub enable_cors: bool,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(storage: Arc<dyn Storage>, bus: Arc<EventBus>, config: &DaemonConfig) -> Self {
        Self {
            storage,
            bus,
            tokens: Arc::new(config.auth.tokens.iter().cloned().collect()),
            folio_prefix: Arc::from(config.notes.folio_prefix.as_str()),
            keep_alive: Duration::from_secs(config.events.keep_alive_secs.max(1)),
            enable_cors: config.server.enable_cors,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }

    /// Current dashboard numbers
    pub async fn stats(&self) -> ApiResult<LaundryStats> {
        let notes = self.storage.list_notes().await?;
        let orders = self.storage.list_orders().await?;
        Ok(compute_stats(&notes, &orders))
    }

    /// Broadcast a committed note write, then fresh stats
    pub async fn announce_note(&self, action: EventAction, note: &Note) {
        let id = note.id.as_uuid().to_string();
        if let Err(e) = self
            .bus
            .publish_document(EntityKind::Note, action, id, note.revision, note)
        {
            tracing::warn!(note_id = %note.id, error = %e, "Failed to publish note event");
        }
        self.announce_stats().await;
    }

    /// Broadcast a committed order write, then fresh stats
    pub async fn announce_order(&self, action: EventAction, order: &Order) {
        let id = order.id.as_uuid().to_string();
        if let Err(e) = self
            .bus
            .publish_document(EntityKind::Order, action, id, order.revision, order)
        {
            tracing::warn!(order_id = %order.id, error = %e, "Failed to publish order event");
        }
        self.announce_stats().await;
    }

    /// Broadcast a delete, then fresh stats
    pub async fn announce_deleted(&self, entity: EntityKind, id: String) {
        self.bus.publish_deleted(entity, id);
        self.announce_stats().await;
    }

    async fn announce_stats(&self) {
        let published = match self.stats().await {
            Ok(stats) => self.bus.publish_stats(&stats).map(|_| ()).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if let Err(e) = published {
            tracing::warn!(error = %e, "Failed to publish stats");
        }
    }
}

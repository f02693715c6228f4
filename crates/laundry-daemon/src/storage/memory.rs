//! In-memory storage implementation

use super::traits::*;
use crate::error::StorageError;
use async_trait::async_trait;
use laundry_types::{Note, NoteId, Order, OrderId};
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::RwLock;

/// In-memory storage for development and testing
#[derive(Debug)]
pub struct InMemoryStorage {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
    folio_sequence: Arc<AtomicU64>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self {
            notes: Arc::new(RwLock::new(HashMap::new())),
            orders: Arc::new(RwLock::new(HashMap::new())),
            folio_sequence: Arc::new(AtomicU64::new(0)),
        }
    }
}

fn check_revision(what: &str, stored: u64, expected: u64) -> StorageResult<()> {
    if stored != expected {
        return Err(StorageError::Conflict(format!(
            "{} was modified (revision {}, expected {})",
            what, stored, expected
        )));
    }
    Ok(())
}

#[async_trait]
impl NoteStorage for InMemoryStorage {
    async fn get_note(&self, id: &NoteId) -> StorageResult<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.get(id).cloned())
    }

    async fn list_notes(&self) -> StorageResult<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.values().cloned().collect())
    }

    async fn insert_note(&self, note: Note) -> StorageResult<()> {
        let mut notes = self.notes.write().await;
        if notes.contains_key(&note.id) {
            return Err(StorageError::Conflict(format!("{} already exists", note.id)));
        }
        notes.insert(note.id, note);
        Ok(())
    }

    async fn replace_note(&self, note: Note, expected_revision: u64) -> StorageResult<()> {
        let mut notes = self.notes.write().await;
        let stored = notes
            .get(&note.id)
            .ok_or_else(|| StorageError::NotFound(note.id.to_string()))?;
        check_revision(&note.id.to_string(), stored.revision, expected_revision)?;
        notes.insert(note.id, note);
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId, expected_revision: u64) -> StorageResult<()> {
        let mut notes = self.notes.write().await;
        let stored = notes
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        check_revision(&id.to_string(), stored.revision, expected_revision)?;
        notes.remove(id);
        Ok(())
    }

    async fn next_folio(&self) -> StorageResult<u64> {
        Ok(self.folio_sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl OrderStorage for InMemoryStorage {
    async fn get_order(&self, id: &OrderId) -> StorageResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(id).cloned())
    }

    async fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.values().cloned().collect())
    }

    async fn insert_order(&self, order: Order) -> StorageResult<()> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StorageError::Conflict(format!("{} already exists", order.id)));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn replace_order(&self, order: Order, expected_revision: u64) -> StorageResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get(&order.id)
            .ok_or_else(|| StorageError::NotFound(order.id.to_string()))?;
        check_revision(&order.id.to_string(), stored.revision, expected_revision)?;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn delete_order(&self, id: &OrderId, expected_revision: u64) -> StorageResult<()> {
        let mut orders = self.orders.write().await;
        let stored = orders
            .get(id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        check_revision(&id.to_string(), stored.revision, expected_revision)?;
        orders.remove(id);
        Ok(())
    }
}

impl Storage for InMemoryStorage {}

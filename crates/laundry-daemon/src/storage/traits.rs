//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use laundry_types::{Note, NoteId, Order, OrderId};

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Combined storage trait
#[async_trait]
pub trait Storage: NoteStorage + OrderStorage + Send + Sync {}

/// Storage for laundry notes
#[async_trait]
pub trait NoteStorage: Send + Sync {
    /// Get a note by ID
    async fn get_note(&self, id: &NoteId) -> StorageResult<Option<Note>>;

    /// List all notes
    async fn list_notes(&self) -> StorageResult<Vec<Note>>;

    /// Store a new note. Fails with `Conflict` if the ID is taken.
    async fn insert_note(&self, note: Note) -> StorageResult<()>;

    /// Replace a note if the stored revision still equals `expected_revision`
    async fn replace_note(&self, note: Note, expected_revision: u64) -> StorageResult<()>;

    /// Remove a note if the stored revision still equals `expected_revision`
    async fn delete_note(&self, id: &NoteId, expected_revision: u64) -> StorageResult<()>;

    /// Next folio number, starting at 1
    async fn next_folio(&self) -> StorageResult<u64>;
}

/// Storage for shop orders
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Get an order by ID
    async fn get_order(&self, id: &OrderId) -> StorageResult<Option<Order>>;

    /// List all orders
    async fn list_orders(&self) -> StorageResult<Vec<Order>>;

    /// Store a new order. Fails with `Conflict` if the ID is taken.
    async fn insert_order(&self, order: Order) -> StorageResult<()>;

    /// Replace an order if the stored revision still equals `expected_revision`
    async fn replace_order(&self, order: Order, expected_revision: u64) -> StorageResult<()>;

    /// Remove an order if the stored revision still equals `expected_revision`
    async fn delete_order(&self, id: &OrderId, expected_revision: u64) -> StorageResult<()>;
}

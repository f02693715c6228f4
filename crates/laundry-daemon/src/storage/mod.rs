//! Storage layer for laundry-daemon
//!
//! Notes and orders live behind async traits so handlers never see the
//! backend. Every mutation is a single revision-checked write.

mod memory;
mod traits;

pub use memory::InMemoryStorage;
pub use traits::{NoteStorage, OrderStorage, Storage, StorageResult};

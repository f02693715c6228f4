//! Laundry Daemon library
//!
//! This module provides the core components for the laundry daemon:
//! - REST API handlers for notes, orders, stats and events
//! - Storage backends
//! - Server lifecycle management

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;

pub use api::rest::AppState;
pub use api::create_router;
pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use server::Server;
pub use storage::{InMemoryStorage, Storage};

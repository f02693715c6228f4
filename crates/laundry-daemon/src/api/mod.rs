//! API layer for laundry-daemon

pub mod rest;

pub use rest::create_router;

//! Laundry Relay - live updates for connected clients
//!
//! Writers publish one event per accepted mutation on the [`EventBus`].
//! Readers either stream those events (the daemon's SSE endpoint) or keep an
//! [`EntityMirror`] patched from them and derive list views locally.

#![deny(unsafe_code)]

pub mod bus;
pub mod error;
pub mod mirror;
pub mod view;

pub use bus::{EventBus, Subscription, TopicFilter};
pub use error::{RelayError, RelayResult};
pub use mirror::{follow, EntityMirror, MirrorDocument, PatchOutcome};
pub use view::{
    note_view, order_view, paginate, NoteQuery, OrderQuery, Page, SortDirection, SortKey,
};

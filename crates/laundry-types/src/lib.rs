//! Laundry Types - Core types for the laundry back office
//!
//! A laundry shop tracks two kinds of work:
//!
//! - **Notes**: laundry drop-offs that move through cleaning stages and are
//!   paid with one or more partial payments (*abonos*) before delivery
//! - **Orders**: shop orders that move through a shipping lifecycle
//!
//! Every accepted mutation is echoed to connected clients as a relay event
//! named `<entity><Action>` (`noteCreated`, `orderUpdated`, ...).
//!
//! ## Money
//!
//! All amounts are integers in minor units (centavos). `10_000` is $100.00.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod events;
pub mod ids;
pub mod note;
pub mod order;
pub mod payment;
pub mod stats;

// Re-export main types
pub use events::{EntityKind, EventAction, RelayEvent, STATS_UPDATED};
pub use ids::{Folio, NoteId, OrderId};
pub use note::{CleaningStatus, Note, NoteStatus};
pub use order::{DeliveryStatus, Order, OrderItem};
pub use payment::{Abono, PaymentMethod, UnknownPaymentMethod};
pub use stats::{CleaningQueue, LaundryStats, NoteCounts, OrderCounts};

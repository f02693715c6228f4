//! Laundry Ledger - payment and delivery rules
//!
//! Pure state machines over [`laundry_types::Note`] and
//! [`laundry_types::Order`]. Nothing here performs I/O; callers load a
//! document, apply commands, and persist the returned copy in one write.
//!
//! ## Invariants
//!
//! - The sum of a note's abonos never exceeds its total.
//! - A note reaches `entregado` only from `pagado` with laundry
//!   `listo_para_entregar`.
//! - No abono is accepted once a note is paid, delivered or cancelled.

#![deny(unsafe_code)]

pub mod error;
pub mod note;
pub mod order;
pub mod stats;

pub use error::{NoteError, OrderError};
pub use note::{
    apply, apply_all, ensure_deletable, Applied, Checkout, NoteCommand, NoteDraft, NoteTransition,
};
pub use order::{apply_order, ensure_order_deletable, open_order, OrderCommand};
pub use stats::compute_stats;

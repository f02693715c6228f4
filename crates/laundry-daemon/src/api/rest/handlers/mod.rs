//! API request handlers

mod events;
mod health;
mod notes;
mod orders;
mod stats;

pub use events::*;
pub use health::*;
pub use notes::*;
pub use orders::*;
pub use stats::*;

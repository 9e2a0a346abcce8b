//! Core roster logic
//!
//! State, command dispatch and the pure rating/selection functions behind it.

pub mod archive;
pub mod assignment;
pub mod commands;
pub mod stats;
pub mod store;

pub use commands::RosterCommand;
pub use store::{EditCursor, RosterState, RosterStore, SharedRosterStore, Subscriber};

//! Roster library for managing players, teams and balancing runs
//!
//! The store owns all roster state and applies every mutation through a single
//! command dispatch. Persistence and logging observe the store as subscribers,
//! and balancing is offloaded to the `balancer` crate's worker.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::RosterConfig;
pub use core::{EditCursor, RosterCommand, RosterState, RosterStore, SharedRosterStore};
pub use error::{RosterError, RosterResult};
pub use traits::{MockStateStorage, StateStorage};

//! Shared types for the roster balancing system
//!
//! Contains the entity model (players, teams, archive entries, balancer
//! options, balance results) and the messages exchanged with the balancer
//! worker. Component-internal types stay in their respective crates.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

// Re-export worker communication messages
pub use messages::{
    FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, WorkerMessage, WorkerMethod, WorkerOutcome, WorkerRequest,
};

//! Message types for the roster balancing system
//!
//! - `worker`: Orchestrator ↔ balancer worker request/reply and progress messages

pub mod worker;

pub use worker::{
    FinalBalanceArgs, FullBalanceArgs, HalfBalanceArgs, WorkerMessage, WorkerMethod, WorkerOutcome, WorkerRequest,
};

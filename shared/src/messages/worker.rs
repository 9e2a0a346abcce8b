//! Orchestrator ↔ balancer worker communication messages
//!
//! Arguments and results cross the worker boundary as JSON documents so no
//! live reference to roster state ever reaches the worker.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::{AdjustSr, DisableType, Players, Teams};

/// Methods exposed by the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerMethod {
    /// Readiness probe
    Test,
    FullBalance,
    HalfBalance,
    FinalBalance,
}

impl fmt::Display for WorkerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerMethod::Test => write!(f, "test"),
            WorkerMethod::FullBalance => write!(f, "fullBalance"),
            WorkerMethod::HalfBalance => write!(f, "halfBalance"),
            WorkerMethod::FinalBalance => write!(f, "finalBalance"),
        }
    }
}

/// Request sent from the orchestrator to the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRequest {
    pub request_id: u64,
    pub method: WorkerMethod,
    /// JSON-encoded arguments for `method`
    pub payload: String,
}

/// Outcome of a single request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkerOutcome {
    /// JSON-encoded result
    Ok(String),
    /// Engine failure message
    Err(String),
}

/// Messages sent from the worker back to the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// Reply to the request with the same id
    Reply { request_id: u64, outcome: WorkerOutcome },
    /// Progress notification, not tied to any request
    #[serde(rename = "pop")]
    Progress { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullBalanceArgs {
    pub players: Players,
    pub range: u32,
    pub low_rank_limiter: bool,
    pub disallow_secondary_roles: bool,
    pub adjust_sr: AdjustSr,
    pub disable_type: DisableType,
    pub dispersion_minimizer: bool,
    pub tries_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HalfBalanceArgs {
    pub players: Players,
    pub range: u32,
    pub low_rank_limiter: bool,
    pub disallow_secondary_roles: bool,
    pub adjust_sr: AdjustSr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalBalanceArgs {
    pub players: Players,
    pub range: u32,
    pub low_rank_limiter: bool,
    pub disallow_secondary_roles: bool,
    pub reserve_snapshot: Vec<Uuid>,
    pub teams_snapshot: Teams,
    pub adjust_sr: AdjustSr,
}

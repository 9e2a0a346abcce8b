//! Balancer-specific error types

use shared::{SharedError, WorkerMethod};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BalancerError {
    #[error("Engine failed during {method}: {message}")]
    Engine { method: WorkerMethod, message: String },

    #[error("Balancer worker is unavailable")]
    WorkerUnavailable,

    #[error("Failed to start balancer worker: {message}")]
    WorkerSpawnFailed { message: String },

    #[error("Engine process error: {message}")]
    EngineProcess { message: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type BalancerResult<T> = Result<T, BalancerError>;

//! Roster-specific error types

use balancer::BalancerError;
use shared::SharedError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Player not found: {uuid}")]
    PlayerNotFound { uuid: Uuid },

    #[error("Team not found: {uuid}")]
    TeamNotFound { uuid: Uuid },

    #[error("Archive entry {index} not found ({len} entries)")]
    ArchiveEntryNotFound { index: usize, len: usize },

    #[error("Storage operation failed: {operation} on {path}: {message}")]
    StorageError {
        operation: String,
        path: String,
        message: String,
    },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),

    #[error("Balancer error: {0}")]
    BalancerError(#[from] BalancerError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RosterError {
    pub fn config(field: impl Into<String>) -> Self {
        Self::ConfigurationError { field: field.into() }
    }

    pub fn storage(operation: &str, path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::StorageError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

//! Runtime configuration for the roster process

use std::path::PathBuf;

use crate::error::{RosterError, RosterResult};

/// Players per team used for captain and squire quotas
pub const DEFAULT_TEAM_SIZE: usize = 6;

/// Key the roster document is stored under
pub const STORAGE_KEY: &str = "owbalancer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    /// Directory holding the persisted roster document
    pub data_dir: PathBuf,
    pub team_size: usize,
    pub log_level: String,
    /// External balancing engine command line, if any
    pub engine_cmd: Option<String>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            team_size: DEFAULT_TEAM_SIZE,
            log_level: "info".to_string(),
            engine_cmd: None,
        }
    }
}

impl RosterConfig {
    /// Reject values the store cannot work with
    pub fn validate(&self) -> RosterResult<()> {
        if self.team_size == 0 {
            return Err(RosterError::config("team_size must be at least 1"));
        }
        if matches!(&self.engine_cmd, Some(cmd) if cmd.trim().is_empty()) {
            return Err(RosterError::config("engine_cmd must not be blank"));
        }
        Ok(())
    }

    /// Engine command line, required by balancing commands
    pub fn require_engine_cmd(&self) -> RosterResult<&str> {
        self.engine_cmd
            .as_deref()
            .ok_or_else(|| RosterError::config("engine_cmd (set --engine-cmd or ROSTER_ENGINE_CMD)"))
    }
}

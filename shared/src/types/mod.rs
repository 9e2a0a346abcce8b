//! Core types used throughout the roster system

pub mod archive;
pub mod balance;
pub mod options;
pub mod player;
pub mod team;

pub use archive::{Archive, ArchiveEntry};
pub use balance::{Balance, BalanceRole, Leftover, Results};
pub use options::{AdjustSr, BalancerOptions, BezierPoint, DisableType, Point, SpecializationPoints};
pub use player::{ClassType, Classes, Identity, Player, Players, Pool, ReservedPlayers, Role, Stats};
pub use team::{Team, TeamMember, Teams};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Identifier for the execution context emitting logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// Main roster process (store, persistence, CLI)
    Roster,
    /// Background balancer worker context
    BalancerWorker,
}

impl ProcessId {
    /// Initialize the global process ID for the roster process
    pub fn init_roster() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Roster)
    }

    /// Get the global process ID, defaulting to the roster process
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Roster)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Roster => write!(f, "roster"),
            ProcessId::BalancerWorker => write!(f, "balancer_worker"),
        }
    }
}

//! Point-in-time snapshots of roster state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::player::{Players, ReservedPlayers};
use super::team::Teams;

/// Deep copy of teams, players and reserve taken at `date`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    pub date: DateTime<Utc>,
    pub name: String,
    pub teams: Teams,
    pub players: Players,
    pub reserved_players: ReservedPlayers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<Players>,
}

pub type Archive = Vec<ArchiveEntry>;

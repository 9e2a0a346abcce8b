//! Results returned by the balancing engine

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::Teams;

/// A role offered by a leftover player: `{"Tank": [rank, primary, secondary]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceRole {
    Tank(u32, bool, bool),
    Dps(u32, bool, bool),
    Support(u32, bool, bool),
}

/// A player the engine could not place on any team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leftover {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<BalanceRole>,
}

/// One candidate team assignment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Balance {
    pub anchors: i32,
    pub dispersion: i32,
    pub leftovers: Vec<Leftover>,
    pub teams: Teams,
}

/// Candidate assignments from one run, best first
pub type Results = Vec<Balance>;

//! Player records and the two roster pools

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::SharedError;

/// Players keyed by UUID, in insertion order
pub type Players = IndexMap<Uuid, Player>;

/// Ordered list of player UUIDs not assigned to any team
pub type ReservedPlayers = Vec<Uuid>;

/// Which roster pool an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    /// Active roster
    Players,
    /// Shadow pool kept alongside the active roster
    Backup,
}

impl Pool {
    /// The counterpart pool
    pub fn other(self) -> Pool {
        match self {
            Pool::Players => Pool::Backup,
            Pool::Backup => Pool::Players,
        }
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pool::Players => write!(f, "players"),
            Pool::Backup => write!(f, "backup"),
        }
    }
}

/// Game role a player can fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dps,
    Tank,
    Support,
}

impl Role {
    /// All roles in declaration order
    pub const ALL: [Role; 3] = [Role::Dps, Role::Tank, Role::Support];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Dps => write!(f, "dps"),
            Role::Tank => write!(f, "tank"),
            Role::Support => write!(f, "support"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dps" | "damage" => Ok(Role::Dps),
            "tank" => Ok(Role::Tank),
            "support" | "heal" => Ok(Role::Support),
            _ => Err(SharedError::UnknownRole { input: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub is_captain: bool,
    #[serde(default)]
    pub is_squire: bool,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_full_flex: bool,
}

/// Rating and preference for a single role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassType {
    pub rank: u32,
    pub priority: u8,
    pub is_active: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub secondary: bool,
}

impl ClassType {
    fn inactive(priority: u8) -> Self {
        Self {
            rank: 0,
            priority,
            is_active: false,
            primary: false,
            secondary: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classes {
    pub dps: ClassType,
    pub tank: ClassType,
    pub support: ClassType,
}

impl Classes {
    pub fn get(&self, role: Role) -> &ClassType {
        match role {
            Role::Dps => &self.dps,
            Role::Tank => &self.tank,
            Role::Support => &self.support,
        }
    }

    pub fn get_mut(&mut self, role: Role) -> &mut ClassType {
        match role {
            Role::Dps => &mut self.dps,
            Role::Tank => &mut self.tank,
            Role::Support => &mut self.support,
        }
    }

    /// Iterate roles in declaration order (dps, tank, support)
    pub fn iter(&self) -> impl Iterator<Item = (Role, &ClassType)> {
        Role::ALL.into_iter().map(move |role| (role, self.get(role)))
    }
}

impl Default for Classes {
    fn default() -> Self {
        Self {
            dps: ClassType::inactive(0),
            tank: ClassType::inactive(1),
            support: ClassType::inactive(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub classes: Classes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub identity: Identity,
    pub stats: Stats,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a player with a fresh UUID and zeroed stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            identity: Identity {
                uuid: Uuid::new_v4(),
                name: name.into(),
                is_captain: false,
                is_squire: false,
                is_locked: false,
                is_full_flex: false,
            },
            stats: Stats::default(),
            created_at: Utc::now(),
        }
    }

    pub fn uuid(&self) -> Uuid {
        self.identity.uuid
    }

    /// Builder helper: activate a role with the given rank and priority
    pub fn with_role(mut self, role: Role, rank: u32, priority: u8) -> Self {
        let class = self.stats.classes.get_mut(role);
        class.rank = rank;
        class.priority = priority;
        class.is_active = true;
        self
    }
}

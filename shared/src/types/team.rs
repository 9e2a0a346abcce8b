//! Team records

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::player::Role;

pub type Teams = Vec<Team>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub uuid: Uuid,
    pub name: String,
    pub rank: u32,
    pub role: Role,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub secondary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub uuid: Uuid,
    pub name: String,
    /// NaN for a team without members; travels as `null` in JSON
    #[serde(with = "nan_as_null")]
    pub avg_sr: f64,
    pub total_sr: u32,
    pub members: Vec<TeamMember>,
}

impl Team {
    /// Create an empty team with zeroed stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            avg_sr: 0.0,
            total_sr: 0,
            members: Vec::new(),
        }
    }

    pub fn has_member(&self, uuid: &Uuid) -> bool {
        self.members.iter().any(|member| &member.uuid == uuid)
    }
}

/// Two NaN averages compare equal, so an empty team equals its own copy
impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        let same_avg = self.avg_sr == other.avg_sr || (self.avg_sr.is_nan() && other.avg_sr.is_nan());
        same_avg
            && self.uuid == other.uuid
            && self.name == other.name
            && self.total_sr == other.total_sr
            && self.members == other.members
    }
}

/// JSON has no NaN; serde_json would emit `null` and then refuse to read it back
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

//! Test fixtures for roster tests

use shared::{Balance, Leftover, Player, Role, Team, TeamMember};
use uuid::Uuid;

pub struct TestFixtures;

impl TestFixtures {
    pub const TEAM_SIZE: usize = 6;

    /// Player whose only active role is `role` at `rank`
    pub fn player(name: &str, role: Role, rank: u32) -> Player {
        Player::new(name).with_role(role, rank, 0)
    }

    /// Twelve players with distinct top ranks from 1100 to 4400
    pub fn twelve_players() -> Vec<Player> {
        let roles = [Role::Tank, Role::Dps, Role::Support];
        (0..12)
            .map(|i| Self::player(&format!("Player {i:02}"), roles[i % 3], 1100 + i as u32 * 300))
            .collect()
    }

    pub fn member(player: &Player, role: Role) -> TeamMember {
        TeamMember {
            uuid: player.uuid(),
            name: player.identity.name.clone(),
            rank: player.stats.classes.get(role).rank,
            role,
            primary: false,
            secondary: false,
        }
    }

    /// Team holding `players` as tanks, stats left stale on purpose
    pub fn team_of(name: &str, players: &[&Player]) -> Team {
        let mut team = Team::new(name);
        team.members = players.iter().map(|player| Self::member(player, Role::Tank)).collect();
        team
    }

    pub fn balance(teams: Vec<Team>, leftovers: &[Uuid]) -> Balance {
        Balance {
            anchors: 2,
            dispersion: 40,
            leftovers: leftovers
                .iter()
                .map(|uuid| Leftover {
                    uuid: *uuid,
                    name: "leftover".to_string(),
                    roles: Vec::new(),
                })
                .collect(),
            teams,
        }
    }
}

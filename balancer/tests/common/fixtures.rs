//! Test fixtures for balancer tests

use shared::{Balance, BalancerOptions, Player, Players, Role, Team};

pub struct TestFixtures;

impl TestFixtures {
    /// A small pool of active players
    pub fn players() -> Players {
        [
            Player::new("Reinhardt").with_role(Role::Tank, 3100, 0),
            Player::new("Ana").with_role(Role::Support, 2900, 0),
            Player::new("Tracer").with_role(Role::Dps, 2700, 0),
        ]
        .into_iter()
        .map(|player| (player.uuid(), player))
        .collect()
    }

    pub fn options() -> BalancerOptions {
        BalancerOptions::default()
    }

    /// Balance distinguishable by its anchors count
    pub fn balance(anchors: i32) -> Balance {
        Balance {
            anchors,
            dispersion: anchors * 10,
            leftovers: Vec::new(),
            teams: vec![Team::new(format!("Team {anchors}"))],
        }
    }
}

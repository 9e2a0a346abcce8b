//! Test helpers and builder patterns for roster tests

use shared::{Player, Pool, Team};
use uuid::Uuid;

use roster::{RosterCommand, RosterState, RosterStore};

use super::fixtures::TestFixtures;

/// Builder for stores populated through regular dispatch
pub struct StoreBuilder {
    team_size: usize,
    players: Vec<Player>,
    backup: Vec<Player>,
    teams: Vec<Team>,
    reserve_all: bool,
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self {
            team_size: TestFixtures::TEAM_SIZE,
            players: Vec::new(),
            backup: Vec::new(),
            teams: Vec::new(),
            reserve_all: false,
        }
    }

    pub fn with_team_size(mut self, team_size: usize) -> Self {
        self.team_size = team_size;
        self
    }

    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players.extend(players);
        self
    }

    /// Also copy every primary player into the backup pool
    pub fn mirrored_to_backup(mut self) -> Self {
        self.backup = self.players.clone();
        self
    }

    pub fn with_team(mut self, name: &str) -> Self {
        self.teams.push(Team::new(name));
        self
    }

    /// Put every primary player in the reserve
    pub fn all_reserved(mut self) -> Self {
        self.reserve_all = true;
        self
    }

    pub fn build(self) -> RosterStore {
        let mut store = RosterStore::with_team_size(self.team_size);
        let ids: Vec<Uuid> = self.players.iter().map(Player::uuid).collect();

        for player in self.players {
            TestHelpers::ok(&mut store, RosterCommand::AddPlayer { player, pool: Pool::Players });
        }
        for player in self.backup {
            TestHelpers::ok(&mut store, RosterCommand::AddPlayer { player, pool: Pool::Backup });
        }
        for team in self.teams {
            TestHelpers::ok(&mut store, RosterCommand::AddTeam { team });
        }
        if self.reserve_all {
            TestHelpers::ok(&mut store, RosterCommand::ReservePlayers { players: ids });
        }
        store
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// Dispatch and panic with context on failure
    pub fn ok(store: &mut RosterStore, command: RosterCommand) {
        let name = command.name();
        if let Err(e) = store.dispatch(command) {
            panic!("{name} failed: {e}");
        }
    }

    pub fn team_id(store: &RosterStore, index: usize) -> Uuid {
        store.state().teams[index].uuid
    }

    pub fn ids(store: &RosterStore) -> Vec<Uuid> {
        store.state().players.keys().copied().collect()
    }

    pub fn captains(state: &RosterState) -> Vec<Uuid> {
        state
            .players
            .values()
            .filter(|player| player.identity.is_captain)
            .map(Player::uuid)
            .collect()
    }

    pub fn squires(state: &RosterState) -> Vec<Uuid> {
        state
            .players
            .values()
            .filter(|player| player.identity.is_squire)
            .map(Player::uuid)
            .collect()
    }

    /// No player is both reserved and on a team, and nobody is on two teams
    pub fn assert_disjoint(state: &RosterState) {
        let mut seen = Vec::new();
        for team in &state.teams {
            for member in &team.members {
                assert!(!state.reserved_players.contains(&member.uuid), "{} is reserved and on {}", member.name, team.name);
                assert!(!seen.contains(&member.uuid), "{} is on two teams", member.name);
                seen.push(member.uuid);
            }
        }
    }

    /// Every team's totals match its members
    pub fn assert_team_stats(state: &RosterState) {
        for team in &state.teams {
            let total: u32 = team.members.iter().map(|member| member.rank).sum();
            assert_eq!(team.total_sr, total, "total of {}", team.name);
            if team.members.is_empty() {
                assert!(team.avg_sr.is_nan(), "empty {} should average NaN", team.name);
            } else {
                assert_eq!(team.avg_sr, total as f64 / team.members.len() as f64, "average of {}", team.name);
            }
        }
    }
}

//! Roster store
//!
//! Owns the authoritative roster state. Every mutation goes through
//! [`RosterStore::dispatch`], which either applies a command completely or
//! rejects it before touching anything, then notifies subscribers in
//! registration order.

use std::sync::Arc;

use chrono::Utc;
use shared::{
    process_debug, Archive, Balance, BalancerOptions, Players, Pool, ProcessId, ReservedPlayers, Results, Role,
    Stats, Team, Teams,
};
use uuid::Uuid;

use super::archive;
use super::assignment::{captain_candidates, squire_candidates};
use super::commands::RosterCommand;
use super::stats::{member_for, refresh_team};
use crate::config::{RosterConfig, DEFAULT_TEAM_SIZE};
use crate::error::{RosterError, RosterResult};

/// Player currently open for editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditCursor {
    pub uuid: Uuid,
    pub pool: Pool,
}

/// Complete roster state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterState {
    pub players: Players,
    /// Shadow pool edited alongside the active roster
    pub backup: Players,
    pub reserved_players: ReservedPlayers,
    pub teams: Teams,
    pub archive: Archive,
    pub results: Results,
    pub balancer_options: BalancerOptions,
    pub edit_player: Option<EditCursor>,
    pub show_backup: bool,
}

impl RosterState {
    pub fn pool(&self, pool: Pool) -> &Players {
        match pool {
            Pool::Players => &self.players,
            Pool::Backup => &self.backup,
        }
    }

    pub fn pool_mut(&mut self, pool: Pool) -> &mut Players {
        match pool {
            Pool::Players => &mut self.players,
            Pool::Backup => &mut self.backup,
        }
    }

    pub fn team(&self, uuid: &Uuid) -> Option<&Team> {
        self.teams.iter().find(|team| &team.uuid == uuid)
    }

    pub fn is_reserved(&self, uuid: &Uuid) -> bool {
        self.reserved_players.contains(uuid)
    }

    /// Whether `uuid` is a member of any team
    pub fn is_on_team(&self, uuid: &Uuid) -> bool {
        self.teams.iter().any(|team| team.has_member(uuid))
    }

    fn team_index(&self, uuid: &Uuid) -> RosterResult<usize> {
        self.teams
            .iter()
            .position(|team| &team.uuid == uuid)
            .ok_or(RosterError::TeamNotFound { uuid: *uuid })
    }

    fn remove_from_reserve(&mut self, uuid: &Uuid) {
        self.reserved_players.retain(|id| id != uuid);
    }

    fn push_to_reserve(&mut self, uuid: Uuid) {
        if !self.is_reserved(&uuid) {
            self.reserved_players.push(uuid);
        }
    }

    /// Remove `uuid` from every team, refreshing the stats of teams it left
    fn detach_from_teams(&mut self, uuid: &Uuid) {
        for team in self.teams.iter_mut().filter(|team| team.has_member(uuid)) {
            team.members.retain(|member| &member.uuid != uuid);
            refresh_team(team);
        }
    }
}

/// Callback run after every successful dispatch
pub type Subscriber = Box<dyn FnMut(&RosterCommand, &RosterState) + Send>;

/// Store shared between tasks
pub type SharedRosterStore = Arc<tokio::sync::Mutex<RosterStore>>;

pub struct RosterStore {
    state: RosterState,
    team_size: usize,
    subscribers: Vec<Subscriber>,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::with_team_size(DEFAULT_TEAM_SIZE)
    }
}

impl RosterStore {
    pub fn new(config: &RosterConfig) -> Self {
        Self::with_team_size(config.team_size)
    }

    pub fn with_team_size(team_size: usize) -> Self {
        Self {
            state: RosterState::default(),
            team_size,
            subscribers: Vec::new(),
        }
    }

    pub fn into_shared(self) -> SharedRosterStore {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn team_size(&self) -> usize {
        self.team_size
    }

    /// Replace the whole state without notifying subscribers (rehydration)
    pub fn replace_state(&mut self, state: RosterState) {
        self.state = state;
    }

    /// Register a callback for every later successful dispatch
    pub fn subscribe<F>(&mut self, subscriber: F)
    where
        F: FnMut(&RosterCommand, &RosterState) + Send + 'static,
    {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Apply `command` and notify subscribers
    pub fn dispatch(&mut self, command: RosterCommand) -> RosterResult<()> {
        self.apply(&command)?;

        for subscriber in self.subscribers.iter_mut() {
            subscriber(&command, &self.state);
        }
        Ok(())
    }

    fn apply(&mut self, command: &RosterCommand) -> RosterResult<()> {
        match command {
            RosterCommand::AddPlayer { player, pool } => {
                self.state.pool_mut(*pool).insert(player.uuid(), player.clone());
            }
            RosterCommand::AddPlayers { players, pool } => {
                let target = self.state.pool_mut(*pool);
                for (uuid, player) in players {
                    target.insert(*uuid, player.clone());
                }
            }
            RosterCommand::DeletePlayer { uuid, pool } => self.delete_player(uuid, *pool),
            RosterCommand::DeleteAllPlayers { pool } => self.delete_all_players(*pool),
            RosterCommand::ImportPlayers { players, pool } => self.import_players(players, *pool),
            RosterCommand::UpdateStats { uuid, stats, pool } => self.update_stats(uuid, stats, *pool),
            RosterCommand::EditRank { uuid, role, rank } => self.edit_rank(uuid, *role, *rank)?,

            RosterCommand::AssignCaptains { min_threshold } => {
                for uuid in captain_candidates(&self.state.players, *min_threshold, self.team_size) {
                    if let Some(player) = self.state.players.get_mut(&uuid) {
                        player.identity.is_captain = true;
                    }
                }
            }
            RosterCommand::AssignSquires { max_threshold } => {
                for uuid in squire_candidates(&self.state.players, *max_threshold, self.team_size) {
                    if let Some(player) = self.state.players.get_mut(&uuid) {
                        player.identity.is_squire = true;
                    }
                }
            }
            RosterCommand::ClearCaptains => self.clear_extra(true, false),
            RosterCommand::ClearSquires => self.clear_extra(false, true),
            RosterCommand::ClearAllExtra => self.clear_extra(true, true),

            RosterCommand::AddTeam { team } => self.add_team(team.clone()),
            RosterCommand::AddTeams { teams } => {
                self.state.teams.clear();
                for team in teams {
                    self.add_team(team.clone());
                }
            }
            RosterCommand::RemoveTeam { uuid } => self.remove_team(uuid)?,
            RosterCommand::RenameTeam { uuid, name } => {
                let index = self.state.team_index(uuid)?;
                self.state.teams[index].name = name.clone();
            }
            RosterCommand::AddTeamMember { team, player, role } => self.add_team_member(team, player, *role)?,
            RosterCommand::RemoveTeamMember { team, player } => self.remove_team_member(team, player)?,

            RosterCommand::ReservePlayers { players } => {
                let mut reserve = ReservedPlayers::new();
                for uuid in players {
                    if !reserve.contains(uuid) && !self.state.is_on_team(uuid) {
                        reserve.push(*uuid);
                    }
                }
                self.state.reserved_players = reserve;
            }
            RosterCommand::AddToReserve { uuid } => {
                if !self.state.is_reserved(uuid) {
                    self.state.detach_from_teams(uuid);
                    self.state.reserved_players.push(*uuid);
                }
            }
            RosterCommand::RemoveFromReserve { uuid } => self.state.remove_from_reserve(uuid),

            RosterCommand::SetEditCursor { uuid, pool } => {
                self.state.edit_player = Some(EditCursor {
                    uuid: *uuid,
                    pool: *pool,
                });
            }
            RosterCommand::ClearEditCursor => self.clear_edit_cursor(),
            RosterCommand::SetBalancerOptions { options } => self.state.balancer_options = options.clone(),
            RosterCommand::SetResults { results } => self.state.results = results.clone(),
            RosterCommand::ApplyBalance { balance } => self.apply_balance(balance),
            RosterCommand::SetShowBackup { show } => self.state.show_backup = *show,

            RosterCommand::SaveSnapshot { name } => archive::save(&mut self.state, name.clone(), Utc::now()),
            RosterCommand::RestoreSnapshot { index } => archive::restore(&mut self.state, *index)?,
            RosterCommand::RemoveSnapshot { index } => archive::remove(&mut self.state, *index)?,
            RosterCommand::RenameSnapshot { index, name } => archive::rename(&mut self.state, *index, name.clone())?,
        }
        Ok(())
    }

    fn delete_player(&mut self, uuid: &Uuid, pool: Pool) {
        self.state.pool_mut(pool).shift_remove(uuid);
        if pool == Pool::Players {
            self.state.remove_from_reserve(uuid);
            self.state.detach_from_teams(uuid);
        }
    }

    fn delete_all_players(&mut self, pool: Pool) {
        self.state.pool_mut(pool).clear();
        if pool == Pool::Players {
            self.state.reserved_players.clear();
            for team in self.state.teams.iter_mut() {
                team.members.clear();
                refresh_team(team);
            }
        }
    }

    /// Imported players come first; on a uuid collision the existing player wins
    fn import_players(&mut self, imported: &Players, pool: Pool) {
        let existing = std::mem::take(self.state.pool_mut(pool));
        let mut merged = Players::with_capacity(imported.len() + existing.len());

        for (uuid, player) in imported {
            merged.insert(*uuid, player.clone());
        }
        for (uuid, player) in existing {
            merged.insert(uuid, player);
        }
        *self.state.pool_mut(pool) = merged;
    }

    fn update_stats(&mut self, uuid: &Uuid, stats: &Stats, pool: Pool) {
        match self.state.pool_mut(pool).get_mut(uuid) {
            Some(player) => player.stats = stats.clone(),
            None => process_debug!(ProcessId::current(), "Ignoring stats update for unknown player {} in {}", uuid, pool),
        }
    }

    fn edit_rank(&mut self, uuid: &Uuid, role: Role, rank: u32) -> RosterResult<()> {
        let player = self
            .state
            .players
            .get_mut(uuid)
            .ok_or(RosterError::PlayerNotFound { uuid: *uuid })?;
        player.stats.classes.get_mut(role).rank = rank;

        if let Some(shadow) = self.state.backup.get_mut(uuid) {
            shadow.stats.classes.get_mut(role).rank = rank;
        }
        Ok(())
    }

    fn clear_extra(&mut self, captains: bool, squires: bool) {
        for player in self.state.players.values_mut() {
            if captains {
                player.identity.is_captain = false;
            }
            if squires {
                player.identity.is_squire = false;
            }
        }
    }

    fn add_team(&mut self, mut team: Team) {
        for member in &team.members {
            self.state.remove_from_reserve(&member.uuid);
            self.state.detach_from_teams(&member.uuid);
        }
        refresh_team(&mut team);
        self.state.teams.push(team);
    }

    /// Members go back to the reserve, except when the last team is removed:
    /// then the reserve is cleared.
    fn remove_team(&mut self, uuid: &Uuid) -> RosterResult<()> {
        let index = self.state.team_index(uuid)?;
        let team = self.state.teams.remove(index);

        if self.state.teams.is_empty() {
            self.state.reserved_players.clear();
        } else {
            for member in team.members {
                self.state.push_to_reserve(member.uuid);
            }
        }
        Ok(())
    }

    fn add_team_member(&mut self, team: &Uuid, player: &Uuid, role: Role) -> RosterResult<()> {
        let index = self.state.team_index(team)?;
        let member = self
            .state
            .players
            .get(player)
            .map(|found| member_for(found, role))
            .ok_or(RosterError::PlayerNotFound { uuid: *player })?;

        self.state.remove_from_reserve(player);
        self.state.detach_from_teams(player);

        let target = &mut self.state.teams[index];
        target.members.push(member);
        refresh_team(target);
        Ok(())
    }

    fn remove_team_member(&mut self, team: &Uuid, player: &Uuid) -> RosterResult<()> {
        let index = self.state.team_index(team)?;
        let target = &mut self.state.teams[index];
        if !target.has_member(player) {
            return Err(RosterError::PlayerNotFound { uuid: *player });
        }

        target.members.retain(|member| &member.uuid != player);
        refresh_team(target);
        self.state.push_to_reserve(*player);
        Ok(())
    }

    /// On leaving the editor, copy the edited identity to the counterpart pool
    fn clear_edit_cursor(&mut self) {
        if let Some(cursor) = self.state.edit_player.take() {
            let identity = self
                .state
                .pool(cursor.pool)
                .get(&cursor.uuid)
                .map(|player| player.identity.clone());

            if let (Some(identity), Some(counterpart)) =
                (identity, self.state.pool_mut(cursor.pool.other()).get_mut(&cursor.uuid))
            {
                counterpart.identity = identity;
            }
        }
    }

    fn apply_balance(&mut self, balance: &Balance) {
        self.state.teams = balance.teams.clone();
        for team in self.state.teams.iter_mut() {
            refresh_team(team);
        }

        let mut reserve = ReservedPlayers::new();
        for leftover in &balance.leftovers {
            if !reserve.contains(&leftover.uuid) && !self.state.is_on_team(&leftover.uuid) {
                reserve.push(leftover.uuid);
            }
        }
        self.state.reserved_players = reserve;
    }
}

impl std::fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStore")
            .field("state", &self.state)
            .field("team_size", &self.team_size)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

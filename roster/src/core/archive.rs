//! Archive snapshots of the live roster

use chrono::{DateTime, Utc};
use shared::ArchiveEntry;

use super::store::RosterState;
use crate::error::{RosterError, RosterResult};

/// Name given to a snapshot saved without one
pub fn default_name(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Deep copy of the live teams, players, reserve and backup
pub fn capture(state: &RosterState, name: Option<String>, date: DateTime<Utc>) -> ArchiveEntry {
    ArchiveEntry {
        name: name.unwrap_or_else(|| default_name(&date)),
        date,
        teams: state.teams.clone(),
        players: state.players.clone(),
        reserved_players: state.reserved_players.clone(),
        backup: Some(state.backup.clone()),
    }
}

fn entry(state: &RosterState, index: usize) -> RosterResult<&ArchiveEntry> {
    state.archive.get(index).ok_or(RosterError::ArchiveEntryNotFound {
        index,
        len: state.archive.len(),
    })
}

fn check_index(state: &RosterState, index: usize) -> RosterResult<()> {
    entry(state, index).map(|_| ())
}

pub fn save(state: &mut RosterState, name: Option<String>, date: DateTime<Utc>) {
    let snapshot = capture(state, name, date);
    state.archive.push(snapshot);
}

/// Replace the live state with a fresh copy of entry `index`
pub fn restore(state: &mut RosterState, index: usize) -> RosterResult<()> {
    let snapshot = entry(state, index)?.clone();

    state.teams = snapshot.teams;
    state.players = snapshot.players;
    state.reserved_players = snapshot.reserved_players;
    if let Some(backup) = snapshot.backup {
        state.backup = backup;
    }
    Ok(())
}

pub fn remove(state: &mut RosterState, index: usize) -> RosterResult<()> {
    check_index(state, index)?;
    state.archive.remove(index);
    Ok(())
}

pub fn rename(state: &mut RosterState, index: usize, name: String) -> RosterResult<()> {
    check_index(state, index)?;
    state.archive[index].name = name;
    Ok(())
}

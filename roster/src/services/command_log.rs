//! Debug logging of applied roster commands

use shared::{process_debug, ProcessId};

use crate::core::{RosterCommand, RosterState};

/// Store subscriber logging each applied command with a state summary
pub fn command_logger() -> impl FnMut(&RosterCommand, &RosterState) + Send + 'static {
    |command: &RosterCommand, state: &RosterState| {
        process_debug!(
            ProcessId::current(),
            "📝 Applied {} ({} players, {} teams, {} reserved)",
            command.name(),
            state.players.len(),
            state.teams.len(),
            state.reserved_players.len()
        );
    }
}

//! Captain and squire quota selection

use shared::{Player, Players};
use uuid::Uuid;

use super::stats::top_rank;

/// Number of captains (or squires) a pool of `player_count` supports
pub fn quota(player_count: usize, team_size: usize) -> usize {
    player_count.checked_div(team_size).unwrap_or(0)
}

fn is_unassigned(player: &Player) -> bool {
    !player.identity.is_captain && !player.identity.is_squire
}

/// Highest rated unassigned players with top rank at least `min_threshold`
///
/// Ties keep roster insertion order.
pub fn captain_candidates(players: &Players, min_threshold: u32, team_size: usize) -> Vec<Uuid> {
    let mut eligible: Vec<(Uuid, u32)> = players
        .values()
        .filter(|player| is_unassigned(player))
        .map(|player| (player.uuid(), top_rank(player)))
        .filter(|(_, rank)| *rank >= min_threshold)
        .collect();

    eligible.sort_by(|a, b| b.1.cmp(&a.1));
    eligible
        .into_iter()
        .take(quota(players.len(), team_size))
        .map(|(uuid, _)| uuid)
        .collect()
}

/// Lowest rated unassigned players with top rank at most `max_threshold`
pub fn squire_candidates(players: &Players, max_threshold: u32, team_size: usize) -> Vec<Uuid> {
    let mut eligible: Vec<(Uuid, u32)> = players
        .values()
        .filter(|player| is_unassigned(player))
        .map(|player| (player.uuid(), top_rank(player)))
        .filter(|(_, rank)| *rank <= max_threshold)
        .collect();

    eligible.sort_by_key(|(_, rank)| *rank);
    eligible
        .into_iter()
        .take(quota(players.len(), team_size))
        .map(|(uuid, _)| uuid)
        .collect()
}

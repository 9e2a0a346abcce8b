//! Team and player rating aggregates

use shared::{ClassType, Player, Role, Team, TeamMember};

/// Active class with the lowest priority number, first in role order on ties
pub fn top_role(player: &Player) -> Option<(Role, &ClassType)> {
    player
        .stats
        .classes
        .iter()
        .filter(|(_, class)| class.is_active)
        .min_by_key(|(_, class)| class.priority)
}

/// Rank of the top role, or 0 when no class is active
pub fn top_rank(player: &Player) -> u32 {
    top_role(player).map(|(_, class)| class.rank).unwrap_or(0)
}

/// Total and average rank of `members`
///
/// The average of an empty member list is NaN.
pub fn team_stats(members: &[TeamMember]) -> (u32, f64) {
    let total: u32 = members.iter().map(|member| member.rank).sum();
    let avg = total as f64 / members.len() as f64;
    (total, avg)
}

/// Recompute `total_sr` and `avg_sr` from the current members
pub fn refresh_team(team: &mut Team) {
    let (total, avg) = team_stats(&team.members);
    team.total_sr = total;
    team.avg_sr = avg;
}

/// Team member entry for `player` playing `role`
pub fn member_for(player: &Player, role: Role) -> TeamMember {
    let class = player.stats.classes.get(role);
    TeamMember {
        uuid: player.uuid(),
        name: player.identity.name.clone(),
        rank: class.rank,
        role,
        primary: class.primary,
        secondary: class.secondary,
    }
}

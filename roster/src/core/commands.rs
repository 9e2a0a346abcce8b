//! Commands accepted by the roster store

use shared::{Balance, BalancerOptions, Player, Players, Pool, Results, Role, Stats, Team, Teams};
use uuid::Uuid;

/// Every mutation the store can apply
#[derive(Debug, Clone, PartialEq)]
pub enum RosterCommand {
    // Players
    AddPlayer { player: Player, pool: Pool },
    AddPlayers { players: Players, pool: Pool },
    DeletePlayer { uuid: Uuid, pool: Pool },
    DeleteAllPlayers { pool: Pool },
    /// Merge; players already present win
    ImportPlayers { players: Players, pool: Pool },
    UpdateStats { uuid: Uuid, stats: Stats, pool: Pool },
    EditRank { uuid: Uuid, role: Role, rank: u32 },

    // Captains and squires
    AssignCaptains { min_threshold: u32 },
    AssignSquires { max_threshold: u32 },
    ClearCaptains,
    ClearSquires,
    ClearAllExtra,

    // Teams
    AddTeam { team: Team },
    /// Replace every team
    AddTeams { teams: Teams },
    RemoveTeam { uuid: Uuid },
    RenameTeam { uuid: Uuid, name: String },
    AddTeamMember { team: Uuid, player: Uuid, role: Role },
    RemoveTeamMember { team: Uuid, player: Uuid },

    // Reserve
    ReservePlayers { players: Vec<Uuid> },
    AddToReserve { uuid: Uuid },
    RemoveFromReserve { uuid: Uuid },

    // Editing and options
    SetEditCursor { uuid: Uuid, pool: Pool },
    ClearEditCursor,
    SetBalancerOptions { options: BalancerOptions },
    SetResults { results: Results },
    ApplyBalance { balance: Balance },
    SetShowBackup { show: bool },

    // Archive
    SaveSnapshot { name: Option<String> },
    RestoreSnapshot { index: usize },
    RemoveSnapshot { index: usize },
    RenameSnapshot { index: usize, name: String },
}

impl RosterCommand {
    /// Stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            RosterCommand::AddPlayer { .. } => "add_player",
            RosterCommand::AddPlayers { .. } => "add_players",
            RosterCommand::DeletePlayer { .. } => "delete_player",
            RosterCommand::DeleteAllPlayers { .. } => "delete_all_players",
            RosterCommand::ImportPlayers { .. } => "import_players",
            RosterCommand::UpdateStats { .. } => "update_stats",
            RosterCommand::EditRank { .. } => "edit_rank",
            RosterCommand::AssignCaptains { .. } => "assign_captains",
            RosterCommand::AssignSquires { .. } => "assign_squires",
            RosterCommand::ClearCaptains => "clear_captains",
            RosterCommand::ClearSquires => "clear_squires",
            RosterCommand::ClearAllExtra => "clear_all_extra",
            RosterCommand::AddTeam { .. } => "add_team",
            RosterCommand::AddTeams { .. } => "add_teams",
            RosterCommand::RemoveTeam { .. } => "remove_team",
            RosterCommand::RenameTeam { .. } => "rename_team",
            RosterCommand::AddTeamMember { .. } => "add_team_member",
            RosterCommand::RemoveTeamMember { .. } => "remove_team_member",
            RosterCommand::ReservePlayers { .. } => "reserve_players",
            RosterCommand::AddToReserve { .. } => "add_to_reserve",
            RosterCommand::RemoveFromReserve { .. } => "remove_from_reserve",
            RosterCommand::SetEditCursor { .. } => "set_edit_cursor",
            RosterCommand::ClearEditCursor => "clear_edit_cursor",
            RosterCommand::SetBalancerOptions { .. } => "set_balancer_options",
            RosterCommand::SetResults { .. } => "set_results",
            RosterCommand::ApplyBalance { .. } => "apply_balance",
            RosterCommand::SetShowBackup { .. } => "set_show_backup",
            RosterCommand::SaveSnapshot { .. } => "save_snapshot",
            RosterCommand::RestoreSnapshot { .. } => "restore_snapshot",
            RosterCommand::RemoveSnapshot { .. } => "remove_snapshot",
            RosterCommand::RenameSnapshot { .. } => "rename_snapshot",
        }
    }

    /// Whether the command changes anything that is persisted
    pub fn is_persistent(&self) -> bool {
        !matches!(
            self,
            RosterCommand::SetEditCursor { .. } | RosterCommand::SetResults { .. }
        )
    }
}

//! Main entry point for the roster binary
//!
//! Loads the persisted roster, applies one command to it and writes it back.
//! The `balance` command hands the roster to an external balancing engine
//! through the offload orchestrator.

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use balancer::{CommandEngine, OffloadOrchestrator, ProgressBus};
use roster::core::stats::top_rank;
use roster::services::{command_logger, PersistenceBridge, RealFileStorage};
use roster::{RosterCommand, RosterConfig, RosterState, RosterStore};
use shared::{logging, process_debug, process_info, Player, Players, Pool, ProcessId, Role, Team};

/// Team roster manager with offloaded balancing
#[derive(Parser)]
#[command(name = "roster")]
#[command(about = "Manage players, teams and balancing runs")]
pub struct Args {
    /// Directory holding the roster document
    #[arg(long, env = "ROSTER_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// Players per team, used for captain and squire quotas
    #[arg(long, env = "ROSTER_TEAM_SIZE", default_value = "6")]
    pub team_size: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// External balancing engine command line
    #[arg(long, env = "ROSTER_ENGINE_CMD")]
    pub engine_cmd: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs)]
pub struct PoolArg {
    /// Operate on the backup pool instead of the active roster
    #[arg(long)]
    pub backup: bool,
}

impl PoolArg {
    fn pool(&self) -> Pool {
        if self.backup {
            Pool::Backup
        } else {
            Pool::Players
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Show players, teams and the reserve
    List {
        #[command(flatten)]
        pool: PoolArg,
    },
    /// Add a player; roles are `role:rank`, first one is the main role
    AddPlayer {
        name: String,
        #[arg(long = "role", value_parser = parse_role_rank)]
        roles: Vec<(Role, u32)>,
        #[command(flatten)]
        pool: PoolArg,
    },
    /// Merge players from a JSON file; existing players win
    Import {
        file: PathBuf,
        #[command(flatten)]
        pool: PoolArg,
    },
    /// Delete one player, or every player with --all
    DeletePlayer {
        uuid: Option<Uuid>,
        #[arg(long, conflicts_with = "uuid")]
        all: bool,
        #[command(flatten)]
        pool: PoolArg,
    },
    /// Set one role's rank
    EditRank { uuid: Uuid, role: Role, rank: u32 },
    /// Mark captains among players ranked at least `min`
    Captains {
        #[arg(long)]
        min: u32,
    },
    /// Mark squires among players ranked at most `max`
    Squires {
        #[arg(long)]
        max: u32,
    },
    /// Clear captain and/or squire marks
    ClearExtra {
        #[arg(long)]
        captains: bool,
        #[arg(long)]
        squires: bool,
    },
    /// Create an empty team
    AddTeam { name: String },
    /// Remove a team, returning its members to the reserve
    RemoveTeam { uuid: Uuid },
    /// Manage archive snapshots
    #[command(subcommand)]
    Archive(ArchiveCommand),
    /// Run the external engine and apply the best balance
    Balance {
        /// Store the results without applying them
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum ArchiveCommand {
    Save {
        #[arg(long)]
        name: Option<String>,
    },
    Restore { index: usize },
    Remove { index: usize },
    Rename { index: usize, name: String },
    List,
}

fn parse_role_rank(value: &str) -> Result<(Role, u32), String> {
    let (role, rank) = value
        .split_once(':')
        .ok_or_else(|| format!("expected role:rank, got '{value}'"))?;
    let role = role.parse::<Role>().map_err(|e| e.to_string())?;
    let rank = rank.parse::<u32>().map_err(|e| format!("invalid rank '{rank}': {e}"))?;
    Ok((role, rank))
}

impl From<&Args> for RosterConfig {
    fn from(args: &Args) -> Self {
        RosterConfig {
            data_dir: args.data_dir.clone(),
            team_size: args.team_size,
            log_level: args.log_level.clone(),
            engine_cmd: args.engine_cmd.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // Initialize process ID singleton and tracing
    ProcessId::init_roster();
    logging::init_tracing_with_level(Some(&args.log_level));

    let config = RosterConfig::from(&args);
    config.validate()?;
    logging::log_startup(ProcessId::current(), "roster");
    process_debug!(
        ProcessId::current(),
        "Data dir: {}, team size: {}",
        config.data_dir.display(),
        config.team_size
    );

    let bridge = PersistenceBridge::new(RealFileStorage::new(config.data_dir.clone()));
    let mut store = RosterStore::new(&config);
    bridge.hydrate(&mut store).await.context("loading roster")?;
    store.subscribe(command_logger());
    let writer = bridge.attach(&mut store);

    let outcome = run(args.command, &config, &mut store).await;

    // Dropping the store closes the writer's queue
    drop(store);
    writer.finish().await.context("saving roster")?;

    match &outcome {
        Ok(()) => logging::log_shutdown(ProcessId::current(), "command complete"),
        Err(e) => logging::log_error(ProcessId::current(), "Roster command", e),
    }
    outcome
}

async fn run(command: Command, config: &RosterConfig, store: &mut RosterStore) -> anyhow::Result<()> {
    match command {
        Command::List { pool } => print_state(store.state(), pool.pool()),
        Command::AddPlayer { name, roles, pool } => {
            let mut player = Player::new(name);
            for (priority, (role, rank)) in roles.into_iter().enumerate() {
                player = player.with_role(role, rank, priority as u8);
            }
            println!("{}", player.uuid());
            store.dispatch(RosterCommand::AddPlayer {
                player,
                pool: pool.pool(),
            })?;
        }
        Command::Import { file, pool } => {
            let blob = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let players: Players = serde_json::from_str(&blob).context("parsing players")?;
            let count = players.len();
            store.dispatch(RosterCommand::ImportPlayers {
                players,
                pool: pool.pool(),
            })?;
            logging::log_success(ProcessId::current(), &format!("Imported {count} players"));
        }
        Command::DeletePlayer { uuid, all, pool } => match (uuid, all) {
            (_, true) => store.dispatch(RosterCommand::DeleteAllPlayers { pool: pool.pool() })?,
            (Some(uuid), false) => store.dispatch(RosterCommand::DeletePlayer {
                uuid,
                pool: pool.pool(),
            })?,
            (None, false) => anyhow::bail!("pass a player uuid or --all"),
        },
        Command::EditRank { uuid, role, rank } => store.dispatch(RosterCommand::EditRank { uuid, role, rank })?,
        Command::Captains { min } => store.dispatch(RosterCommand::AssignCaptains { min_threshold: min })?,
        Command::Squires { max } => store.dispatch(RosterCommand::AssignSquires { max_threshold: max })?,
        Command::ClearExtra { captains, squires } => {
            let command = match (captains, squires) {
                (true, false) => RosterCommand::ClearCaptains,
                (false, true) => RosterCommand::ClearSquires,
                _ => RosterCommand::ClearAllExtra,
            };
            store.dispatch(command)?;
        }
        Command::AddTeam { name } => {
            let team = Team::new(name);
            println!("{}", team.uuid);
            store.dispatch(RosterCommand::AddTeam { team })?;
        }
        Command::RemoveTeam { uuid } => store.dispatch(RosterCommand::RemoveTeam { uuid })?,
        Command::Archive(command) => run_archive(command, store)?,
        Command::Balance { dry_run } => balance(config, store, dry_run).await?,
    }
    Ok(())
}

fn run_archive(command: ArchiveCommand, store: &mut RosterStore) -> anyhow::Result<()> {
    match command {
        ArchiveCommand::Save { name } => store.dispatch(RosterCommand::SaveSnapshot { name })?,
        ArchiveCommand::Restore { index } => store.dispatch(RosterCommand::RestoreSnapshot { index })?,
        ArchiveCommand::Remove { index } => store.dispatch(RosterCommand::RemoveSnapshot { index })?,
        ArchiveCommand::Rename { index, name } => store.dispatch(RosterCommand::RenameSnapshot { index, name })?,
        ArchiveCommand::List => {
            for (index, entry) in store.state().archive.iter().enumerate() {
                println!(
                    "{index:>3}  {}  {} players, {} teams  ({})",
                    entry.name,
                    entry.players.len(),
                    entry.teams.len(),
                    entry.date.to_rfc3339()
                );
            }
        }
    }
    Ok(())
}

async fn balance(config: &RosterConfig, store: &mut RosterStore, dry_run: bool) -> anyhow::Result<()> {
    let engine = CommandEngine::from_command_line(config.require_engine_cmd()?)?;
    let bus = Arc::new(ProgressBus::new());
    let mut progress = bus.subscribe();
    let progress_id = progress.id();
    let orchestrator = OffloadOrchestrator::new(engine, bus);

    let relay = tokio::spawn(async move {
        while let Some(event) = progress.recv().await {
            process_info!(ProcessId::current(), "⏳ {}", event.message());
        }
    });

    orchestrator.test().await.context("engine readiness")?;
    let state = store.state();
    let results = orchestrator
        .full_balance(&state.players, &state.balancer_options)
        .await
        .context("balancing")?;

    // Unsubscribing ends the relay once it has drained delivered events
    orchestrator.progress_bus().unsubscribe(progress_id);
    let _ = relay.await;

    let best = results.first().cloned();
    store.dispatch(RosterCommand::SetResults { results })?;

    match best {
        Some(balance) if !dry_run => {
            logging::log_success(
                ProcessId::current(),
                &format!("Applied balance with {} teams, dispersion {}", balance.teams.len(), balance.dispersion),
            );
            store.dispatch(RosterCommand::ApplyBalance { balance })?;
        }
        Some(balance) => println!("{}", serde_json::to_string_pretty(&balance)?),
        None => anyhow::bail!("engine returned no balance"),
    }
    Ok(())
}

fn print_state(state: &RosterState, pool: Pool) {
    println!("{} ({})", pool, state.pool(pool).len());
    for player in state.pool(pool).values() {
        let mut marks = String::new();
        if player.identity.is_captain {
            marks.push_str(" [C]");
        }
        if player.identity.is_squire {
            marks.push_str(" [S]");
        }
        println!("  {}  {:<20} {:>5}{}", player.uuid(), player.identity.name, top_rank(player), marks);
    }

    for team in &state.teams {
        println!("{} {}  total {}  avg {:.1}", team.uuid, team.name, team.total_sr, team.avg_sr);
        for member in &team.members {
            println!("    {:<20} {:<8} {:>5}", member.name, member.role, member.rank);
        }
    }

    let reserve: Vec<&str> = state
        .reserved_players
        .iter()
        .filter_map(|uuid| state.players.get(uuid))
        .map(|player| player.identity.name.as_str())
        .collect();
    println!("reserve: {}", reserve.join(", "));
}

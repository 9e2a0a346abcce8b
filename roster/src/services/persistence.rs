//! Persistence bridge
//!
//! Rehydrates the store from durable storage at startup and writes the
//! persisted subset of the state after every mutation. Documents written by
//! older front ends are migrated while they are read.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use shared::logging::log_error;
use shared::{
    process_debug, process_info, AdjustSr, Archive, BalancerOptions, BezierPoint, Players, ProcessId,
    ReservedPlayers, SpecializationPoints, Teams,
};

use crate::config::STORAGE_KEY;
use crate::core::{RosterState, RosterStore};
use crate::error::{RosterError, RosterResult};
use crate::traits::StateStorage;

/// The persisted roster document
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub players: Players,
    #[serde(default)]
    pub backup: Players,
    #[serde(default)]
    pub teams: Teams,
    #[serde(default)]
    pub archive: Archive,
    #[serde(default)]
    pub reserved_players: ReservedPlayers,
    #[serde(default, deserialize_with = "migrated_options")]
    pub balancer_options: BalancerOptions,
    #[serde(default)]
    pub show_backup: bool,
}

impl PersistedState {
    /// Parse a stored document, migrating legacy option shapes
    pub fn parse(blob: &str) -> RosterResult<Self> {
        Ok(serde_json::from_str(blob)?)
    }

    pub fn into_state(self) -> RosterState {
        RosterState {
            players: self.players,
            backup: self.backup,
            reserved_players: self.reserved_players,
            teams: self.teams,
            archive: self.archive,
            balancer_options: self.balancer_options,
            show_backup: self.show_backup,
            ..RosterState::default()
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedView<'a> {
    players: &'a Players,
    backup: &'a Players,
    teams: &'a Teams,
    archive: &'a Archive,
    reserved_players: &'a ReservedPlayers,
    balancer_options: &'a BalancerOptions,
    show_backup: bool,
}

/// Serialize the persisted subset of `state`
pub fn serialize_state(state: &RosterState) -> RosterResult<String> {
    let view = PersistedView {
        players: &state.players,
        backup: &state.backup,
        teams: &state.teams,
        archive: &state.archive,
        reserved_players: &state.reserved_players,
        balancer_options: &state.balancer_options,
        show_backup: state.show_backup,
    };
    Ok(serde_json::to_string(&view)?)
}

// Legacy shapes of `adjustSr`

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredAdjustSr {
    /// One curve for every role
    Curve(Vec<BezierPoint>),
    Roles(StoredRoles),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRoles {
    #[serde(default)]
    is_enabled: bool,
    tank: Option<StoredCurves>,
    support: Option<StoredCurves>,
    dps: Option<StoredCurves>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCurves {
    Specialized(SpecializationPoints),
    /// One curve for every specialization
    Curve(Vec<BezierPoint>),
    /// Numeric offset from before curves existed
    Legacy(serde_json::Number),
}

fn migrate_curves(stored: Option<StoredCurves>) -> SpecializationPoints {
    match stored {
        Some(StoredCurves::Specialized(points)) => points,
        Some(StoredCurves::Curve(points)) => SpecializationPoints::uniform(points),
        Some(StoredCurves::Legacy(_)) | None => SpecializationPoints::default(),
    }
}

impl StoredAdjustSr {
    fn migrate(self) -> AdjustSr {
        match self {
            StoredAdjustSr::Curve(points) => AdjustSr {
                is_enabled: false,
                tank: SpecializationPoints::uniform(points.clone()),
                support: SpecializationPoints::uniform(points.clone()),
                dps: SpecializationPoints::uniform(points),
            },
            StoredAdjustSr::Roles(roles) => AdjustSr {
                is_enabled: roles.is_enabled,
                tank: migrate_curves(roles.tank),
                support: migrate_curves(roles.support),
                dps: migrate_curves(roles.dps),
            },
        }
    }
}

/// Balancer options from a raw stored value; missing fields take defaults
///
/// An `adjustSr` matching none of the known shapes is an error.
pub fn migrate_options(mut raw: Value) -> Result<BalancerOptions, serde_json::Error> {
    if raw.is_null() {
        return Ok(BalancerOptions::default());
    }

    let legacy = raw
        .as_object_mut()
        .and_then(|fields| fields.remove("adjustSr"))
        .filter(|value| !value.is_null());
    let mut options: BalancerOptions = serde_json::from_value(raw)?;
    if let Some(legacy) = legacy {
        options.adjust_sr = serde_json::from_value::<StoredAdjustSr>(legacy)?.migrate();
    }
    Ok(options)
}

fn migrated_options<'de, D>(deserializer: D) -> Result<BalancerOptions, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    migrate_options(raw).map_err(serde::de::Error::custom)
}

/// Connects a [`RosterStore`] to a [`StateStorage`]
pub struct PersistenceBridge<S: StateStorage + 'static> {
    storage: Arc<S>,
    key: String,
}

impl<S: StateStorage + 'static> PersistenceBridge<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Use a different storage key (fluent API)
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored document into `store`
    ///
    /// # Returns
    /// Whether a document was found; an empty store is left as is otherwise
    pub async fn hydrate(&self, store: &mut RosterStore) -> RosterResult<bool> {
        let Some(blob) = self.storage.load(&self.key).await? else {
            process_info!(ProcessId::current(), "🆕 No saved roster under '{}', starting empty", self.key);
            return Ok(false);
        };

        let state = PersistedState::parse(&blob)?.into_state();
        process_info!(
            ProcessId::current(),
            "📂 Restored roster: {} players, {} teams, {} archive entries",
            state.players.len(),
            state.teams.len(),
            state.archive.len()
        );
        store.replace_state(state);
        Ok(true)
    }

    /// Write `state` immediately
    pub async fn persist(&self, state: &RosterState) -> RosterResult<()> {
        self.storage.save(&self.key, &serialize_state(state)?).await
    }

    /// Subscribe to `store` so every persistent mutation is written
    ///
    /// Serialization happens synchronously inside the dispatch; the write
    /// itself runs on a background task that coalesces queued snapshots.
    pub fn attach(&self, store: &mut RosterStore) -> PersistenceWriter {
        let (tx, rx) = mpsc::unbounded_channel();

        store.subscribe(move |command, state| {
            if !command.is_persistent() {
                return;
            }
            match serialize_state(state) {
                Ok(blob) => {
                    let _ = tx.send(blob);
                }
                Err(e) => log_error(ProcessId::current(), "Roster serialization", &e),
            }
        });

        let handle = tokio::spawn(write_snapshots(self.storage.clone(), self.key.clone(), rx));
        PersistenceWriter { handle }
    }
}

async fn write_snapshots<S: StateStorage>(
    storage: Arc<S>,
    key: String,
    mut snapshots: mpsc::UnboundedReceiver<String>,
) -> RosterResult<usize> {
    let mut writes = 0;
    let mut first_error = None;

    while let Some(mut blob) = snapshots.recv().await {
        // Only the newest queued snapshot matters
        while let Ok(newer) = snapshots.try_recv() {
            blob = newer;
        }

        match storage.save(&key, &blob).await {
            Ok(()) => writes += 1,
            Err(e) => {
                log_error(ProcessId::current(), "Roster save", &e);
                first_error.get_or_insert(e);
            }
        }
    }

    process_debug!(ProcessId::current(), "💾 Persistence writer finished after {} writes", writes);
    match first_error {
        Some(e) => Err(e),
        None => Ok(writes),
    }
}

/// Background writer started by [`PersistenceBridge::attach`]
#[derive(Debug)]
pub struct PersistenceWriter {
    handle: JoinHandle<RosterResult<usize>>,
}

impl PersistenceWriter {
    /// Wait until every queued snapshot is written
    ///
    /// The writer stops once the store it is attached to has been dropped.
    /// Returns the number of writes, or the first write error.
    pub async fn finish(self) -> RosterResult<usize> {
        self.handle.await.map_err(|e| RosterError::StorageError {
            operation: "persistence writer".to_string(),
            path: String::new(),
            message: e.to_string(),
        })?
    }
}

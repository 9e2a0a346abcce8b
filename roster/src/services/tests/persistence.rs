//! Tests for the persistence bridge and legacy document migration

use serde_json::json;
use std::sync::{Arc, Mutex};

use shared::{BezierPoint, Player, Pool, SpecializationPoints, Team};

use super::common::populated_store;
use crate::core::{RosterCommand, RosterStore};
use crate::services::persistence::{migrate_options, serialize_state, PersistedState, PersistenceBridge};
use crate::traits::MockStateStorage;

fn curve(y: f64) -> serde_json::Value {
    json!([
        { "position": { "x": 0.0, "y": y }, "control": { "x": 0.1, "y": 1.0 } },
        { "position": { "x": 1.0, "y": y }, "control": { "x": 0.1, "y": 1.0 } }
    ])
}

fn parsed_curve(y: f64) -> Vec<BezierPoint> {
    serde_json::from_value(curve(y)).unwrap()
}

/// Storage mock recording every saved blob
fn recording_storage() -> (MockStateStorage, Arc<Mutex<Vec<String>>>) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let sink = saved.clone();
    let mut storage = MockStateStorage::new();
    storage.expect_save().returning(move |_, blob| {
        sink.lock().unwrap().push(blob.to_string());
        Ok(())
    });
    (storage, saved)
}

#[test]
fn test_bare_array_role_curve_becomes_specialized() {
    let raw = json!({ "adjustSr": { "isEnabled": true, "tank": curve(0.3) } });

    let options = migrate_options(raw).unwrap();

    assert!(options.adjust_sr.is_enabled);
    assert_eq!(options.adjust_sr.tank, SpecializationPoints::uniform(parsed_curve(0.3)));
    assert_eq!(options.adjust_sr.dps, SpecializationPoints::default());
}

#[test]
fn test_bare_array_adjust_sr_applies_to_every_role() {
    let raw = json!({ "range": 30, "adjustSr": curve(0.5) });

    let options = migrate_options(raw).unwrap();

    assert_eq!(options.range, 30);
    assert!(!options.adjust_sr.is_enabled);
    for role in [&options.adjust_sr.tank, &options.adjust_sr.support, &options.adjust_sr.dps] {
        assert_eq!(role, &SpecializationPoints::uniform(parsed_curve(0.5)));
    }
}

#[test]
fn test_scalar_role_values_become_default_curves() {
    let raw = json!({ "adjustSr": { "tank": 100, "support": 0, "dps": -50 } });

    let options = migrate_options(raw).unwrap();

    assert!(!options.adjust_sr.is_enabled);
    assert_eq!(options.adjust_sr.tank, SpecializationPoints::default());
    assert_eq!(options.adjust_sr.support, SpecializationPoints::default());
}

#[test]
fn test_unrecognized_adjust_sr_is_rejected() {
    let garbage = [
        json!({ "adjustSr": "definitely not a curve" }),
        json!({ "adjustSr": { "isEnabled": true, "tank": { "any": "oops" } } }),
        json!({ "adjustSr": { "dps": "fast" } }),
    ];

    for raw in garbage {
        assert!(migrate_options(raw.clone()).is_err(), "accepted {raw}");
    }
}

#[test]
fn test_document_with_unrecognized_adjust_sr_fails_to_parse() {
    let document = json!({ "players": {}, "balancerOptions": { "range": 25, "adjustSr": 42 } });

    assert!(PersistedState::parse(&document.to_string()).is_err());
}

#[test]
fn test_null_adjust_sr_uses_default_curves() {
    let options = migrate_options(json!({ "range": 25, "adjustSr": null })).unwrap();

    assert_eq!(options.range, 25);
    assert_eq!(options.adjust_sr, shared::AdjustSr::default());
}

#[test]
fn test_migration_is_idempotent() {
    let raw = json!({ "adjustSr": { "tank": curve(0.2), "support": 7 } });

    let once = migrate_options(raw).unwrap();
    let twice = migrate_options(serde_json::to_value(&once).unwrap()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_empty_document_uses_defaults() {
    let state = PersistedState::parse("{}").unwrap().into_state();

    assert!(state.players.is_empty());
    assert!(state.teams.is_empty());
    assert_eq!(state.balancer_options.range, 20);
    assert!(!state.show_backup);
}

#[test]
fn test_legacy_player_fields_are_ignored() {
    let player = Player::new("Torbjorn");
    let uuid = player.uuid();
    let mut value = serde_json::to_value(&player).unwrap();
    value["stats"]["playHours"] = json!(120);
    let mut players = serde_json::Map::new();
    players.insert(uuid.to_string(), value);
    let document = json!({ "players": players, "balancerOptions": null });

    let state = PersistedState::parse(&document.to_string()).unwrap().into_state();

    assert_eq!(state.players[&uuid].identity.name, "Torbjorn");
}

#[test]
fn test_serialized_state_round_trips_with_nan_average() {
    let mut store = populated_store(2);
    store
        .dispatch(RosterCommand::AddTeam {
            team: Team::new("Empty"),
        })
        .unwrap();

    let blob = serialize_state(store.state()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let restored = PersistedState::parse(&blob).unwrap().into_state();

    assert!(document["teams"][0]["avgSr"].is_null());
    assert!(restored.teams[0].avg_sr.is_nan());
    assert_eq!(restored.players, store.state().players);
    assert!(document.get("results").is_none());
}

#[test]
fn test_player_order_survives_round_trip() {
    let store = populated_store(5);

    let blob = serialize_state(store.state()).unwrap();
    let restored = PersistedState::parse(&blob).unwrap().into_state();

    let before: Vec<_> = store.state().players.keys().collect();
    let after: Vec<_> = restored.players.keys().collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_hydrate_without_document_keeps_store_empty() {
    let mut storage = MockStateStorage::new();
    storage
        .expect_load()
        .withf(|key| key == "owbalancer")
        .times(1)
        .returning(|_| Ok(None));
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();

    assert!(!bridge.hydrate(&mut store).await.unwrap());
    assert!(store.state().players.is_empty());
}

#[tokio::test]
async fn test_hydrate_restores_and_migrates() {
    let source = populated_store(3);
    let mut document: serde_json::Value = serde_json::from_str(&serialize_state(source.state()).unwrap()).unwrap();
    document["balancerOptions"]["adjustSr"] = curve(0.4);
    let blob = document.to_string();

    let mut storage = MockStateStorage::new();
    storage.expect_load().returning(move |_| Ok(Some(blob.clone())));
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();

    assert!(bridge.hydrate(&mut store).await.unwrap());
    assert_eq!(store.state().players, source.state().players);
    assert_eq!(
        store.state().balancer_options.adjust_sr.support,
        SpecializationPoints::uniform(parsed_curve(0.4))
    );
}

#[tokio::test]
async fn test_hydrate_propagates_malformed_document() {
    let mut storage = MockStateStorage::new();
    storage.expect_load().returning(|_| Ok(Some("{ broken".to_string())));
    let bridge = PersistenceBridge::new(storage);

    assert!(bridge.hydrate(&mut RosterStore::default()).await.is_err());
}

#[tokio::test]
async fn test_attached_store_writes_latest_state() {
    let (storage, saved) = recording_storage();
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();
    let writer = bridge.attach(&mut store);

    for name in ["Ana", "Baptiste", "Cassidy"] {
        store
            .dispatch(RosterCommand::AddPlayer {
                player: Player::new(name),
                pool: Pool::Players,
            })
            .unwrap();
    }
    let expected = store.state().players.clone();
    drop(store);
    let writes = writer.finish().await.unwrap();

    let saved = saved.lock().unwrap();
    assert!(writes >= 1);
    assert_eq!(saved.len(), writes);
    let last = PersistedState::parse(saved.last().unwrap()).unwrap();
    assert_eq!(last.players, expected);
}

#[tokio::test]
async fn test_edit_cursor_changes_are_not_written() {
    let (storage, saved) = recording_storage();
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();
    let writer = bridge.attach(&mut store);

    store
        .dispatch(RosterCommand::SetEditCursor {
            uuid: uuid::Uuid::new_v4(),
            pool: Pool::Players,
        })
        .unwrap();
    drop(store);

    assert_eq!(writer.finish().await.unwrap(), 0);
    assert!(saved.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_leaving_the_editor_is_written() {
    let (storage, saved) = recording_storage();
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();
    let writer = bridge.attach(&mut store);

    store
        .dispatch(RosterCommand::SetEditCursor {
            uuid: uuid::Uuid::new_v4(),
            pool: Pool::Players,
        })
        .unwrap();
    store.dispatch(RosterCommand::ClearEditCursor).unwrap();
    drop(store);

    assert_eq!(writer.finish().await.unwrap(), 1);
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_persist_writes_under_custom_key() {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let sink = saved.clone();
    let mut storage = MockStateStorage::new();
    storage
        .expect_save()
        .withf(|key, _| key == "league")
        .times(1)
        .returning(move |_, blob| {
            sink.lock().unwrap().push(blob.to_string());
            Ok(())
        });
    let bridge = PersistenceBridge::new(storage).with_key("league");
    let store = populated_store(2);

    bridge.persist(store.state()).await.unwrap();

    assert_eq!(bridge.key(), "league");
    let written = PersistedState::parse(&saved.lock().unwrap()[0]).unwrap();
    assert_eq!(written.players, store.state().players);
}

#[tokio::test]
async fn test_write_failure_is_reported_by_finish() {
    let mut storage = MockStateStorage::new();
    storage
        .expect_save()
        .returning(|_, _| Err(crate::RosterError::config("disk full")));
    let bridge = PersistenceBridge::new(storage);
    let mut store = RosterStore::default();
    let writer = bridge.attach(&mut store);

    store.dispatch(RosterCommand::SetShowBackup { show: true }).unwrap();
    drop(store);

    assert!(writer.finish().await.is_err());
}

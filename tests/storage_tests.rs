// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for the JSON file state store
//!
//! Covers the durability contract: atomic replace on save, and
//! absent/corrupt records loading as a fresh default state.

use pretty_assertions::assert_eq;
use tempfile::tempdir;
use tokio_test::assert_ok;

use brewcore::{JsonStateStore, MachineState, StateStore};

fn sample_state() -> MachineState {
    let mut state = MachineState::new(2000.0, 500.0);
    state.water_container.fill(976.0).unwrap();
    state.coffee_container.fill(492.0).unwrap();
    state.total_coffees_made = 7;
    state
}

#[tokio::test]
async fn save_then_load_round_trips_exactly() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path().join("state.json"), 2000.0, 500.0);

    let state = sample_state();
    store.save(&state).await.unwrap();

    let loaded = store.load().await;
    assert_eq!(loaded, state);
    // Timestamp formatting must round-trip exactly
    assert_eq!(loaded.last_updated, state.last_updated);
}

#[tokio::test]
async fn missing_record_loads_default_state() {
    let dir = tempdir().unwrap();
    let store = JsonStateStore::new(dir.path().join("absent.json"), 2000.0, 500.0);

    let state = store.load().await;
    assert_eq!(state.water_container.capacity(), 2000.0);
    assert_eq!(state.water_container.current_amount(), 0.0);
    assert_eq!(state.coffee_container.capacity(), 500.0);
    assert_eq!(state.total_coffees_made, 0);
}

#[tokio::test]
async fn unparsable_record_loads_default_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    tokio::fs::write(&path, b"{ not json")
        .await
        .unwrap();

    let store = JsonStateStore::new(&path, 2000.0, 500.0);
    let state = store.load().await;
    assert_eq!(state.total_coffees_made, 0);
    assert_eq!(state.water_container.current_amount(), 0.0);
}

#[tokio::test]
async fn bounds_violating_record_loads_default_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let record = r#"{
        "water_container": { "capacity": 2000.0, "current_amount": 5000.0 },
        "coffee_container": { "capacity": 500.0, "current_amount": 0.0 },
        "total_coffees_made": 12,
        "last_updated": "2025-06-01T12:00:00Z"
    }"#;
    tokio::fs::write(&path, record).await.unwrap();

    let store = JsonStateStore::new(&path, 2000.0, 500.0);
    let state = store.load().await;
    assert_eq!(state.total_coffees_made, 0);
    assert_eq!(state.water_container.current_amount(), 0.0);
}

#[tokio::test]
async fn save_replaces_existing_record_and_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = JsonStateStore::new(&path, 2000.0, 500.0);

    store.save(&MachineState::new(2000.0, 500.0)).await.unwrap();
    let second = sample_state();
    store.save(&second).await.unwrap();

    assert_eq!(store.load().await, second);

    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.unwrap() {
        names.push(entry.file_name());
    }
    assert_eq!(names, vec![std::ffi::OsString::from("state.json")]);
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("state.json");
    let store = JsonStateStore::new(&path, 2000.0, 500.0);

    tokio_test::assert_ok!(store.save(&sample_state()).await);
    assert!(path.exists());
}

#[tokio::test]
async fn persisted_record_uses_the_documented_schema() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = JsonStateStore::new(&path, 2000.0, 500.0);
    store.save(&sample_state()).await.unwrap();

    let raw = tokio::fs::read(&path).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(value["water_container"]["capacity"], 2000.0);
    assert_eq!(value["water_container"]["current_amount"], 976.0);
    assert_eq!(value["coffee_container"]["current_amount"], 492.0);
    assert_eq!(value["total_coffees_made"], 7);
    assert!(value["last_updated"].is_string());
}

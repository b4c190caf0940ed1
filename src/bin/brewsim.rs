// Copyright (c) 2025 - Cowboy AI, Inc.
//! Coffee Machine Simulator
//!
//! Wires the machine core to a JSON file store and runs a scripted
//! fill/brew sequence, logging the events an attached observer receives.
//!
//! Run with: cargo run --bin brewsim
//!
//! Environment:
//! - `BREWCORE_STATE_PATH` - persisted state location (default: data/machine_state.json)
//! - `BREWCORE_WATER_CAPACITY` / `BREWCORE_COFFEE_CAPACITY` - container capacities
//! - `RUST_LOG` - tracing filter (default: info)

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use brewcore::{
    CoffeeMachineService, CoffeeService, CoffeeVariant, JsonStateStore, MachineConfig,
};

/// Build machine configuration from the process environment
fn config_from_env() -> MachineConfig {
    let defaults = MachineConfig::default();

    let state_path = std::env::var("BREWCORE_STATE_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.state_path);
    let water_capacity = std::env::var("BREWCORE_WATER_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.water_capacity);
    let coffee_capacity = std::env::var("BREWCORE_COFFEE_CAPACITY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(defaults.coffee_capacity);

    MachineConfig {
        water_capacity,
        coffee_capacity,
        state_path,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config_from_env();
    info!(state_path = %config.state_path.display(), "starting coffee machine simulator");

    let store = Arc::new(JsonStateStore::from_config(&config));
    let service = Arc::new(CoffeeMachineService::new(config, store).await);

    // Attach an observer that logs every broadcast event
    let mut subscription = service.subscribe(Some("brewsim".to_string())).await;
    let observer = tokio::spawn(async move {
        while let Some(event) = subscription.events.recv().await {
            info!(event = %serde_json::to_string(&event).unwrap_or_default(), "observer");
        }
    });

    for (label, outcome) in [
        ("fill water", service.fill_water(1000.0).await),
        ("fill coffee", service.fill_coffee(250.0).await),
        ("brew espresso", service.brew(CoffeeVariant::Espresso).await),
        ("brew americano", service.brew(CoffeeVariant::Americano).await),
        // Over-capacity on purpose, to show the typed rejection
        ("overfill water", service.fill_water(5000.0).await),
    ] {
        match outcome {
            Ok(response) => info!(op = label, message = %response.message, "ok"),
            Err(e) => warn!(op = label, kind = e.kind(), error = %e, "rejected"),
        }
    }

    let status = service.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);

    // Let the dispatcher flush, then drop the feed
    tokio::task::yield_now().await;
    drop(service);
    observer.abort();

    Ok(())
}

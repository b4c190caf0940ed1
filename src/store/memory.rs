// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory State Store
//!
//! Volatile [`StateStore`] backend for tests and demos. Demonstrates the
//! swappable-backend seam without touching the filesystem.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StateStore, StoreError};
use crate::domain::MachineState;

/// Volatile [`StateStore`] holding the record in process memory
pub struct InMemoryStateStore {
    record: RwLock<Option<MachineState>>,
    water_capacity: f64,
    coffee_capacity: f64,
}

impl InMemoryStateStore {
    pub fn new(water_capacity: f64, coffee_capacity: f64) -> Self {
        Self {
            record: RwLock::new(None),
            water_capacity,
            coffee_capacity,
        }
    }

    /// Start from an already-persisted record
    pub fn seeded(state: MachineState) -> Self {
        let water_capacity = state.water_container.capacity();
        let coffee_capacity = state.coffee_container.capacity();
        Self {
            record: RwLock::new(Some(state)),
            water_capacity,
            coffee_capacity,
        }
    }

    /// The last record passed to `save`, if any (test observation point)
    pub async fn persisted(&self) -> Option<MachineState> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self) -> MachineState {
        match self.record.read().await.clone() {
            Some(state) if state.validate().is_ok() => state,
            _ => MachineState::new(self.water_capacity, self.coffee_capacity),
        }
    }

    async fn save(&self, state: &MachineState) -> Result<(), StoreError> {
        *self.record.write().await = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_loads_default_state() {
        let store = InMemoryStateStore::new(2000.0, 500.0);
        let state = store.load().await;
        assert_eq!(state.water_container.capacity(), 2000.0);
        assert_eq!(state.total_coffees_made, 0);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = InMemoryStateStore::new(2000.0, 500.0);
        let mut state = store.load().await;
        state.water_container.fill(750.0).unwrap();
        state.total_coffees_made = 4;

        store.save(&state).await.unwrap();
        assert_eq!(store.load().await, state);
    }
}

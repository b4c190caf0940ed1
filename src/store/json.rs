// Copyright (c) 2025 - Cowboy AI, Inc.
//! JSON File State Store
//!
//! Persists the machine state as a single pretty-printed JSON record.
//! Saves write to a sibling `.tmp` file and rename it over the target, so
//! a crash mid-write leaves either the old record or the new one, never a
//! torn mix.

use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{StateStore, StoreError};
use crate::config::MachineConfig;
use crate::domain::MachineState;

/// File-backed [`StateStore`] keeping one JSON record
pub struct JsonStateStore {
    path: PathBuf,
    water_capacity: f64,
    coffee_capacity: f64,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>, water_capacity: f64, coffee_capacity: f64) -> Self {
        Self {
            path: path.into(),
            water_capacity,
            coffee_capacity,
        }
    }

    pub fn from_config(config: &MachineConfig) -> Self {
        Self::new(
            config.state_path.clone(),
            config.water_capacity,
            config.coffee_capacity,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn default_state(&self) -> MachineState {
        MachineState::new(self.water_capacity, self.coffee_capacity)
    }

    fn temp_path(&self) -> PathBuf {
        let mut os: OsString = self.path.clone().into_os_string();
        os.push(".tmp");
        PathBuf::from(os)
    }
}

#[async_trait]
impl StateStore for JsonStateStore {
    async fn load(&self) -> MachineState {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no persisted state, starting fresh");
                return self.default_state();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read persisted state, starting fresh"
                );
                return self.default_state();
            }
        };

        let state: MachineState = match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "persisted state is unparsable, starting fresh"
                );
                return self.default_state();
            }
        };

        if let Err(e) = state.validate() {
            warn!(
                path = %self.path.display(),
                error = %e,
                "persisted state violates container bounds, starting fresh"
            );
            return self.default_state();
        }

        debug!(
            path = %self.path.display(),
            total_coffees_made = state.total_coffees_made,
            "loaded persisted state"
        );
        state
    }

    async fn save(&self, state: &MachineState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        let json = serde_json::to_vec_pretty(state)?;
        let temp_path = self.temp_path();

        let write_result = async {
            tokio::fs::write(&temp_path, &json)
                .await
                .map_err(|source| StoreError::Io {
                    path: temp_path.clone(),
                    source,
                })?;
            tokio::fs::rename(&temp_path, &self.path)
                .await
                .map_err(|source| StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
        }
        .await;

        if write_result.is_err() {
            // Best-effort cleanup; the save already failed
            let _ = tokio::fs::remove_file(&temp_path).await;
        } else {
            debug!(path = %self.path.display(), "persisted machine state");
        }

        write_result
    }
}

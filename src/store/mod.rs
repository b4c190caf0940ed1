// Copyright (c) 2025 - Cowboy AI, Inc.
//! State Store Abstraction
//!
//! Durable persistence of the machine state behind a swappable backend
//! interface.
//!
//! # Store Requirements
//!
//! 1. **Whole-record**: the full state is persisted as a single unit
//! 2. **Atomic replace**: a crash mid-write never leaves a torn record
//!    visible to a later load
//! 3. **Corruption-tolerant load**: an absent, unreadable, or
//!    invariant-violating record loads as a fresh default state (logged,
//!    never surfaced as an error)
//!
//! # Backends
//!
//! - [`JsonStateStore`] - JSON file with write-then-rename saves
//! - [`InMemoryStateStore`] - volatile backend for tests and demos

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::MachineState;

pub mod json;
pub mod memory;

pub use json::JsonStateStore;
pub use memory::InMemoryStateStore;

/// Errors raised by a durable write
#[derive(Debug, Error)]
pub enum StoreError {
    /// State could not be serialized
    #[error("failed to serialize machine state: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing or replacing the record failed
    #[error("failed to write state to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable persistence of [`MachineState`] behind a swappable backend
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last-persisted state
    ///
    /// Absence or corruption of the record is swallowed: the backend logs
    /// the observation and returns a fresh default state at its configured
    /// capacities.
    async fn load(&self) -> MachineState;

    /// Durably persist the full state as a single unit
    async fn save(&self, state: &MachineState) -> Result<(), StoreError>;
}

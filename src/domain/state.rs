// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine State Aggregate
//!
//! The single authoritative state of the machine: both containers, the
//! monotonic brew counter, and the last-modified timestamp. The serde
//! layout is the persisted record schema:
//!
//! ```json
//! {
//!   "water_container": { "capacity": 2000.0, "current_amount": 976.0 },
//!   "coffee_container": { "capacity": 500.0, "current_amount": 492.0 },
//!   "total_coffees_made": 1,
//!   "last_updated": "2025-06-01T12:00:00Z"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::container::{Container, ContainerError};

/// Aggregate machine state owning both containers exclusively
///
/// `total_coffees_made` only increases, except on reset which replaces the
/// whole aggregate. Records loaded from storage are re-checked with
/// [`MachineState::validate`] before being trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineState {
    pub water_container: Container,
    pub coffee_container: Container,
    #[serde(default)]
    pub total_coffees_made: u64,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl MachineState {
    /// Fresh state: empty containers at the given capacities, zero counter
    pub fn new(water_capacity: f64, coffee_capacity: f64) -> Self {
        Self {
            water_container: Container::new(water_capacity),
            coffee_container: Container::new(coffee_capacity),
            total_coffees_made: 0,
            last_updated: Utc::now(),
        }
    }

    /// Point-in-time snapshot answering a status query
    pub fn status(&self) -> StatusData {
        StatusData {
            water_level: self.water_container.current_amount(),
            water_capacity: self.water_container.capacity(),
            water_percentage: self.water_container.percentage(),
            coffee_level: self.coffee_container.current_amount(),
            coffee_capacity: self.coffee_container.capacity(),
            coffee_percentage: self.coffee_container.percentage(),
            total_coffees_made: self.total_coffees_made,
            last_updated: self.last_updated,
        }
    }

    /// Check both container invariants (used on records loaded from storage)
    pub fn validate(&self) -> Result<(), ContainerError> {
        self.water_container.validate()?;
        self.coffee_container.validate()?;
        Ok(())
    }

    /// Stamp the aggregate as modified now
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Status snapshot exposed to callers and broadcast to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusData {
    pub water_level: f64,
    pub water_capacity: f64,
    pub water_percentage: f64,
    pub coffee_level: f64,
    pub coffee_capacity: f64,
    pub coffee_percentage: f64,
    pub total_coffees_made: u64,
    pub last_updated: DateTime<Utc>,
}

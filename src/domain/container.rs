// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded Resource Container Value Object

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Container mutation or bounds error
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContainerError {
    #[error("cannot dispense {requested}, only {available} available")]
    Insufficient { requested: f64, available: f64 },

    #[error("cannot add {requested}, level {attempted_total} would exceed capacity {capacity}")]
    Overflow {
        requested: f64,
        capacity: f64,
        attempted_total: f64,
    },

    #[error("level {current_amount} outside bounds [0, {capacity}]")]
    OutOfBounds { current_amount: f64, capacity: f64 },
}

/// The two physical resources the machine accounts for
///
/// Carries the display name and measurement unit used in user-facing
/// messages (water in milliliters, coffee grounds in grams).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Water,
    Coffee,
}

impl ResourceKind {
    /// Display name used in messages ("water" / "coffee")
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Water => "water",
            ResourceKind::Coffee => "coffee",
        }
    }

    /// Measurement unit suffix ("ml" / "g")
    pub fn unit(&self) -> &'static str {
        match self {
            ResourceKind::Water => "ml",
            ResourceKind::Coffee => "g",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded numeric resource with a fixed capacity and a current level
///
/// # Invariants
/// - `0 ≤ current_amount ≤ capacity`, enforced on every mutation
/// - capacity is fixed at creation
///
/// The serialized layout (`capacity`, `current_amount`) matches the
/// persisted state record. Deserialization bypasses the invariant, so
/// loaded containers are re-checked with [`Container::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    capacity: f64,
    current_amount: f64,
}

impl Container {
    /// Create an empty container with the given capacity
    pub fn new(capacity: f64) -> Self {
        Self {
            capacity,
            current_amount: 0.0,
        }
    }

    /// Create a container at a specific level, checking bounds
    pub fn with_amount(capacity: f64, current_amount: f64) -> Result<Self, ContainerError> {
        let container = Self {
            capacity,
            current_amount,
        };
        container.validate()?;
        Ok(container)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn current_amount(&self) -> f64 {
        self.current_amount
    }

    /// Whether the requested amount can be dispensed from the current level
    pub fn can_dispense(&self, amount: f64) -> bool {
        amount <= self.current_amount
    }

    /// Whether adding the requested amount stays within capacity
    pub fn can_fill(&self, amount: f64) -> bool {
        self.current_amount + amount <= self.capacity
    }

    /// Remove `amount` from the container
    pub fn dispense(&mut self, amount: f64) -> Result<(), ContainerError> {
        if !self.can_dispense(amount) {
            return Err(ContainerError::Insufficient {
                requested: amount,
                available: self.current_amount,
            });
        }
        self.current_amount -= amount;
        Ok(())
    }

    /// Add `amount` to the container
    pub fn fill(&mut self, amount: f64) -> Result<(), ContainerError> {
        if !self.can_fill(amount) {
            return Err(ContainerError::Overflow {
                requested: amount,
                capacity: self.capacity,
                attempted_total: self.current_amount + amount,
            });
        }
        self.current_amount += amount;
        Ok(())
    }

    /// Fill level as a percentage of capacity, rounded to 2 decimal places
    ///
    /// A zero-capacity container reports 0 rather than dividing by zero.
    pub fn percentage(&self) -> f64 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        let pct = (self.current_amount / self.capacity) * 100.0;
        (pct * 100.0).round() / 100.0
    }

    /// Re-check the level invariant (used after deserializing records)
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.current_amount < 0.0
            || self.current_amount > self.capacity
            || !self.current_amount.is_finite()
            || !self.capacity.is_finite()
        {
            return Err(ContainerError::OutOfBounds {
                current_amount: self.current_amount,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Coffee Machine Domain Models
//!
//! Core domain concepts for the virtual coffee machine: bounded resource
//! containers, the brewable variants with their recipes, and the machine
//! state aggregate.
//!
//! # Value Objects with Invariants
//!
//! - [`Container`] - bounded resource level (`0 ≤ current_amount ≤ capacity`)
//! - [`ResourceKind`] - the two accounted resources (water, coffee grounds)
//! - [`Recipe`] / [`RecipeTable`] - fixed per-variant quantities
//!
//! # Aggregate
//!
//! - [`MachineState`] - both containers plus brew counter and timestamp;
//!   [`StatusData`] is its read-only snapshot

pub mod container;
pub mod recipe;
pub mod state;

// Re-export value objects
pub use container::{Container, ContainerError, ResourceKind};
pub use recipe::{CoffeeVariant, Recipe, RecipeTable};
pub use state::{MachineState, StatusData};

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Machine Operations
//!
//! The application service that orchestrates domain logic, persistence,
//! and change notification.
//!
//! # Architecture
//!
//! ```text
//! Client Request (HTTP / WebSocket layer)
//!     ↓
//! CoffeeService (this module)
//!     ↓
//! Validate → Mutate Containers → Persist (StateStore)
//!     ↓
//! EventSink (channel handoff)
//!     ↓
//! NotificationHub → Subscribers
//! ```
//!
//! # Design Principles
//!
//! 1. **Single-writer**: mutating operations serialize on the state lock;
//!    the check-then-act sequence is atomic against other mutations
//! 2. **Persist per operation**: every successful mutation is saved
//!    before the operation returns
//! 3. **Decoupled notification**: broadcast happens after the operation
//!    result is already decided, never on the caller's critical path
//! 4. **Injected collaborators**: store and configuration arrive through
//!    the constructor; no ambient globals
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use brewcore::{CoffeeMachineService, CoffeeService, CoffeeVariant, JsonStateStore, MachineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MachineConfig::default();
//!     let store = Arc::new(JsonStateStore::from_config(&config));
//!     let service = CoffeeMachineService::new(config, store).await;
//!
//!     service.fill_water(1000.0).await?;
//!     service.fill_coffee(250.0).await?;
//!     let result = service.brew(CoffeeVariant::Espresso).await?;
//!     println!("{}", result.message);
//!
//!     Ok(())
//! }
//! ```

pub mod machine;

pub use machine::{
    CoffeeMachineService, CoffeeService, MessageResponse, StatusResponse, MAX_FILL_AMOUNT,
};

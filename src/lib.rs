//! Resource-accounting core for a virtual coffee machine
//!
//! This crate provides the state machine behind a coffee machine API:
//! validated brew and fill operations over two bounded containers, durable
//! persistence of the machine state, and fan-out of change events to
//! connected observers. The HTTP/WebSocket layer sits on top of the
//! [`CoffeeService`] trait and is out of scope here.

pub mod config;
pub mod domain;
pub mod errors;
pub mod hub;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use config::MachineConfig;
pub use domain::{
    CoffeeVariant, Container, ContainerError, MachineState, Recipe, RecipeTable, ResourceKind,
    StatusData,
};
pub use errors::{MachineError, MachineResult};
pub use hub::{
    ConnectionInfo, EventSink, HubStats, MachineEvent, NotificationHub, ResourcesUsed, Subscription,
};
pub use service::{
    CoffeeMachineService, CoffeeService, MessageResponse, StatusResponse, MAX_FILL_AMOUNT,
};
pub use store::{InMemoryStateStore, JsonStateStore, StateStore, StoreError};

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Coffee Machine Service
//!
//! Orchestrates validation, mutation, persistence, and change notification
//! for every machine operation.
//!
//! # Transaction Semantics
//!
//! Each mutating operation is a transaction over the in-memory state:
//! 1. Validate against the pre-mutation snapshot (water before coffee)
//! 2. Mutate the containers and counters
//! 3. Persist the full state
//! 4. Queue change events for broadcast
//!
//! Steps 1-3 run under the state write lock, so at most one mutating
//! operation observes a given pre-state (no double-spend) and saves are
//! never reordered against mutations. Step 4 is a non-blocking channel
//! handoff; the operation returns without waiting on subscriber delivery.
//!
//! A persistence failure is reported as [`MachineError::Persistence`]
//! after the in-memory mutation has already been applied; the state is
//! not rolled back and no notification is emitted for the unpersisted
//! change.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::MachineConfig;
use crate::domain::{CoffeeVariant, MachineState, RecipeTable, ResourceKind, StatusData};
use crate::errors::{MachineError, MachineResult};
use crate::hub::{EventSink, HubStats, MachineEvent, NotificationHub, ResourcesUsed, Subscription};
use crate::store::StateStore;

/// Largest single fill accepted, in ml or g
pub const MAX_FILL_AMOUNT: f64 = 10_000.0;

/// Operation result carrying a human message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Status query result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub data: StatusData,
}

/// Operation surface consumed by the HTTP/WebSocket layer
#[async_trait]
pub trait CoffeeService: Send + Sync {
    /// Brew one coffee of the given variant
    async fn brew(&self, variant: CoffeeVariant) -> MachineResult<MessageResponse>;

    /// Add water to the water container (ml)
    async fn fill_water(&self, amount: f64) -> MachineResult<MessageResponse>;

    /// Add coffee grounds to the coffee container (g)
    async fn fill_coffee(&self, amount: f64) -> MachineResult<MessageResponse>;

    /// Current machine status; pure read, never fails
    async fn status(&self) -> StatusResponse;

    /// Replace the machine state wholesale with an empty one
    async fn reset(&self) -> MachineResult<MessageResponse>;

    /// Register an observer on the notification feed
    async fn subscribe(&self, client_id: Option<String>) -> Subscription;

    /// Remove an observer; idempotent
    async fn unsubscribe(&self, subscriber: Uuid);

    /// Notification feed statistics
    async fn hub_stats(&self) -> HubStats;
}

/// Default [`CoffeeService`] implementation over a [`StateStore`]
pub struct CoffeeMachineService {
    config: MachineConfig,
    recipes: RecipeTable,
    store: Arc<dyn StateStore>,
    state: RwLock<MachineState>,
    hub: NotificationHub,
    events: EventSink,
}

impl CoffeeMachineService {
    /// Construct the service, loading the last-persisted state
    ///
    /// Spawns the notification dispatcher; must be called from within a
    /// tokio runtime.
    pub async fn new(config: MachineConfig, store: Arc<dyn StateStore>) -> Self {
        let state = store.load().await;
        let hub = NotificationHub::new();
        let events = hub.spawn_dispatcher();

        info!(
            water_capacity = config.water_capacity,
            coffee_capacity = config.coffee_capacity,
            total_coffees_made = state.total_coffees_made,
            "coffee machine service started"
        );

        Self {
            config,
            recipes: RecipeTable::default(),
            store,
            state: RwLock::new(state),
            hub,
            events,
        }
    }

    /// The hub backing this service's notification feed
    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    /// Report a rejected operation: broadcast an error event, pass the
    /// failure through
    fn reject(&self, err: MachineError) -> MachineError {
        self.events
            .emit(MachineEvent::error(err.kind(), err.to_string()));
        err
    }

    async fn persist(&self, state: &MachineState) -> MachineResult<()> {
        self.store.save(state).await.map_err(|e| {
            error!(error = %e, "state mutation applied but persistence failed");
            MachineError::Persistence(e)
        })
    }

    fn validate_fill_amount(amount: f64) -> MachineResult<()> {
        if !amount.is_finite() {
            return Err(MachineError::InvalidAmount {
                amount,
                reason: "amount must be a finite number".to_string(),
            });
        }
        if amount <= 0.0 {
            return Err(MachineError::InvalidAmount {
                amount,
                reason: "amount must be greater than 0".to_string(),
            });
        }
        if amount > MAX_FILL_AMOUNT {
            return Err(MachineError::InvalidAmount {
                amount,
                reason: format!("amount exceeds the maximum single fill of {MAX_FILL_AMOUNT}"),
            });
        }
        Ok(())
    }

    /// Shared fill transaction for both containers
    async fn fill(&self, kind: ResourceKind, amount: f64) -> MachineResult<MessageResponse> {
        if let Err(e) = Self::validate_fill_amount(amount) {
            return Err(self.reject(e));
        }

        let mut state = self.state.write().await;
        let container = match kind {
            ResourceKind::Water => &mut state.water_container,
            ResourceKind::Coffee => &mut state.coffee_container,
        };

        if !container.can_fill(amount) {
            let err = MachineError::CapacityExceeded {
                container: kind,
                capacity: container.capacity(),
                attempted_total: container.current_amount() + amount,
            };
            drop(state);
            return Err(self.reject(err));
        }

        container
            .fill(amount)
            .map_err(|e| MachineError::from_container(kind, e))?;
        let level = container.current_amount();
        let capacity = container.capacity();
        state.touch();

        self.persist(&state).await?;
        let snapshot = state.status();
        drop(state);

        self.events.emit(MachineEvent::status_update(snapshot));

        Ok(MessageResponse::ok(format!(
            "Added {amount}{u} of {kind}. Container now at {level}{u}/{capacity}{u}",
            u = kind.unit()
        )))
    }
}

#[async_trait]
impl CoffeeService for CoffeeMachineService {
    async fn brew(&self, variant: CoffeeVariant) -> MachineResult<MessageResponse> {
        let recipe = self.recipes.lookup(variant)?;

        let mut state = self.state.write().await;

        // Both checks against the pre-mutation state, water first
        if !state.water_container.can_dispense(recipe.water_ml) {
            let err = MachineError::InsufficientResource {
                resource: ResourceKind::Water,
                needed: recipe.water_ml,
                available: state.water_container.current_amount(),
            };
            drop(state);
            return Err(self.reject(err));
        }
        if !state.coffee_container.can_dispense(recipe.coffee_g) {
            let err = MachineError::InsufficientResource {
                resource: ResourceKind::Coffee,
                needed: recipe.coffee_g,
                available: state.coffee_container.current_amount(),
            };
            drop(state);
            return Err(self.reject(err));
        }

        state
            .water_container
            .dispense(recipe.water_ml)
            .map_err(|e| MachineError::from_container(ResourceKind::Water, e))?;
        state
            .coffee_container
            .dispense(recipe.coffee_g)
            .map_err(|e| MachineError::from_container(ResourceKind::Coffee, e))?;
        state.total_coffees_made += 1;
        state.touch();

        self.persist(&state).await?;
        let snapshot = state.status();
        drop(state);

        self.events.emit(MachineEvent::coffee_made(
            variant,
            ResourcesUsed {
                coffee: recipe.coffee_g,
                water: recipe.water_ml,
            },
        ));
        self.events.emit(MachineEvent::status_update(snapshot));

        info!(variant = %variant, "coffee brewed");
        Ok(MessageResponse::ok(variant.ready_message()))
    }

    async fn fill_water(&self, amount: f64) -> MachineResult<MessageResponse> {
        self.fill(ResourceKind::Water, amount).await
    }

    async fn fill_coffee(&self, amount: f64) -> MachineResult<MessageResponse> {
        self.fill(ResourceKind::Coffee, amount).await
    }

    async fn status(&self) -> StatusResponse {
        let state = self.state.read().await;
        StatusResponse {
            success: true,
            data: state.status(),
        }
    }

    async fn reset(&self) -> MachineResult<MessageResponse> {
        let mut state = self.state.write().await;
        *state = MachineState::new(self.config.water_capacity, self.config.coffee_capacity);

        self.persist(&state).await?;
        let snapshot = state.status();
        drop(state);

        self.events.emit(MachineEvent::status_update(snapshot));

        info!("machine reset");
        Ok(MessageResponse::ok("Machine reset to empty state."))
    }

    async fn subscribe(&self, client_id: Option<String>) -> Subscription {
        let snapshot = self.state.read().await.status();
        self.hub.subscribe_with_snapshot(client_id, snapshot).await
    }

    async fn unsubscribe(&self, subscriber: Uuid) {
        self.hub.unsubscribe(subscriber).await;
    }

    async fn hub_stats(&self) -> HubStats {
        self.hub.stats().await
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Notification Hub
//!
//! Fan-out of state-change events to connected observers (the WebSocket
//! layer's subscribers). Delivery is best-effort and at-most-once:
//! each subscriber is served independently, and a subscriber whose channel
//! is gone is pruned on the next broadcast rather than retried.
//!
//! # Decoupling
//!
//! Operations never block on subscriber delivery. The service emits events
//! through an [`EventSink`] (a channel handoff); a spawned dispatcher task
//! drains the queue into [`NotificationHub::broadcast`] after the operation
//! has already returned to its caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{CoffeeVariant, StatusData};

/// Quantities consumed by one brew, reported in `coffee_made` events
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResourcesUsed {
    pub coffee: f64,
    pub water: f64,
}

/// State-change events delivered to observers
///
/// Each event is stamped with its construction time. The serde layout is
/// the outbound wire shape (`"type"`-tagged, snake_case).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MachineEvent {
    /// Refreshed status snapshot after any state change
    StatusUpdate {
        data: StatusData,
        timestamp: DateTime<Utc>,
    },

    /// A brew completed
    CoffeeMade {
        coffee_type: CoffeeVariant,
        resources_used: ResourcesUsed,
        timestamp: DateTime<Utc>,
    },

    /// An operation was rejected
    Error {
        error_type: String,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl MachineEvent {
    pub fn status_update(data: StatusData) -> Self {
        MachineEvent::StatusUpdate {
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn coffee_made(coffee_type: CoffeeVariant, resources_used: ResourcesUsed) -> Self {
        MachineEvent::CoffeeMade {
            coffee_type,
            resources_used,
            timestamp: Utc::now(),
        }
    }

    pub fn error(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        MachineEvent::Error {
            error_type: error_type.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            MachineEvent::StatusUpdate { timestamp, .. }
            | MachineEvent::CoffeeMade { timestamp, .. }
            | MachineEvent::Error { timestamp, .. } => *timestamp,
        }
    }
}

struct SubscriberEntry {
    client_id: Option<String>,
    connected_at: DateTime<Utc>,
    tx: mpsc::UnboundedSender<MachineEvent>,
}

/// A live registration with the hub
///
/// Dropping the receiver ends the subscription; the hub notices on the
/// next broadcast and removes the entry.
pub struct Subscription {
    pub id: Uuid,
    pub events: mpsc::UnboundedReceiver<MachineEvent>,
}

/// Snapshot of current hub registrations
#[derive(Debug, Clone, Serialize)]
pub struct HubStats {
    pub total_connections: usize,
    pub connections: Vec<ConnectionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionInfo {
    pub client_id: Option<String>,
    pub connected_at: DateTime<Utc>,
}

/// Fan-out of [`MachineEvent`]s to registered subscribers
///
/// Thread-safe and cheaply cloneable. Broadcast iterates a snapshot of the
/// registry, so subscribers removed mid-broadcast are tolerated.
#[derive(Clone, Default)]
pub struct NotificationHub {
    subscribers: Arc<RwLock<HashMap<Uuid, SubscriberEntry>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub async fn subscribe(&self, client_id: Option<String>) -> Subscription {
        let (tx, events) = mpsc::unbounded_channel();
        let id = Uuid::now_v7();
        let entry = SubscriberEntry {
            client_id: client_id.clone(),
            connected_at: Utc::now(),
            tx,
        };

        let mut subscribers = self.subscribers.write().await;
        subscribers.insert(id, entry);
        info!(
            subscriber = %id,
            client_id = client_id.as_deref(),
            total_connections = subscribers.len(),
            "subscriber connected"
        );

        Subscription { id, events }
    }

    /// Register a new subscriber and push it an initial status snapshot
    ///
    /// The initial push is best-effort: a delivery failure is logged and
    /// the registration stands.
    pub async fn subscribe_with_snapshot(
        &self,
        client_id: Option<String>,
        snapshot: StatusData,
    ) -> Subscription {
        let subscription = self.subscribe(client_id).await;

        let subscribers = self.subscribers.read().await;
        if let Some(entry) = subscribers.get(&subscription.id) {
            if entry.tx.send(MachineEvent::status_update(snapshot)).is_err() {
                warn!(
                    subscriber = %subscription.id,
                    "failed to deliver initial status snapshot"
                );
            }
        }

        subscription
    }

    /// Remove a subscriber; idempotent
    pub async fn unsubscribe(&self, id: Uuid) {
        let mut subscribers = self.subscribers.write().await;
        if let Some(entry) = subscribers.remove(&id) {
            info!(
                subscriber = %id,
                client_id = entry.client_id.as_deref(),
                total_connections = subscribers.len(),
                "subscriber disconnected"
            );
        }
    }

    /// Deliver an event to every current subscriber independently
    ///
    /// A delivery failure removes that subscriber and does not affect the
    /// others; there is no partial-broadcast rollback.
    pub async fn broadcast(&self, event: MachineEvent) {
        let targets: Vec<(Uuid, mpsc::UnboundedSender<MachineEvent>)> = {
            let subscribers = self.subscribers.read().await;
            subscribers
                .iter()
                .map(|(id, entry)| (*id, entry.tx.clone()))
                .collect()
        };

        let mut gone = Vec::new();
        for (id, tx) in targets {
            if tx.send(event.clone()).is_err() {
                gone.push(id);
            }
        }

        if !gone.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in gone {
                if subscribers.remove(&id).is_some() {
                    warn!(subscriber = %id, "pruned unreachable subscriber");
                }
            }
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Registration statistics for the stats endpoint
    pub async fn stats(&self) -> HubStats {
        let subscribers = self.subscribers.read().await;
        HubStats {
            total_connections: subscribers.len(),
            connections: subscribers
                .values()
                .map(|entry| ConnectionInfo {
                    client_id: entry.client_id.clone(),
                    connected_at: entry.connected_at,
                })
                .collect(),
        }
    }

    /// Spawn the broadcast dispatcher task, returning a non-blocking sink
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_dispatcher(&self) -> EventSink {
        let (tx, mut rx) = mpsc::unbounded_channel::<MachineEvent>();
        let hub = self.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                hub.broadcast(event).await;
            }
            debug!("notification dispatcher stopped");
        });
        EventSink { tx }
    }
}

/// Non-blocking handle for emitting events toward the dispatcher
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<MachineEvent>,
}

impl EventSink {
    /// Queue an event for broadcast; never blocks the caller
    pub fn emit(&self, event: MachineEvent) {
        if self.tx.send(event).is_err() {
            debug!("notification dispatcher gone, event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MachineState;

    fn snapshot() -> StatusData {
        MachineState::new(2000.0, 500.0).status()
    }

    #[tokio::test]
    async fn broadcast_reaches_every_subscriber() {
        let hub = NotificationHub::new();
        let mut a = hub.subscribe(Some("a".into())).await;
        let mut b = hub.subscribe(None).await;

        hub.broadcast(MachineEvent::status_update(snapshot())).await;

        assert!(matches!(
            a.events.recv().await,
            Some(MachineEvent::StatusUpdate { .. })
        ));
        assert!(matches!(
            b.events.recv().await,
            Some(MachineEvent::StatusUpdate { .. })
        ));
    }

    #[tokio::test]
    async fn initial_snapshot_arrives_before_broadcasts() {
        let hub = NotificationHub::new();
        let mut sub = hub.subscribe_with_snapshot(None, snapshot()).await;

        hub.broadcast(MachineEvent::error("invalid_amount", "nope"))
            .await;

        assert!(matches!(
            sub.events.recv().await,
            Some(MachineEvent::StatusUpdate { .. })
        ));
        assert!(matches!(
            sub.events.recv().await,
            Some(MachineEvent::Error { .. })
        ));
    }

    #[tokio::test]
    async fn dropped_subscriber_is_pruned_without_affecting_others() {
        let hub = NotificationHub::new();
        let dead = hub.subscribe(Some("dead".into())).await;
        let mut live = hub.subscribe(Some("live".into())).await;

        drop(dead.events);
        hub.broadcast(MachineEvent::status_update(snapshot())).await;

        assert!(matches!(
            live.events.recv().await,
            Some(MachineEvent::StatusUpdate { .. })
        ));
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let hub = NotificationHub::new();
        let sub = hub.subscribe(None).await;

        hub.unsubscribe(sub.id).await;
        hub.unsubscribe(sub.id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn stats_report_client_ids() {
        let hub = NotificationHub::new();
        let _a = hub.subscribe(Some("dashboard".into())).await;
        let _b = hub.subscribe(None).await;

        let stats = hub.stats().await;
        assert_eq!(stats.total_connections, 2);
        assert!(stats
            .connections
            .iter()
            .any(|c| c.client_id.as_deref() == Some("dashboard")));
    }

    #[tokio::test]
    async fn sink_decouples_emission_from_delivery() {
        let hub = NotificationHub::new();
        let sink = hub.spawn_dispatcher();
        let mut sub = hub.subscribe(None).await;

        // emit is synchronous; delivery happens on the dispatcher task
        sink.emit(MachineEvent::status_update(snapshot()));

        assert!(matches!(
            sub.events.recv().await,
            Some(MachineEvent::StatusUpdate { .. })
        ));
    }

    #[test]
    fn event_wire_shape_is_type_tagged() {
        let event = MachineEvent::coffee_made(
            CoffeeVariant::Espresso,
            ResourcesUsed {
                coffee: 8.0,
                water: 24.0,
            },
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "coffee_made");
        assert_eq!(value["coffee_type"], "espresso");
        assert_eq!(value["resources_used"]["water"], 24.0);
        assert!(value["timestamp"].is_string());
    }
}

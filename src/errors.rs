//! Error types for coffee machine operations

use thiserror::Error;

use crate::domain::container::{ContainerError, ResourceKind};
use crate::store::StoreError;

/// Errors that can occur while operating the machine
///
/// This is the closed set of failure kinds the service surface returns.
/// Resource and validation failures are recoverable by the caller; a
/// persistence failure is reported after the in-memory mutation has
/// already been applied and must never be conflated with the others.
#[derive(Debug, Error)]
pub enum MachineError {
    /// Brew cannot proceed: a container holds less than the recipe needs
    #[error("Not enough {resource}. Need {needed}{u} but only {available}{u} available.", u = .resource.unit())]
    InsufficientResource {
        resource: ResourceKind,
        needed: f64,
        available: f64,
    },

    /// Fill would overflow the container
    #[error("Cannot fill {container} container. Capacity is {capacity}{u}, fill would bring it to {attempted_total}{u}.", u = .container.unit())]
    CapacityExceeded {
        container: ResourceKind,
        capacity: f64,
        attempted_total: f64,
    },

    /// Caller supplied a non-positive or out-of-range amount
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: f64, reason: String },

    /// Durable write failed; the in-memory mutation still stands
    #[error("Failed to persist machine state: {0}")]
    Persistence(#[from] StoreError),

    /// No recipe registered for the variant (configuration bug)
    #[error("No recipe registered for coffee variant '{0}'")]
    UnknownVariant(String),
}

/// Result type for machine operations
pub type MachineResult<T> = Result<T, MachineError>;

impl MachineError {
    /// Machine-readable tag for API payloads and broadcast error events
    pub fn kind(&self) -> &'static str {
        match self {
            MachineError::InsufficientResource { .. } => "insufficient_resource",
            MachineError::CapacityExceeded { .. } => "capacity_exceeded",
            MachineError::InvalidAmount { .. } => "invalid_amount",
            MachineError::Persistence(_) => "persistence_error",
            MachineError::UnknownVariant(_) => "unknown_variant",
        }
    }

    /// Attach a resource kind to a container-level failure
    pub(crate) fn from_container(kind: ResourceKind, err: ContainerError) -> Self {
        match err {
            ContainerError::Insufficient {
                requested,
                available,
            } => MachineError::InsufficientResource {
                resource: kind,
                needed: requested,
                available,
            },
            ContainerError::Overflow {
                capacity,
                attempted_total,
                ..
            } => MachineError::CapacityExceeded {
                container: kind,
                capacity,
                attempted_total,
            },
            ContainerError::OutOfBounds { current_amount, .. } => MachineError::InvalidAmount {
                amount: current_amount,
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_resource_message_carries_units() {
        let err = MachineError::InsufficientResource {
            resource: ResourceKind::Water,
            needed: 24.0,
            available: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Not enough water. Need 24ml but only 0ml available."
        );
        assert_eq!(err.kind(), "insufficient_resource");
    }

    #[test]
    fn capacity_exceeded_message_reports_attempted_total() {
        let err = MachineError::CapacityExceeded {
            container: ResourceKind::Coffee,
            capacity: 500.0,
            attempted_total: 700.0,
        };
        assert_eq!(
            err.to_string(),
            "Cannot fill coffee container. Capacity is 500g, fill would bring it to 700g."
        );
        assert_eq!(err.kind(), "capacity_exceeded");
    }

    #[test]
    fn container_errors_map_to_machine_errors_with_kind() {
        let err = MachineError::from_container(
            ResourceKind::Water,
            ContainerError::Insufficient {
                requested: 48.0,
                available: 30.0,
            },
        );
        assert!(matches!(
            err,
            MachineError::InsufficientResource {
                resource: ResourceKind::Water,
                needed,
                available,
            } if needed == 48.0 && available == 30.0
        ));
    }
}

// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-based tests for container and state invariants
//!
//! Verifies that the level invariant `0 ≤ current_amount ≤ capacity`
//! holds for all reachable states, for all valid inputs.

use proptest::prelude::*;

use brewcore::{Container, MachineState};

/// A fill or dispense request with an arbitrary positive amount
#[derive(Debug, Clone)]
enum Op {
    Fill(f64),
    Dispense(f64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.01f64..5000.0).prop_map(Op::Fill),
        (0.01f64..5000.0).prop_map(Op::Dispense),
    ]
}

proptest! {
    #[test]
    fn container_level_stays_within_bounds(
        capacity in 1.0f64..10_000.0,
        ops in proptest::collection::vec(op_strategy(), 0..64),
    ) {
        let mut container = Container::new(capacity);
        for op in ops {
            // Rejected operations must not mutate; accepted ones must
            // keep the level in bounds either way
            match op {
                Op::Fill(amount) => {
                    let before = container.current_amount();
                    if container.fill(amount).is_err() {
                        prop_assert_eq!(container.current_amount(), before);
                    }
                }
                Op::Dispense(amount) => {
                    let before = container.current_amount();
                    if container.dispense(amount).is_err() {
                        prop_assert_eq!(container.current_amount(), before);
                    }
                }
            }
            prop_assert!(container.validate().is_ok());
            prop_assert!(container.current_amount() >= 0.0);
            prop_assert!(container.current_amount() <= container.capacity());
        }
    }

    #[test]
    fn percentage_is_bounded_and_rounded(
        capacity in 1.0f64..10_000.0,
        fraction in 0.0f64..=1.0,
    ) {
        let amount = (capacity * fraction).min(capacity);
        let container = Container::with_amount(capacity, amount).unwrap();

        let pct = container.percentage();
        prop_assert!((0.0..=100.0).contains(&pct));
        // Rounded to 2 decimal places
        prop_assert!(((pct * 100.0).round() - pct * 100.0).abs() < 1e-9);
    }

    #[test]
    fn state_record_round_trips_for_all_valid_levels(
        water_capacity in 1.0f64..10_000.0,
        coffee_capacity in 1.0f64..10_000.0,
        water_fraction in 0.0f64..=1.0,
        coffee_fraction in 0.0f64..=1.0,
        total in 0u64..100_000,
    ) {
        let mut state = MachineState::new(water_capacity, coffee_capacity);
        state.water_container.fill((water_capacity * water_fraction).min(water_capacity)).unwrap();
        state.coffee_container.fill((coffee_capacity * coffee_fraction).min(coffee_capacity)).unwrap();
        state.total_coffees_made = total;

        let json = serde_json::to_string(&state).unwrap();
        let restored: MachineState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(restored, state);
    }
}

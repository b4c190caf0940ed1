// Copyright (c) 2025 - Cowboy AI, Inc.
//! Machine Configuration

use std::path::PathBuf;

/// Configuration for the coffee machine core
///
/// Supplied explicitly at construction by the process entry point; the
/// core never reads the environment or configuration files itself.
#[derive(Debug, Clone)]
pub struct MachineConfig {
    /// Water container capacity in milliliters
    pub water_capacity: f64,
    /// Coffee grounds container capacity in grams
    pub coffee_capacity: f64,
    /// Location of the persisted state record
    pub state_path: PathBuf,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            water_capacity: 2000.0,
            coffee_capacity: 500.0,
            state_path: PathBuf::from("data/machine_state.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacities_match_reference_machine() {
        let config = MachineConfig::default();
        assert_eq!(config.water_capacity, 2000.0);
        assert_eq!(config.coffee_capacity, 500.0);
        assert_eq!(config.state_path, PathBuf::from("data/machine_state.json"));
    }
}

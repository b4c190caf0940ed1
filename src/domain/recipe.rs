// Copyright (c) 2025 - Cowboy AI, Inc.
//! Coffee Variants and the Recipe Table
//!
//! The four brewable variants and the fixed (coffee, water) quantities each
//! one consumes. The table is built once at service construction and never
//! mutated; a lookup miss is a configuration bug, not a user-facing error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{MachineError, MachineResult};

/// The closed set of brewable coffee variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoffeeVariant {
    Espresso,
    DoubleEspresso,
    Ristretto,
    Americano,
}

impl CoffeeVariant {
    /// All variants, in menu order
    pub const ALL: [CoffeeVariant; 4] = [
        CoffeeVariant::Espresso,
        CoffeeVariant::DoubleEspresso,
        CoffeeVariant::Ristretto,
        CoffeeVariant::Americano,
    ];

    /// Wire name (snake_case, matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            CoffeeVariant::Espresso => "espresso",
            CoffeeVariant::DoubleEspresso => "double_espresso",
            CoffeeVariant::Ristretto => "ristretto",
            CoffeeVariant::Americano => "americano",
        }
    }

    /// Human message returned when this variant is successfully brewed
    pub fn ready_message(&self) -> &'static str {
        match self {
            CoffeeVariant::Espresso => "Espresso ready!",
            CoffeeVariant::DoubleEspresso => "Double espresso ready!",
            CoffeeVariant::Americano => "Americano ready!",
            CoffeeVariant::Ristretto => "Coffee ready!",
        }
    }
}

impl fmt::Display for CoffeeVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoffeeVariant {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoffeeVariant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| MachineError::UnknownVariant(s.to_string()))
    }
}

/// Quantities consumed by one brew: coffee grounds in grams, water in ml
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub coffee_g: f64,
    pub water_ml: f64,
}

impl Recipe {
    pub const fn new(coffee_g: f64, water_ml: f64) -> Self {
        Self { coffee_g, water_ml }
    }
}

/// Immutable variant → recipe mapping
///
/// [`RecipeTable::default`] covers every variant, which makes
/// [`RecipeTable::lookup`] total in practice; the error path exists as a
/// defensive check for tables built through [`RecipeTable::with_recipes`].
#[derive(Debug, Clone)]
pub struct RecipeTable {
    recipes: HashMap<CoffeeVariant, Recipe>,
}

impl Default for RecipeTable {
    fn default() -> Self {
        Self::with_recipes([
            (CoffeeVariant::Espresso, Recipe::new(8.0, 24.0)),
            (CoffeeVariant::DoubleEspresso, Recipe::new(16.0, 48.0)),
            // Short shot with less water
            (CoffeeVariant::Ristretto, Recipe::new(8.0, 16.0)),
            (CoffeeVariant::Americano, Recipe::new(16.0, 148.0)),
        ])
    }
}

impl RecipeTable {
    /// Build a table from explicit entries
    pub fn with_recipes(entries: impl IntoIterator<Item = (CoffeeVariant, Recipe)>) -> Self {
        Self {
            recipes: entries.into_iter().collect(),
        }
    }

    /// Resolve the recipe for a variant
    pub fn lookup(&self, variant: CoffeeVariant) -> MachineResult<Recipe> {
        self.recipes
            .get(&variant)
            .copied()
            .ok_or_else(|| MachineError::UnknownVariant(variant.as_str().to_string()))
    }
}

//! Recipe quantities and ingredient unit costs.
//!
//! Both tables are keyed by the same fixed set of ingredients. When read from
//! a keyed map (settings files, stored preferences) every ingredient must be
//! present and no unknown key is tolerated.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Errors raised while building an ingredient table from keyed values.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IngredientError {
    /// A key does not name a known ingredient.
    #[error("unknown ingredient: {0}")]
    Unknown(String),
    /// A known ingredient has no value.
    #[error("missing ingredient: {0}")]
    Missing(Ingredient),
    /// An ingredient value is negative.
    #[error("ingredient {ingredient} must not be negative (got {value})")]
    Negative {
        /// Offending ingredient.
        ingredient: Ingredient,
        /// Value that was supplied.
        value: Decimal,
    },
}

/// An ingredient of the polvoron recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ingredient {
    Flour,
    PowderedMilk,
    Pinipig,
    Butter,
    Sugar,
}

impl Ingredient {
    /// Every ingredient, in recipe order.
    pub const ALL: [Self; 5] = [
        Self::Flour,
        Self::PowderedMilk,
        Self::Pinipig,
        Self::Butter,
        Self::Sugar,
    ];

    /// Settings key for this ingredient.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Flour => "flour",
            Self::PowderedMilk => "powdered_milk",
            Self::Pinipig => "pinipig",
            Self::Butter => "butter",
            Self::Sugar => "sugar",
        }
    }
}

impl std::fmt::Display for Ingredient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Ingredient {
    type Err = IngredientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flour" => Ok(Self::Flour),
            // Stored preferences use camelCase.
            "powdered_milk" | "powderedMilk" => Ok(Self::PowderedMilk),
            "pinipig" => Ok(Self::Pinipig),
            "butter" => Ok(Self::Butter),
            "sugar" => Ok(Self::Sugar),
            _ => Err(IngredientError::Unknown(s.to_owned())),
        }
    }
}

/// Fill a complete per-ingredient array from keyed values.
fn collect_table(values: BTreeMap<String, Decimal>) -> Result<[Decimal; 5], IngredientError> {
    let mut slots: [Option<Decimal>; 5] = [None; 5];
    for (key, value) in values {
        let ingredient: Ingredient = key.parse()?;
        if value < Decimal::ZERO {
            return Err(IngredientError::Negative { ingredient, value });
        }
        if let Some(slot) = slots.get_mut(ingredient as usize) {
            *slot = Some(value);
        }
    }

    let mut table = [Decimal::ZERO; 5];
    for (ingredient, (slot, out)) in Ingredient::ALL.iter().zip(slots.iter().zip(table.iter_mut())) {
        *out = slot.ok_or(IngredientError::Missing(*ingredient))?;
    }
    Ok(table)
}

/// Recipe for one batch (10 polvorons), in cups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Decimal>")]
pub struct Ingredients {
    pub flour: Decimal,
    pub powdered_milk: Decimal,
    pub pinipig: Decimal,
    pub butter: Decimal,
    pub sugar: Decimal,
}

impl Ingredients {
    /// Quantity of one ingredient per batch.
    #[must_use]
    pub const fn amount(&self, ingredient: Ingredient) -> Decimal {
        match ingredient {
            Ingredient::Flour => self.flour,
            Ingredient::PowderedMilk => self.powdered_milk,
            Ingredient::Pinipig => self.pinipig,
            Ingredient::Butter => self.butter,
            Ingredient::Sugar => self.sugar,
        }
    }
}

impl Default for Ingredients {
    fn default() -> Self {
        Self {
            flour: dec!(4),
            powdered_milk: dec!(2),
            pinipig: dec!(0.75),
            butter: dec!(1.2),
            sugar: dec!(1.5),
        }
    }
}

impl TryFrom<BTreeMap<String, Decimal>> for Ingredients {
    type Error = IngredientError;

    fn try_from(values: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        let [flour, powdered_milk, pinipig, butter, sugar] = collect_table(values)?;
        Ok(Self {
            flour,
            powdered_milk,
            pinipig,
            butter,
            sugar,
        })
    }
}

/// Unit cost of each ingredient, per cup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Decimal>")]
pub struct IngredientCosts {
    pub flour: Decimal,
    pub powdered_milk: Decimal,
    pub pinipig: Decimal,
    pub butter: Decimal,
    pub sugar: Decimal,
}

impl IngredientCosts {
    /// Unit cost of one ingredient.
    #[must_use]
    pub const fn unit_cost(&self, ingredient: Ingredient) -> Decimal {
        match ingredient {
            Ingredient::Flour => self.flour,
            Ingredient::PowderedMilk => self.powdered_milk,
            Ingredient::Pinipig => self.pinipig,
            Ingredient::Butter => self.butter,
            Ingredient::Sugar => self.sugar,
        }
    }
}

impl Default for IngredientCosts {
    fn default() -> Self {
        Self {
            flour: dec!(0.30),
            powdered_milk: dec!(1.20),
            pinipig: dec!(1.50),
            butter: dec!(2.00),
            sugar: dec!(0.50),
        }
    }
}

impl TryFrom<BTreeMap<String, Decimal>> for IngredientCosts {
    type Error = IngredientError;

    fn try_from(values: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        let [flour, powdered_milk, pinipig, butter, sugar] = collect_table(values)?;
        Ok(Self {
            flour,
            powdered_milk,
            pinipig,
            butter,
            sugar,
        })
    }
}

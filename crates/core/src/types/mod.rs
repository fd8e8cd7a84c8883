//! Core types for Polvo Planner.
//!
//! This module provides type-safe wrappers for the planner's domain concepts.

pub mod flavor;
pub mod id;
pub mod ingredient;
pub mod order;
pub mod status;
pub mod week;

pub use flavor::{Flavor, FlavorLineItem, FlavorPrices, average_price_per_batch, total_batches};
pub use id::*;
pub use ingredient::{Ingredient, IngredientCosts, IngredientError, Ingredients};
pub use order::{MAX_AMOUNT, MAX_BATCHES, Order, OrderValidationError, UNITS_PER_BATCH};
pub use status::*;
pub use week::{IsoWeek, WeekParseError};

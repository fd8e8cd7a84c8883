//! Orders and their validation rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::flavor::{FlavorLineItem, total_batches};
use super::id::OrderId;
use super::status::{Channel, OrderStatus, StatusError};
use super::week::IsoWeek;

/// Finished polvorons produced by one batch.
pub const UNITS_PER_BATCH: u32 = 10;

/// Largest batch count a single order may have.
pub const MAX_BATCHES: u32 = 1_000_000;

/// Largest price, cost, rate or hour value accepted anywhere in the planner.
///
/// With quantities capped at [`MAX_BATCHES`], every product and sum the
/// engine forms stays far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

/// Errors found when validating an order at the boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    /// The order has no display name.
    #[error("order name cannot be empty")]
    EmptyName,
    /// A monetary or hour field is negative.
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: Decimal,
    },
    /// A quantity, monetary or hour field exceeds its upper bound.
    #[error("{field} must be at most {max} (got {value})")]
    TooLarge {
        /// Name of the offending field.
        field: &'static str,
        /// Value that was supplied.
        value: Decimal,
        /// Largest accepted value.
        max: Decimal,
    },
    /// The flavor breakdown does not add up to the order quantity.
    #[error("flavor quantities add up to {flavor_total} batches but the order has {quantity}")]
    FlavorQuantityMismatch {
        /// Order-level batch count.
        quantity: u32,
        /// Sum of flavor line quantities.
        flavor_total: u64,
    },
    /// The stored week disagrees with the due date.
    #[error("week {week} does not contain due date {due_date}")]
    WeekMismatch {
        /// Stored week key.
        week: IsoWeek,
        /// Stored due date.
        due_date: NaiveDate,
    },
}

/// A production order.
///
/// Orders are read by the ROI engine but never mutated by it; the only
/// mutation modelled here is the pending → decided status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub name: String,
    /// Number of batches (10 polvorons each).
    pub quantity: u32,
    pub channel: Channel,
    /// Calendar week the order is produced in.
    pub week: IsoWeek,
    /// Date the order must be fulfilled. Older records only carry `week`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Flat price per batch. With a flavor breakdown this is a display
    /// average only.
    pub price_per_batch: Decimal,
    pub labor_hours: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flavors: Option<Vec<FlavorLineItem>>,
    /// One-off costs such as event vendor fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc_costs: Option<Decimal>,
}

impl Order {
    /// The flavor breakdown, if one is present and non-empty.
    #[must_use]
    pub fn flavor_breakdown(&self) -> Option<&[FlavorLineItem]> {
        self.flavors.as_deref().filter(|items| !items.is_empty())
    }

    /// Misc costs with the absent case resolved to zero.
    #[must_use]
    pub fn misc_costs_or_zero(&self) -> Decimal {
        self.misc_costs.unwrap_or(Decimal::ZERO)
    }

    /// Total finished polvorons for this order.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        u64::from(self.quantity) * u64::from(UNITS_PER_BATCH)
    }

    /// Check the order's invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule:
    /// - empty name
    /// - quantity above [`MAX_BATCHES`]
    /// - negative price, labor hours, misc costs or flavor price, or one
    ///   above [`MAX_AMOUNT`]
    /// - flavor quantities not summing to `quantity`
    /// - `week` not matching `due_date`
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.name.trim().is_empty() {
            return Err(OrderValidationError::EmptyName);
        }

        if self.quantity > MAX_BATCHES {
            return Err(OrderValidationError::TooLarge {
                field: "quantity",
                value: Decimal::from(self.quantity),
                max: Decimal::from(MAX_BATCHES),
            });
        }
        amount("pricePerBatch", self.price_per_batch)?;
        amount("laborHours", self.labor_hours)?;
        if let Some(misc) = self.misc_costs {
            amount("miscCosts", misc)?;
        }

        if let Some(items) = self.flavor_breakdown() {
            for item in items {
                amount("flavors.pricePerBatch", item.price_per_batch)?;
            }
            let flavor_total = total_batches(items);
            if flavor_total != u64::from(self.quantity) {
                return Err(OrderValidationError::FlavorQuantityMismatch {
                    quantity: self.quantity,
                    flavor_total,
                });
            }
        }

        if let Some(due_date) = self.due_date
            && IsoWeek::from_date(due_date) != self.week
        {
            return Err(OrderValidationError::WeekMismatch {
                week: self.week,
                due_date,
            });
        }

        Ok(())
    }

    /// Apply an approve/reject decision.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::AlreadyDecided`] if the order is not pending.
    pub fn decide(&mut self, decision: OrderStatus) -> Result<(), StatusError> {
        self.status = self.status.transition(decision)?;
        Ok(())
    }
}

/// Check a monetary or hour value lies in `0..=MAX_AMOUNT`.
fn amount(field: &'static str, value: Decimal) -> Result<(), OrderValidationError> {
    if value < Decimal::ZERO {
        return Err(OrderValidationError::Negative { field, value });
    }
    if value > MAX_AMOUNT {
        return Err(OrderValidationError::TooLarge {
            field,
            value,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

//! Building and editing orders from user input.

use chrono::NaiveDate;
use polvo_planner_core::{
    Channel, Flavor, FlavorLineItem, IsoWeek, Order, OrderId, OrderStatus, OrderValidationError,
    average_price_per_batch, total_batches,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::EngineConfig;
use crate::roi::recommended_labor_hours;

/// Errors produced while turning input into an [`Order`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    /// Neither a week nor a due date was given.
    #[error("order needs a production week or a due date")]
    Unscheduled,

    /// A flavor mix was given but every quantity is zero.
    #[error("flavor mix contains no batches")]
    EmptyMix,

    /// The flavor quantities add up to more batches than an order can hold.
    #[error("flavor mix has {0} batches, too many for one order")]
    TooManyBatches(u64),

    #[error(transparent)]
    Validation(#[from] OrderValidationError),
}

/// How an order is priced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum OrderPricing {
    /// One price for every batch.
    #[serde(rename_all = "camelCase")]
    Flat { quantity: u32, price_per_batch: Decimal },
    /// Batches per flavor, priced from the configured flavor prices.
    Mix { flavors: Vec<(Flavor, u32)> },
}

/// Input for a new order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub name: String,
    pub channel: Channel,
    /// Production week. Derived from `due_date` when absent.
    #[serde(default)]
    pub week: Option<IsoWeek>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub pricing: OrderPricing,
    /// Estimated from the production rate when absent.
    #[serde(default)]
    pub labor_hours: Option<Decimal>,
    #[serde(default)]
    pub misc_costs: Option<Decimal>,
}

/// Changes applied to an existing order. Identity, channel and status are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    pub name: Option<String>,
    /// Moving the due date moves the order to that date's week.
    pub due_date: Option<NaiveDate>,
    pub labor_hours: Option<Decimal>,
    /// Replaces the order's flavor breakdown and re-prices it.
    pub flavors: Option<Vec<(Flavor, u32)>>,
    pub misc_costs: Option<Decimal>,
}

struct Priced {
    quantity: u32,
    price_per_batch: Decimal,
    flavors: Option<Vec<FlavorLineItem>>,
}

fn price(pricing: &OrderPricing, config: &EngineConfig) -> Result<Priced, EntryError> {
    match pricing {
        OrderPricing::Flat {
            quantity,
            price_per_batch,
        } => Ok(Priced {
            quantity: *quantity,
            price_per_batch: *price_per_batch,
            flavors: None,
        }),
        OrderPricing::Mix { flavors } => {
            let items = config.flavor_prices.price_mix(flavors);
            if items.is_empty() {
                return Err(EntryError::EmptyMix);
            }
            let total = total_batches(&items);
            let quantity = u32::try_from(total).map_err(|_| EntryError::TooManyBatches(total))?;
            Ok(Priced {
                quantity,
                price_per_batch: average_price_per_batch(&items),
                flavors: Some(items),
            })
        }
    }
}

/// Create a pending order with a fresh id.
///
/// # Errors
///
/// Returns [`EntryError`] if the order cannot be scheduled, has an empty
/// flavor mix, or fails validation.
pub fn build_order(input: NewOrder, config: &EngineConfig) -> Result<Order, EntryError> {
    let week = match (input.week, input.due_date) {
        (Some(week), _) => week,
        (None, Some(due)) => IsoWeek::from_date(due),
        (None, None) => return Err(EntryError::Unscheduled),
    };
    let priced = price(&input.pricing, config)?;
    let labor_hours = input
        .labor_hours
        .unwrap_or_else(|| recommended_labor_hours(priced.quantity, config));

    let order = Order {
        id: OrderId::generate(),
        name: input.name.trim().to_owned(),
        quantity: priced.quantity,
        channel: input.channel,
        week,
        due_date: input.due_date,
        price_per_batch: priced.price_per_batch,
        labor_hours,
        status: OrderStatus::Pending,
        flavors: priced.flavors,
        misc_costs: input.misc_costs,
    };
    order.validate()?;

    debug!(order_id = %order.id, week = %order.week, quantity = order.quantity, "Built order");
    Ok(order)
}

/// Apply an edit, returning the updated order.
///
/// # Errors
///
/// Returns [`EntryError`] if the edited order is invalid.
pub fn edit_order(order: &Order, edit: OrderEdit, config: &EngineConfig) -> Result<Order, EntryError> {
    let mut updated = order.clone();

    if let Some(name) = edit.name {
        updated.name = name.trim().to_owned();
    }
    if let Some(due) = edit.due_date {
        updated.due_date = Some(due);
        updated.week = IsoWeek::from_date(due);
    }
    if let Some(hours) = edit.labor_hours {
        updated.labor_hours = hours;
    }
    if let Some(misc) = edit.misc_costs {
        updated.misc_costs = Some(misc);
    }
    if let Some(mix) = edit.flavors {
        let priced = price(&OrderPricing::Mix { flavors: mix }, config)?;
        updated.quantity = priced.quantity;
        updated.price_per_batch = priced.price_per_batch;
        updated.flavors = priced.flavors;
    }

    updated.validate()?;
    Ok(updated)
}

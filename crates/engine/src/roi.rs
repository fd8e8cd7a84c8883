//! Cost, revenue and ROI calculation for a single order.
//!
//! Every function here is pure: identical inputs give identical (exact,
//! decimal) outputs, and nothing is read from ambient state.
//!
//! Arithmetic saturates at `Decimal::MAX` / `Decimal::MIN` instead of
//! panicking. Orders and configurations that pass validation never get
//! near either bound.

use std::num::NonZeroU32;

use polvo_planner_core::{
    FlavorLineItem, Ingredient, IngredientCosts, Ingredients, Order, OrderValidationError,
    UNITS_PER_BATCH,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const TWO: Decimal = Decimal::TWO;

/// Financial snapshot of one order.
///
/// Always recomputed from the order and the active configuration; never
/// stored as the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiMetrics {
    pub revenue: Decimal,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub shipping_cost: Decimal,
    pub misc_costs: Decimal,
    pub profit: Decimal,
    /// Profit as a percentage of total costs; zero when there are no costs.
    pub roi: Decimal,
    /// Profit per labor hour; zero when no hours are booked.
    pub profit_per_hour: Decimal,
}

impl RoiMetrics {
    /// Sum of every cost component.
    #[must_use]
    pub fn total_costs(&self) -> Decimal {
        sum([self.material_cost, self.labor_cost, self.shipping_cost, self.misc_costs])
    }
}

/// Saturating sum.
pub(crate) fn sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add)
}

/// `num / den`, saturating when the quotient is out of range.
pub(crate) fn ratio(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den).unwrap_or(if num.is_sign_negative() == den.is_sign_negative() {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

/// Ingredient cost of a single batch.
#[must_use]
pub fn cost_per_batch(recipe: &Ingredients, costs: &IngredientCosts) -> Decimal {
    sum(Ingredient::ALL.iter().map(|&ingredient| {
        recipe.amount(ingredient).saturating_mul(costs.unit_cost(ingredient))
    }))
}

/// Ingredient cost of `quantity` batches. Linear in `quantity`.
#[must_use]
pub fn material_cost(quantity: u32, recipe: &Ingredients, costs: &IngredientCosts) -> Decimal {
    cost_per_batch(recipe, costs).saturating_mul(Decimal::from(quantity))
}

/// Revenue of an order.
///
/// A non-empty flavor breakdown is authoritative; otherwise the flat
/// `quantity × price_per_batch` applies.
#[must_use]
pub fn revenue(order: &Order) -> Decimal {
    order.flavor_breakdown().map_or_else(
        || Decimal::from(order.quantity).saturating_mul(order.price_per_batch),
        |items| sum(items.iter().map(FlavorLineItem::revenue)),
    )
}

/// Compute the full ROI breakdown for an order.
///
/// Does not validate `order`; use [`checked_roi`] for untrusted input.
#[must_use]
pub fn calculate_roi(order: &Order, config: &EngineConfig) -> RoiMetrics {
    let revenue = revenue(order);
    let material_cost = material_cost(order.quantity, &config.recipe, &config.costs);
    let labor_cost = order.labor_hours.saturating_mul(config.labor_rate);
    let shipping_cost = config.shipping.cost_for(order.channel, order.quantity);
    let misc_costs = order.misc_costs_or_zero();

    let total_costs = sum([material_cost, labor_cost, shipping_cost, misc_costs]);
    let profit = revenue.saturating_sub(total_costs);
    let roi = if total_costs > Decimal::ZERO {
        ratio(profit, total_costs).saturating_mul(HUNDRED)
    } else {
        Decimal::ZERO
    };
    let profit_per_hour = if order.labor_hours > Decimal::ZERO {
        ratio(profit, order.labor_hours)
    } else {
        Decimal::ZERO
    };

    RoiMetrics {
        revenue,
        material_cost,
        labor_cost,
        shipping_cost,
        misc_costs,
        profit,
        roi,
        profit_per_hour,
    }
}

/// Validate the order, then compute its ROI breakdown.
///
/// # Errors
///
/// Returns the first [`OrderValidationError`] the order violates.
pub fn checked_roi(order: &Order, config: &EngineConfig) -> Result<RoiMetrics, OrderValidationError> {
    order.validate()?;
    Ok(calculate_roi(order, config))
}

/// Labor hours needed to produce `total_units` polvorons.
///
/// Rounded up to the next half hour so labor is never under-estimated.
#[must_use]
pub fn labor_hours(total_units: u64, production_rate: NonZeroU32) -> Decimal {
    let hours = Decimal::from(total_units) / Decimal::from(production_rate.get());
    ((hours * TWO).ceil() / TWO).normalize()
}

/// Labor hours recommended for an order of `quantity` batches.
#[must_use]
pub fn recommended_labor_hours(quantity: u32, config: &EngineConfig) -> Decimal {
    let units = u64::from(quantity) * u64::from(UNITS_PER_BATCH);
    labor_hours(units, config.production_rate)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polvo_planner_core::{Channel, Flavor, IsoWeek, MAX_AMOUNT, MAX_BATCHES, OrderId, OrderStatus};
    use rust_decimal_macros::dec;

    use super::*;

    fn order(quantity: u32, price: Decimal, hours: Decimal, channel: Channel) -> Order {
        Order {
            id: OrderId::generate(),
            name: "Test order".to_string(),
            quantity,
            channel,
            week: IsoWeek::parse("2025-W10").unwrap(),
            due_date: None,
            price_per_batch: price,
            labor_hours: hours,
            status: OrderStatus::Pending,
            flavors: None,
            misc_costs: None,
        }
    }

    fn rate(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_cost_per_batch_defaults() {
        let cost = cost_per_batch(&Ingredients::default(), &IngredientCosts::default());
        assert_eq!(cost, dec!(7.875));
    }

    #[test]
    fn test_material_cost_zero_quantity() {
        let cost = material_cost(0, &Ingredients::default(), &IngredientCosts::default());
        assert_eq!(cost, Decimal::ZERO);
    }

    #[test]
    fn test_material_cost_is_linear() {
        let recipe = Ingredients::default();
        let costs = IngredientCosts::default();
        let one = material_cost(1, &recipe, &costs);
        for n in [2_u32, 7, 40, 1000] {
            assert_eq!(material_cost(n, &recipe, &costs), one * Decimal::from(n));
        }
    }

    #[test]
    fn test_wholesale_scenario() {
        let config = EngineConfig::default();
        let metrics = calculate_roi(&order(5, dec!(50), dec!(2), Channel::Wholesale), &config);

        assert_eq!(metrics.material_cost, dec!(39.375));
        assert_eq!(metrics.labor_cost, dec!(44));
        assert_eq!(metrics.shipping_cost, Decimal::ZERO);
        assert_eq!(metrics.misc_costs, Decimal::ZERO);
        assert_eq!(metrics.revenue, dec!(250));
        assert_eq!(metrics.total_costs(), dec!(83.375));
        assert_eq!(metrics.profit, dec!(166.625));
        assert_eq!(metrics.roi.round_dp(1), dec!(199.9));
        assert_eq!(metrics.profit_per_hour.round_dp(2), dec!(83.31));
    }

    #[test]
    fn test_online_small_order_pays_shipping() {
        let config = EngineConfig::default();
        let small = calculate_roi(&order(5, dec!(50), dec!(2), Channel::Online), &config);
        assert_eq!(small.shipping_cost, dec!(15));
        assert_eq!(small.profit, dec!(151.625));

        let large = calculate_roi(&order(10, dec!(50), dec!(2), Channel::Online), &config);
        assert_eq!(large.shipping_cost, Decimal::ZERO);
    }

    #[test]
    fn test_flavor_breakdown_is_authoritative() {
        let mut o = order(5, dec!(999), dec!(1), Channel::Events);
        o.flavors = Some(vec![
            FlavorLineItem {
                flavor: Flavor::Milo,
                quantity: 3,
                price_per_batch: dec!(12),
            },
            FlavorLineItem {
                flavor: Flavor::Cinnamon,
                quantity: 2,
                price_per_batch: dec!(10),
            },
        ]);
        assert_eq!(revenue(&o), dec!(56));
        assert_eq!(calculate_roi(&o, &EngineConfig::default()).revenue, dec!(56));
    }

    #[test]
    fn test_misc_costs_included() {
        let mut o = order(5, dec!(50), dec!(2), Channel::Events);
        o.misc_costs = Some(dec!(40));
        let metrics = calculate_roi(&o, &EngineConfig::default());
        assert_eq!(metrics.misc_costs, dec!(40));
        assert_eq!(metrics.profit, dec!(126.625));
    }

    #[test]
    fn test_zero_costs_gives_zero_roi() {
        let config = EngineConfig {
            labor_rate: Decimal::ZERO,
            ..EngineConfig::default()
        };
        let metrics = calculate_roi(&order(0, dec!(50), dec!(3), Channel::Wholesale), &config);
        assert_eq!(metrics.total_costs(), Decimal::ZERO);
        assert_eq!(metrics.roi, Decimal::ZERO);
    }

    #[test]
    fn test_zero_hours_gives_zero_profit_per_hour() {
        let metrics = calculate_roi(
            &order(5, dec!(50), Decimal::ZERO, Channel::Wholesale),
            &EngineConfig::default(),
        );
        assert_eq!(metrics.profit_per_hour, Decimal::ZERO);
        assert!(metrics.profit > Decimal::ZERO);
    }

    #[test]
    fn test_calculate_roi_is_repeatable() {
        let config = EngineConfig::default();
        let o = order(7, dec!(33.3), dec!(2.5), Channel::Online);
        assert_eq!(calculate_roi(&o, &config), calculate_roi(&o, &config));
    }

    #[test]
    fn test_custom_recipe_changes_material_cost() {
        let config = EngineConfig {
            recipe: Ingredients {
                flour: dec!(8),
                ..Ingredients::default()
            },
            ..EngineConfig::default()
        };
        let metrics = calculate_roi(&order(1, dec!(50), dec!(1), Channel::Wholesale), &config);
        assert_eq!(metrics.material_cost, dec!(9.075));
    }

    #[test]
    fn test_checked_roi_rejects_invalid() {
        let o = order(5, dec!(-1), dec!(2), Channel::Wholesale);
        assert!(checked_roi(&o, &EngineConfig::default()).is_err());
    }

    #[test]
    fn test_checked_roi_rejects_out_of_range_values() {
        let o = order(
            4_000_000_000,
            dec!(79228162514264337593543950),
            dec!(2),
            Channel::Wholesale,
        );
        assert!(matches!(
            checked_roi(&o, &EngineConfig::default()),
            Err(OrderValidationError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_largest_valid_order_computes() {
        let o = order(MAX_BATCHES, MAX_AMOUNT, MAX_AMOUNT, Channel::Online);
        let metrics = checked_roi(&o, &EngineConfig::default()).unwrap();
        assert_eq!(metrics.revenue, dec!(1000000000000000));
        assert_eq!(metrics.material_cost, dec!(7875000));
    }

    #[test]
    fn test_huge_unvalidated_order_saturates() {
        let o = order(u32::MAX, Decimal::MAX, dec!(2), Channel::Wholesale);
        let metrics = calculate_roi(&o, &EngineConfig::default());
        assert_eq!(metrics.revenue, Decimal::MAX);
        assert!(metrics.profit > Decimal::ZERO);
    }

    #[test]
    fn test_tiny_costs_saturate_ratios() {
        let config = EngineConfig {
            labor_rate: Decimal::ONE,
            ..EngineConfig::default()
        };
        // No batches, so the only cost is 1e-28 of labor.
        let mut o = order(0, dec!(50), dec!(0.0000000000000000000000000001), Channel::Wholesale);
        o.flavors = Some(vec![FlavorLineItem {
            flavor: Flavor::Milo,
            quantity: MAX_BATCHES,
            price_per_batch: MAX_AMOUNT,
        }]);
        let metrics = calculate_roi(&o, &config);
        assert_eq!(metrics.roi, Decimal::MAX);
        assert_eq!(metrics.profit_per_hour, Decimal::MAX);
    }

    #[test]
    fn test_labor_hours_zero() {
        assert_eq!(labor_hours(0, rate(80)), Decimal::ZERO);
    }

    #[test]
    fn test_labor_hours_rounds_up_to_half() {
        // 50 / 80 = 0.625 -> 1
        assert_eq!(labor_hours(50, rate(80)), dec!(1));
        // 40 / 80 = 0.5 exactly
        assert_eq!(labor_hours(40, rate(80)), dec!(0.5));
        // 1 / 80 -> 0.5
        assert_eq!(labor_hours(1, rate(80)), dec!(0.5));
        // 1200 / 80 = 15
        assert_eq!(labor_hours(1200, rate(80)), dec!(15));
        // 130 / 80 = 1.625 -> 2
        assert_eq!(labor_hours(130, rate(80)), dec!(2));
    }

    #[test]
    fn test_labor_hours_properties() {
        for units in [1_u64, 7, 79, 80, 81, 333, 999, 12_345] {
            let hours = labor_hours(units, rate(80));
            assert_eq!((hours * TWO).fract(), Decimal::ZERO, "{units} units");
            assert!(hours >= Decimal::from(units) / dec!(80), "{units} units");
        }
    }

    #[test]
    fn test_recommended_labor_hours() {
        // 12 batches = 120 polvorons = 1.5 h
        assert_eq!(recommended_labor_hours(12, &EngineConfig::default()), dec!(1.5));
    }

    #[test]
    fn test_metrics_serialize_camel_case() {
        let metrics = calculate_roi(
            &order(1, dec!(10), dec!(1), Channel::Wholesale),
            &EngineConfig::default(),
        );
        let json = serde_json::to_value(metrics).unwrap();
        assert!(json.get("profitPerHour").is_some());
        assert!(json.get("materialCost").is_some());
    }
}

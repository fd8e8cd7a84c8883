//! Integration tests for the per-order ROI engine.
//!
//! These run the documented scenarios end to end through the public engine
//! API with the default configuration.

#![allow(clippy::unwrap_used)]

use polvo_planner_core::{Channel, Flavor, FlavorLineItem};
use polvo_planner_engine::{
    EngineConfig, RoiTier, calculate_roi, checked_roi, labor_hours, roi_color, roi_label,
};
use polvo_planner_integration_tests::OrderFixture;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_wholesale_order_breakdown() {
    let order = OrderFixture::new("Cafe Luna")
        .quantity(5)
        .price(dec!(50))
        .hours(dec!(2))
        .build();

    let m = calculate_roi(&order, &EngineConfig::default());

    assert_eq!(m.material_cost, dec!(39.375));
    assert_eq!(m.labor_cost, dec!(44));
    assert_eq!(m.shipping_cost, Decimal::ZERO);
    assert_eq!(m.revenue, dec!(250));
    assert_eq!(m.profit, dec!(166.625));
    assert_eq!(m.roi.round_dp(1), dec!(199.9));
    assert_eq!(m.profit_per_hour.round_dp(2), dec!(83.31));
    assert_eq!(roi_label(m.roi), "Excellent");
}

#[test]
fn test_flavor_revenue_ignores_flat_price() {
    let mut order = OrderFixture::new("Mixed box")
        .quantity(5)
        .price(dec!(1000))
        .hours(dec!(1))
        .build();
    order.flavors = Some(vec![
        FlavorLineItem {
            flavor: Flavor::Milo,
            quantity: 3,
            price_per_batch: dec!(12),
        },
        FlavorLineItem {
            flavor: Flavor::BrownButterBites,
            quantity: 2,
            price_per_batch: dec!(10),
        },
    ]);

    let m = checked_roi(&order, &EngineConfig::default()).unwrap();
    assert_eq!(m.revenue, dec!(56));
}

#[test]
fn test_empty_flavor_list_uses_flat_price() {
    let mut order = OrderFixture::new("Plain")
        .quantity(2)
        .price(dec!(20))
        .build();
    order.flavors = Some(Vec::new());

    let m = calculate_roi(&order, &EngineConfig::default());
    assert_eq!(m.revenue, dec!(40));
}

// =============================================================================
// Shipping
// =============================================================================

#[test]
fn test_shipping_only_for_small_online_orders() {
    let config = EngineConfig::default();
    let cases = [
        (Channel::Online, 9, dec!(15)),
        (Channel::Online, 10, Decimal::ZERO),
        (Channel::Wholesale, 1, Decimal::ZERO),
        (Channel::Events, 1, Decimal::ZERO),
    ];
    for (channel, quantity, expected) in cases {
        let order = OrderFixture::new("Ship")
            .channel(channel)
            .quantity(quantity)
            .build();
        assert_eq!(
            calculate_roi(&order, &config).shipping_cost,
            expected,
            "{channel} x{quantity}"
        );
    }
}

#[test]
fn test_events_misc_costs_reduce_profit() {
    let config = EngineConfig::default();
    let base = OrderFixture::new("Fair")
        .channel(Channel::Events)
        .quantity(4)
        .price(dec!(30))
        .hours(dec!(3));
    let without = calculate_roi(&base.clone().build(), &config);
    let with = calculate_roi(&base.misc(dec!(25)).build(), &config);

    assert_eq!(with.misc_costs, dec!(25));
    assert_eq!(without.profit - with.profit, dec!(25));
}

// =============================================================================
// Guards and validation
// =============================================================================

#[test]
fn test_zero_guards() {
    let config = EngineConfig::default();
    let order = OrderFixture::new("Nothing").quantity(0).build();
    let m = calculate_roi(&order, &config);

    assert_eq!(m.total_costs(), Decimal::ZERO);
    assert_eq!(m.roi, Decimal::ZERO);
    assert_eq!(m.profit_per_hour, Decimal::ZERO);
}

#[test]
fn test_invalid_orders_are_rejected() {
    let config = EngineConfig::default();
    let negative_hours = OrderFixture::new("Bad").hours(dec!(-1)).build();
    let negative_misc = OrderFixture::new("Bad").misc(dec!(-5)).build();

    assert!(checked_roi(&negative_hours, &config).is_err());
    assert!(checked_roi(&negative_misc, &config).is_err());
}

#[test]
fn test_labor_hours_round_up_to_half_hours() {
    let rate = EngineConfig::default().production_rate;
    assert_eq!(labor_hours(0, rate), Decimal::ZERO);
    assert_eq!(labor_hours(1, rate), dec!(0.5));
    assert_eq!(labor_hours(80, rate), dec!(1));
    assert_eq!(labor_hours(81, rate), dec!(1.5));
    assert_eq!(labor_hours(500, rate), dec!(6.5));
}

#[test]
fn test_tiers_and_colors() {
    assert_eq!(roi_label(dec!(-0.01)), "Critical");
    assert_eq!(roi_label(Decimal::ZERO), "Poor");
    assert_eq!(roi_label(dec!(19.99)), "Poor");
    assert_eq!(roi_label(dec!(20)), "Fair");
    assert_eq!(roi_label(dec!(59.99)), "Good");
    assert_eq!(roi_label(dec!(60)), "Excellent");
    assert_eq!(roi_color(dec!(60)), RoiTier::Excellent.color_token());
}

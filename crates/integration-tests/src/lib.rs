//! Integration tests for Polvo Planner.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p polvo-planner-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `roi_engine` - Per-order cost, revenue and ROI scenarios
//! - `planning` - Weekly aggregation, calendar and report
//! - `decisions` - Approve/reject flow through the order store and files
//! - `config_loading` - Settings files and environment overrides
//!
//! This crate only provides shared fixtures.

use std::path::PathBuf;

use polvo_planner_core::{Channel, IsoWeek, Order, OrderId, OrderStatus};
use polvo_planner_engine::EngineConfig;
use rust_decimal::Decimal;

/// Builder for test orders. Defaults to a pending wholesale order of one
/// batch in 2025-W10.
#[derive(Debug, Clone)]
pub struct OrderFixture {
    order: Order,
}

impl OrderFixture {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            order: Order {
                id: OrderId::generate(),
                name: name.to_string(),
                quantity: 1,
                channel: Channel::Wholesale,
                week: IsoWeek::new(2025, 10).unwrap_or_else(|_| unreachable!()),
                due_date: None,
                price_per_batch: Decimal::ZERO,
                labor_hours: Decimal::ZERO,
                status: OrderStatus::Pending,
                flavors: None,
                misc_costs: None,
            },
        }
    }

    #[must_use]
    pub const fn quantity(mut self, quantity: u32) -> Self {
        self.order.quantity = quantity;
        self
    }

    #[must_use]
    pub const fn channel(mut self, channel: Channel) -> Self {
        self.order.channel = channel;
        self
    }

    /// Week as `YYYY-Www`.
    ///
    /// # Panics
    ///
    /// Panics on a malformed week key.
    #[must_use]
    pub fn week(mut self, week: &str) -> Self {
        self.order.week = week.parse().unwrap_or_else(|e| panic!("bad week {week}: {e}"));
        self
    }

    #[must_use]
    pub const fn price(mut self, price_per_batch: Decimal) -> Self {
        self.order.price_per_batch = price_per_batch;
        self
    }

    #[must_use]
    pub const fn hours(mut self, labor_hours: Decimal) -> Self {
        self.order.labor_hours = labor_hours;
        self
    }

    #[must_use]
    pub const fn misc(mut self, misc_costs: Decimal) -> Self {
        self.order.misc_costs = Some(misc_costs);
        self
    }

    #[must_use]
    pub const fn status(mut self, status: OrderStatus) -> Self {
        self.order.status = status;
        self
    }

    #[must_use]
    pub fn build(self) -> Order {
        self.order
    }
}

/// Configuration where every cost is zero, so profit equals revenue minus
/// misc costs.
///
/// # Panics
///
/// Panics if the embedded settings stop parsing.
#[must_use]
pub fn zero_cost_config() -> EngineConfig {
    EngineConfig::from_settings_str(
        r"
costs:
  flour: 0
  powdered_milk: 0
  pinipig: 0
  butter: 0
  sugar: 0
labor_rate: 0
shipping:
  fee: 0
",
    )
    .unwrap_or_else(|e| panic!("zero-cost settings: {e}"))
}

/// A unique path in the system temp directory.
#[must_use]
pub fn temp_path(stem: &str, extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("polvo-{stem}-{}.{extension}", uuid::Uuid::new_v4()))
}

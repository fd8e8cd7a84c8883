//! Polvo Planner engine.
//!
//! Turns orders into money: per-order cost, revenue and ROI breakdowns,
//! aggregation across orders, the weekly production calendar, the
//! production report and the approve/reject decision flow.
//!
//! Every calculation takes an explicit [`EngineConfig`]; there is no global
//! state, so all functions are safe to call from any thread.
//!
//! # Example
//!
//! ```
//! use polvo_planner_core::{Channel, IsoWeek, Order, OrderId, OrderStatus};
//! use polvo_planner_engine::{EngineConfig, calculate_roi, roi_label};
//! use rust_decimal_macros::dec;
//!
//! let order = Order {
//!     id: OrderId::generate(),
//!     name: "Cafe Luna".to_string(),
//!     quantity: 5,
//!     channel: Channel::Wholesale,
//!     week: "2025-W10".parse::<IsoWeek>().unwrap(),
//!     due_date: None,
//!     price_per_batch: dec!(50),
//!     labor_hours: dec!(2),
//!     status: OrderStatus::Pending,
//!     flavors: None,
//!     misc_costs: None,
//! };
//!
//! let metrics = calculate_roi(&order, &EngineConfig::default());
//! assert_eq!(metrics.profit, dec!(166.625));
//! assert_eq!(roi_label(metrics.roi), "Excellent");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod decision;
pub mod entry;
pub mod error;
pub mod report;
pub mod roi;
pub mod store;
pub mod tier;

pub use aggregate::{
    ChannelSummary, ScoredOrder, average_roi, channel_breakdown, top_by_profit_per_hour,
    weekly_profits,
};
pub use calendar::{SeasonalPeak, WeekPlan, seasonal_peak, week_header, weekly_calendar};
pub use config::{ConfigError, EngineConfig, ShippingPolicy};
pub use decision::{
    DecisionCommand, DecisionDesk, DecisionError, DecisionOutcome, PendingOrderSummary, Tool,
    pending_summaries, tool_definitions,
};
pub use entry::{EntryError, NewOrder, OrderEdit, OrderPricing, build_order, edit_order};
pub use error::EngineError;
pub use report::{
    ProductionReport, ReportError, SummaryMetrics, TopOrder, format_smart, generate_report,
};
pub use roi::{
    RoiMetrics, calculate_roi, checked_roi, cost_per_batch, labor_hours, material_cost,
    recommended_labor_hours, revenue,
};
pub use store::{InMemoryOrderStore, OrderStore, StoreError};
pub use tier::{RoiTier, roi_color, roi_label};

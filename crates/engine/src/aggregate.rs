//! Aggregation of ROI metrics across collections of orders.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use polvo_planner_core::{Channel, IsoWeek, Order};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::roi::{RoiMetrics, calculate_roi, sum};

/// An order paired with its computed metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredOrder<'a> {
    pub order: &'a Order,
    pub metrics: RoiMetrics,
}

impl<'a> ScoredOrder<'a> {
    /// Score an order under `config`.
    #[must_use]
    pub fn new(order: &'a Order, config: &EngineConfig) -> Self {
        Self {
            order,
            metrics: calculate_roi(order, config),
        }
    }
}

/// Ranking used wherever orders are listed best-first: profit per hour
/// descending, then order id ascending.
pub(crate) fn by_profit_per_hour(a: &ScoredOrder<'_>, b: &ScoredOrder<'_>) -> Ordering {
    b.metrics
        .profit_per_hour
        .cmp(&a.metrics.profit_per_hour)
        .then_with(|| a.order.id.cmp(&b.order.id))
}

/// Total profit per production week. Keys iterate in calendar order.
#[must_use]
pub fn weekly_profits(orders: &[Order], config: &EngineConfig) -> BTreeMap<IsoWeek, Decimal> {
    let mut weekly: BTreeMap<IsoWeek, Decimal> = BTreeMap::new();
    for order in orders {
        *weekly.entry(order.week).or_default() += calculate_roi(order, config).profit;
    }
    weekly
}

/// Arithmetic mean of per-order ROI; zero for an empty collection.
#[must_use]
pub fn average_roi(orders: &[Order], config: &EngineConfig) -> Decimal {
    if orders.is_empty() {
        return Decimal::ZERO;
    }
    let total = sum(orders.iter().map(|order| calculate_roi(order, config).roi));
    total / Decimal::from(orders.len())
}

/// Totals for one sales channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub count: usize,
    /// Total batches.
    pub quantity: u64,
    pub revenue: Decimal,
    pub profit: Decimal,
    /// Mean of the per-order ROI values (not total profit over revenue).
    pub average_roi: Decimal,
}

/// Per-channel totals. Channels without orders are absent.
#[must_use]
pub fn channel_breakdown(
    orders: &[Order],
    config: &EngineConfig,
) -> BTreeMap<Channel, ChannelSummary> {
    let mut roi_sums: BTreeMap<Channel, Decimal> = BTreeMap::new();
    let mut summaries: BTreeMap<Channel, ChannelSummary> = BTreeMap::new();

    for order in orders {
        let metrics = calculate_roi(order, config);
        let summary = summaries.entry(order.channel).or_default();
        summary.count += 1;
        summary.quantity += u64::from(order.quantity);
        summary.revenue += metrics.revenue;
        summary.profit += metrics.profit;
        let roi_sum = roi_sums.entry(order.channel).or_default();
        *roi_sum = roi_sum.saturating_add(metrics.roi);
    }

    for (channel, summary) in &mut summaries {
        let roi_sum = roi_sums.get(channel).copied().unwrap_or_default();
        summary.average_roi = roi_sum / Decimal::from(summary.count);
    }
    summaries
}

/// The `n` orders with the highest profit per hour, best first.
///
/// Ties are broken by order id so the ranking is deterministic.
#[must_use]
pub fn top_by_profit_per_hour<'a>(
    orders: &'a [Order],
    config: &EngineConfig,
    n: usize,
) -> Vec<ScoredOrder<'a>> {
    let mut scored: Vec<ScoredOrder<'a>> = orders
        .iter()
        .map(|order| ScoredOrder::new(order, config))
        .collect();
    scored.sort_by(by_profit_per_hour);
    scored.truncate(n);
    scored
}

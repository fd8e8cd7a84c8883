//! Production report: summary metrics, channel performance, insights and
//! the best-performing orders, rendered as plain text.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use polvo_planner_core::{Channel, Order};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use crate::aggregate::{ChannelSummary, channel_breakdown, top_by_profit_per_hour};
use crate::config::EngineConfig;
use crate::roi::{calculate_roi, ratio};

/// Orders listed in the "top performers" section.
pub const TOP_ORDERS: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("No orders to generate report")]
    NoOrders,
}

/// Format a number with at most two decimals and no trailing zeros.
///
/// ```
/// use polvo_planner_engine::format_smart;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_smart(dec!(42.00)), "42");
/// assert_eq!(format_smart(dec!(84.8875)), "84.89");
/// assert_eq!(format_smart(dec!(12.5)), "12.5");
/// ```
#[must_use]
pub fn format_smart(value: Decimal) -> String {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Totals across every order in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    /// Mean of per-order ROI.
    pub average_roi: Decimal,
    pub total_labor_hours: Decimal,
    /// Mean of per-order profit per hour.
    pub average_profit_per_hour: Decimal,
    pub channels: BTreeMap<Channel, ChannelSummary>,
}

impl SummaryMetrics {
    fn from_orders(orders: &[Order], config: &EngineConfig) -> Self {
        let mut total_revenue = Decimal::ZERO;
        let mut total_profit = Decimal::ZERO;
        let mut total_roi = Decimal::ZERO;
        let mut total_labor_hours = Decimal::ZERO;
        let mut total_profit_per_hour = Decimal::ZERO;

        for order in orders {
            let metrics = calculate_roi(order, config);
            total_revenue += metrics.revenue;
            total_profit += metrics.profit;
            total_roi = total_roi.saturating_add(metrics.roi);
            total_labor_hours += order.labor_hours;
            total_profit_per_hour = total_profit_per_hour.saturating_add(metrics.profit_per_hour);
        }

        let count = Decimal::from(orders.len().max(1));
        Self {
            total_orders: orders.len(),
            total_revenue,
            total_profit,
            average_roi: total_roi / count,
            total_labor_hours,
            average_profit_per_hour: total_profit_per_hour / count,
            channels: channel_breakdown(orders, config),
        }
    }

    /// Total profit per labor hour; zero when no hours are booked.
    #[must_use]
    pub fn labor_efficiency(&self) -> Decimal {
        if self.total_labor_hours > Decimal::ZERO {
            ratio(self.total_profit, self.total_labor_hours)
        } else {
            Decimal::ZERO
        }
    }

    /// Channel with the highest average ROI. Ties go to the first channel
    /// in `wholesale, events, online` order.
    #[must_use]
    pub fn best_channel_by_roi(&self) -> Option<(Channel, &ChannelSummary)> {
        best_by(&self.channels, |summary| summary.average_roi)
    }

    /// Channel with the highest total profit.
    #[must_use]
    pub fn most_profitable_channel(&self) -> Option<(Channel, &ChannelSummary)> {
        best_by(&self.channels, |summary| summary.profit)
    }
}

fn best_by(
    channels: &BTreeMap<Channel, ChannelSummary>,
    key: impl Fn(&ChannelSummary) -> Decimal,
) -> Option<(Channel, &ChannelSummary)> {
    let mut best: Option<(Channel, &ChannelSummary)> = None;
    for (&channel, summary) in channels {
        if best.is_none_or(|(_, current)| key(summary) > key(current)) {
            best = Some((channel, summary));
        }
    }
    best
}

/// One line of the top performers list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopOrder {
    pub name: String,
    pub channel: Channel,
    pub profit_per_hour: Decimal,
    pub roi: Decimal,
}

/// A complete production report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionReport {
    pub generated_on: NaiveDate,
    pub summary: SummaryMetrics,
    pub insights: Vec<String>,
    pub top_orders: Vec<TopOrder>,
}

/// Build a report over `orders`.
///
/// # Errors
///
/// Returns [`ReportError::NoOrders`] when `orders` is empty.
pub fn generate_report(
    orders: &[Order],
    config: &EngineConfig,
    generated_on: NaiveDate,
) -> Result<ProductionReport, ReportError> {
    if orders.is_empty() {
        return Err(ReportError::NoOrders);
    }

    let summary = SummaryMetrics::from_orders(orders, config);
    let insights = insights(orders, &summary);
    let top_orders = top_by_profit_per_hour(orders, config, TOP_ORDERS)
        .into_iter()
        .map(|scored| TopOrder {
            name: scored.order.name.clone(),
            channel: scored.order.channel,
            profit_per_hour: scored.metrics.profit_per_hour,
            roi: scored.metrics.roi,
        })
        .collect();

    tracing::debug!(orders = orders.len(), "Generated production report");
    Ok(ProductionReport {
        generated_on,
        summary,
        insights,
        top_orders,
    })
}

fn insights(orders: &[Order], summary: &SummaryMetrics) -> Vec<String> {
    let mut insights = Vec::new();

    if let Some((channel, best)) = summary.best_channel_by_roi() {
        insights.push(format!(
            "{} is your best performing channel with an average ROI of {}%.",
            channel.as_str().to_uppercase(),
            format_smart(best.average_roi)
        ));
    }
    if let Some((channel, best)) = summary.most_profitable_channel() {
        insights.push(format!(
            "{} generates the highest total profit at ${}.",
            channel.as_str().to_uppercase(),
            format_smart(best.profit)
        ));
    }

    let roi = format_smart(summary.average_roi);
    insights.push(if summary.average_roi > dec!(100) {
        format!("Excellent overall performance with an average ROI of {roi}% across all orders.")
    } else if summary.average_roi > dec!(50) {
        format!(
            "Good performance with an average ROI of {roi}%. Consider optimizing lower-performing orders."
        )
    } else {
        format!(
            "Average ROI of {roi}% indicates room for improvement. Review costs and pricing strategies."
        )
    });

    insights.push(format!(
        "Labor efficiency is ${} profit per hour worked.",
        format_smart(summary.labor_efficiency())
    ));

    let pending = orders.iter().filter(|o| o.status.is_pending()).count();
    if pending > 0 {
        let plural = if pending > 1 { "s" } else { "" };
        insights.push(format!(
            "{pending} order{plural} pending review. Consider approving profitable orders to maximize revenue."
        ));
    }

    insights
}

impl fmt::Display for ProductionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Pastry Production Report")?;
        writeln!(f, "Generated: {}", self.generated_on)?;
        writeln!(f)?;

        writeln!(f, "Summary Statistics")?;
        writeln!(f, "  Total Orders: {}", s.total_orders)?;
        writeln!(f, "  Total Revenue: ${}", format_smart(s.total_revenue))?;
        writeln!(f, "  Total Profit: ${}", format_smart(s.total_profit))?;
        writeln!(f, "  Average ROI: {}%", format_smart(s.average_roi))?;
        writeln!(f, "  Total Labor Hours: {}", format_smart(s.total_labor_hours))?;
        writeln!(
            f,
            "  Average Profit/Hour: ${}",
            format_smart(s.average_profit_per_hour)
        )?;
        writeln!(f)?;

        writeln!(f, "Channel Performance")?;
        for (channel, c) in &s.channels {
            writeln!(f, "  {}:", channel.as_str().to_uppercase())?;
            writeln!(
                f,
                "    Orders: {} | Revenue: ${} | Avg ROI: {}%",
                c.count,
                format_smart(c.revenue),
                format_smart(c.average_roi)
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Key Insights")?;
        for insight in &self.insights {
            writeln!(f, "  • {insight}")?;
        }
        writeln!(f)?;

        writeln!(f, "Top {TOP_ORDERS} Performing Orders (by Profit/Hour)")?;
        for (rank, order) in self.top_orders.iter().enumerate() {
            writeln!(f, "  {}. {} - {}", rank + 1, order.name, order.channel)?;
            writeln!(
                f,
                "     Profit/Hr: ${} | ROI: {}%",
                format_smart(order.profit_per_hour),
                format_smart(order.roi)
            )?;
        }
        Ok(())
    }
}

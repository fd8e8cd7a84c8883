//! Weekly production calendar.
//!
//! Orders are grouped by production week; inside a week they are ranked
//! best-first by profit per hour so the most valuable work is scheduled
//! first.

use std::collections::BTreeMap;

use chrono::Datelike;
use polvo_planner_core::{IsoWeek, Order};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::aggregate::{ScoredOrder, by_profit_per_hour};
use crate::config::EngineConfig;

/// A demand peak that recurs in the same month every year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalPeak {
    pub name: &'static str,
    /// Expected demand relative to an ordinary week.
    pub multiplier: Decimal,
}

/// Seasonal peak for a calendar month (1-12), if any.
#[must_use]
pub fn seasonal_peak(month: u32) -> Option<SeasonalPeak> {
    let (name, multiplier) = match month {
        12 => ("Christmas Season", dec!(2.5)),
        6 => ("Wedding Season", dec!(1.8)),
        2 => ("Valentine's Day", dec!(1.5)),
        _ => return None,
    };
    Some(SeasonalPeak { name, multiplier })
}

/// Header text for a week, e.g. `Week 10 - March 2025`.
///
/// The month is the month of the week's Monday.
#[must_use]
pub fn week_header(week: IsoWeek) -> String {
    let month = week.start_date().format("%B");
    format!("Week {:02} - {month} {}", week.week(), week.year())
}

/// One week of the production calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekPlan<'a> {
    pub week: IsoWeek,
    pub header: String,
    pub peak: Option<SeasonalPeak>,
    /// Orders ranked by profit per hour, best first.
    pub orders: Vec<ScoredOrder<'a>>,
    pub total_batches: u64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
}

impl<'a> WeekPlan<'a> {
    fn new(week: IsoWeek, mut orders: Vec<ScoredOrder<'a>>) -> Self {
        orders.sort_by(by_profit_per_hour);
        let total_batches = orders.iter().map(|s| u64::from(s.order.quantity)).sum();
        let total_revenue = orders.iter().map(|s| s.metrics.revenue).sum();
        let total_profit = orders.iter().map(|s| s.metrics.profit).sum();
        Self {
            week,
            header: week_header(week),
            peak: seasonal_peak(week.start_date().month()),
            orders,
            total_batches,
            total_revenue,
            total_profit,
        }
    }
}

/// Build the calendar: one [`WeekPlan`] per week that has orders, in
/// chronological order.
#[must_use]
pub fn weekly_calendar<'a>(orders: &'a [Order], config: &EngineConfig) -> Vec<WeekPlan<'a>> {
    let mut weeks: BTreeMap<IsoWeek, Vec<ScoredOrder<'a>>> = BTreeMap::new();
    for order in orders {
        weeks
            .entry(order.week)
            .or_default()
            .push(ScoredOrder::new(order, config));
    }
    weeks
        .into_iter()
        .map(|(week, scored)| WeekPlan::new(week, scored))
        .collect()
}

//! Read-only analysis commands: ROI table, weekly profits, calendar,
//! report and labor estimate.

use std::path::Path;

use chrono::Local;
use polvo_planner_engine::{
    EngineConfig, RoiTier, average_roi, calculate_roi, format_smart, generate_report,
    recommended_labor_hours, weekly_calendar, weekly_profits,
};
use rust_decimal::Decimal;

use super::{CommandError, orders};

/// Print the ROI breakdown of every order.
///
/// # Errors
///
/// Returns an error if the order file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn roi(path: &Path, config: &EngineConfig) -> Result<(), CommandError> {
    let store = orders::load(path).await?;

    println!(
        "{:<24} {:<10} {:<9} {:>10} {:>10} {:>10} {:>9} {:>10}  TIER",
        "ORDER", "CHANNEL", "WEEK", "REVENUE", "COSTS", "PROFIT", "ROI %", "PROFIT/H"
    );
    for order in store.orders() {
        let m = calculate_roi(order, config);
        println!(
            "{:<24} {:<10} {:<9} {:>10} {:>10} {:>10} {:>9} {:>10}  {}",
            order.name,
            order.channel.as_str(),
            order.week.to_string(),
            format_smart(m.revenue),
            format_smart(m.total_costs()),
            format_smart(m.profit),
            format_smart(m.roi),
            format_smart(m.profit_per_hour),
            RoiTier::from_roi(m.roi),
        );
    }
    Ok(())
}

/// Print profit per week and the average ROI.
///
/// # Errors
///
/// Returns an error if the order file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn weekly(path: &Path, config: &EngineConfig) -> Result<(), CommandError> {
    let store = orders::load(path).await?;
    let weekly = weekly_profits(store.orders(), config);

    for (week, profit) in &weekly {
        println!("{week}  ${}", format_smart(*profit));
    }
    let total: Decimal = weekly.values().copied().sum();
    println!("Total profit: ${}", format_smart(total));
    println!(
        "Average ROI: {}%",
        format_smart(average_roi(store.orders(), config))
    );
    Ok(())
}

/// Print the production calendar.
///
/// # Errors
///
/// Returns an error if the order file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn calendar(path: &Path, config: &EngineConfig) -> Result<(), CommandError> {
    let store = orders::load(path).await?;

    for plan in weekly_calendar(store.orders(), config) {
        match plan.peak {
            Some(peak) => println!("{} ({} x{})", plan.header, peak.name, peak.multiplier),
            None => println!("{}", plan.header),
        }
        println!(
            "  {} batches | revenue ${} | profit ${}",
            plan.total_batches,
            format_smart(plan.total_revenue),
            format_smart(plan.total_profit)
        );
        for scored in &plan.orders {
            println!(
                "    {:<24} {:>4} batches  ${}/h  [{}]",
                scored.order.name,
                scored.order.quantity,
                format_smart(scored.metrics.profit_per_hour),
                scored.order.status,
            );
        }
    }
    Ok(())
}

/// Print the production report as text or JSON.
///
/// # Errors
///
/// Returns an error if the order file cannot be loaded or holds no orders.
#[allow(clippy::print_stdout)]
pub async fn report(path: &Path, config: &EngineConfig, json: bool) -> Result<(), CommandError> {
    let store = orders::load(path).await?;
    let report = generate_report(store.orders(), config, Local::now().date_naive())?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|source| CommandError::Json {
            path: path.display().to_string(),
            source,
        })?;
        println!("{out}");
    } else {
        print!("{report}");
    }
    Ok(())
}

/// Print the labor estimate for `batches` batches.
#[allow(clippy::print_stdout)]
pub fn labor(batches: u32, config: &EngineConfig) {
    let hours = recommended_labor_hours(batches, config);
    println!(
        "{batches} batches at {} polvorons/hour: {} hours",
        config.production_rate,
        format_smart(hours)
    );
}

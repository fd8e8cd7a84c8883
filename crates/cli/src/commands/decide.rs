//! Approve/reject commands.
//!
//! # Usage
//!
//! ```bash
//! polvo decide pending
//! polvo decide approve <order-id>
//! polvo decide reject <order-id>
//! ```

use std::path::Path;

use polvo_planner_core::OrderId;
use polvo_planner_engine::{
    DecisionCommand, DecisionDesk, DecisionOutcome, EngineConfig, format_smart,
};

use super::{CommandError, orders};

/// List pending orders.
///
/// # Errors
///
/// Returns an error if the order file cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn pending(path: &Path, config: &EngineConfig) -> Result<(), CommandError> {
    let mut store = orders::load(path).await?;
    let outcome = DecisionDesk::new(&mut store, config).execute(DecisionCommand::ListPending)?;

    let DecisionOutcome::Pending(summaries) = outcome else {
        return Ok(());
    };
    if summaries.is_empty() {
        println!("No pending orders");
        return Ok(());
    }
    for summary in summaries {
        println!(
            "{}  {:<24} {:>4} batches @ ${:<6} profit ${}",
            summary.id,
            summary.name,
            summary.quantity,
            format_smart(summary.price_per_batch),
            format_smart(summary.profit),
        );
    }
    Ok(())
}

/// Approve a pending order and save the order file.
///
/// # Errors
///
/// Returns an error if the order is unknown, already decided, or the file
/// cannot be updated.
pub async fn approve(path: &Path, id: OrderId, config: &EngineConfig) -> Result<(), CommandError> {
    decide(path, DecisionCommand::Approve(id), config).await
}

/// Reject a pending order and save the order file.
///
/// # Errors
///
/// Same as [`approve`].
pub async fn reject(path: &Path, id: OrderId, config: &EngineConfig) -> Result<(), CommandError> {
    decide(path, DecisionCommand::Reject(id), config).await
}

#[allow(clippy::print_stdout)]
async fn decide(
    path: &Path,
    command: DecisionCommand,
    config: &EngineConfig,
) -> Result<(), CommandError> {
    let mut store = orders::load(path).await?;
    let outcome = DecisionDesk::new(&mut store, config).execute(command)?;
    orders::save(path, &store).await?;

    let message = outcome.message().map_err(|source| CommandError::Json {
        path: path.display().to_string(),
        source,
    })?;
    println!("{message}");
    Ok(())
}

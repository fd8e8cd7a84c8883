//! Order file I/O and order entry.

use std::path::Path;

use polvo_planner_engine::{EngineConfig, InMemoryOrderStore, NewOrder, build_order};
use tracing::info;

use super::CommandError;

/// Load the order file into a store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or holds invalid orders.
pub async fn load(path: &Path) -> Result<InMemoryOrderStore, CommandError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let store = InMemoryOrderStore::from_json(&content)?;
    info!(path = %path.display(), count = store.len(), "Loaded orders");
    Ok(store)
}

/// Write the store back to the order file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn save(path: &Path, store: &InMemoryOrderStore) -> Result<(), CommandError> {
    let json = store.to_json()?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| CommandError::Write {
            path: path.display().to_string(),
            source,
        })?;
    info!(path = %path.display(), count = store.len(), "Saved orders");
    Ok(())
}

/// Add an order described by the JSON file at `input`.
///
/// A missing order file starts an empty order list.
///
/// # Errors
///
/// Returns an error if the input is unreadable or invalid, or the order
/// file cannot be updated.
#[allow(clippy::print_stdout)]
pub async fn add(orders: &Path, input: &Path, config: &EngineConfig) -> Result<(), CommandError> {
    let raw = tokio::fs::read_to_string(input)
        .await
        .map_err(|source| CommandError::Read {
            path: input.display().to_string(),
            source,
        })?;
    let new_order: NewOrder = serde_json::from_str(&raw).map_err(|source| CommandError::Json {
        path: input.display().to_string(),
        source,
    })?;

    let mut store = if tokio::fs::try_exists(orders).await.unwrap_or(false) {
        load(orders).await?
    } else {
        InMemoryOrderStore::default()
    };

    let order = build_order(new_order, config)?;
    let (id, name, week) = (order.id, order.name.clone(), order.week);
    store.insert(order)?;
    save(orders, &store).await?;

    println!("Added order {name} ({id}) in week {week}");
    Ok(())
}

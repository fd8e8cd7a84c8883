//! Unified error handling for the engine.

use polvo_planner_core::{OrderValidationError, StatusError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::decision::DecisionError;
use crate::entry::EntryError;
use crate::report::ReportError;
use crate::store::StoreError;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// An order failed boundary validation.
    #[error("Validation error: {0}")]
    Validation(#[from] OrderValidationError),

    /// Order input could not be turned into an order.
    #[error("Order entry error: {0}")]
    Entry(#[from] EntryError),

    /// An illegal status change was requested.
    #[error("Status error: {0}")]
    Status(#[from] StatusError),

    /// The order store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A decision command failed.
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    /// A report could not be produced.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

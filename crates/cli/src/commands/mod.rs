//! CLI command implementations.

pub mod analysis;
pub mod decide;
pub mod orders;

use polvo_planner_engine::{DecisionError, EngineError, EntryError, ReportError, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The order file could not be written back.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Input JSON is malformed.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

macro_rules! via_engine_error {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for CommandError {
                fn from(err: $err) -> Self {
                    Self::Engine(err.into())
                }
            }
        )*
    };
}

via_engine_error!(StoreError, DecisionError, ReportError, EntryError);

//! Polvo Planner CLI - ROI analysis, production calendar, reports and
//! order decisions over a JSON order file.
//!
//! # Usage
//!
//! ```bash
//! # Per-order ROI table
//! polvo --orders orders.json roi
//!
//! # Weekly profits and average ROI
//! polvo weekly
//!
//! # Production calendar grouped by week
//! polvo calendar
//!
//! # Text production report
//! polvo report
//!
//! # Labor hours needed for 12 batches
//! polvo labor --batches 12
//!
//! # Add an order from a JSON file
//! polvo add new-order.json
//!
//! # Decide on pending orders
//! polvo decide pending
//! polvo decide approve 6f1c0b8e-...
//! polvo decide reject 6f1c0b8e-...
//! ```
//!
//! # Environment Variables
//!
//! - `POLVO_ORDERS` - Order file path (default: `orders.json`)
//! - `POLVO_SETTINGS` - YAML settings file (overridden by `--settings`)
//! - `POLVO_LOG_JSON` - Emit JSON logs when set
//! - `RUST_LOG` - Log filter (default: `info`)
//!
//! Engine overrides (`POLVO_LABOR_RATE`, ...) are documented in
//! `polvo_planner_engine::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use polvo_planner_core::OrderId;
use polvo_planner_engine::EngineConfig;
use polvo_planner_engine::config::SETTINGS_VAR;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "polvo")]
#[command(author, version, about = "Polvo Planner CLI tools")]
struct Cli {
    /// JSON file holding the order list
    #[arg(long, global = true, env = "POLVO_ORDERS", default_value = "orders.json")]
    orders: PathBuf,

    /// YAML settings file (recipe, costs, rates)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ROI breakdown of every order
    Roi,
    /// Show weekly profits and the average ROI
    Weekly,
    /// Show the production calendar grouped by week
    Calendar,
    /// Print the production report
    Report {
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Estimate labor hours for a number of batches
    Labor {
        /// Number of batches (10 polvorons each)
        #[arg(short, long)]
        batches: u32,
    },
    /// Add an order described by a JSON file
    Add {
        /// Path to the new order JSON
        input: PathBuf,
    },
    /// Approve, reject or list pending orders
    Decide {
        #[command(subcommand)]
        action: DecideAction,
    },
}

#[derive(Subcommand)]
enum DecideAction {
    /// List pending orders with their profit
    Pending,
    /// Approve a pending order
    Approve {
        /// Order ID
        id: OrderId,
    },
    /// Reject a pending order
    Reject {
        /// Order ID
        id: OrderId,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let json = std::env::var("POLVO_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(settings: Option<PathBuf>) -> Result<EngineConfig, polvo_planner_engine::ConfigError> {
    let settings = settings.map(|path| path.display().to_string());
    EngineConfig::from_lookup(|key| {
        if key == SETTINGS_VAR && settings.is_some() {
            return settings.clone();
        }
        std::env::var(key).ok()
    })
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.settings)?;
    let orders = cli.orders;

    match cli.command {
        Commands::Roi => commands::analysis::roi(&orders, &config).await?,
        Commands::Weekly => commands::analysis::weekly(&orders, &config).await?,
        Commands::Calendar => commands::analysis::calendar(&orders, &config).await?,
        Commands::Report { json } => commands::analysis::report(&orders, &config, json).await?,
        Commands::Labor { batches } => commands::analysis::labor(batches, &config),
        Commands::Add { input } => commands::orders::add(&orders, &input, &config).await?,
        Commands::Decide { action } => match action {
            DecideAction::Pending => commands::decide::pending(&orders, &config).await?,
            DecideAction::Approve { id } => commands::decide::approve(&orders, id, &config).await?,
            DecideAction::Reject { id } => commands::decide::reject(&orders, id, &config).await?,
        },
    }
    Ok(())
}

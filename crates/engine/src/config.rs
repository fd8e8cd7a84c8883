//! Engine configuration: recipe, ingredient costs, labor rate, shipping
//! policy and production rate.
//!
//! Configuration is an explicit value handed to every engine call. It is
//! built in layers: defaults, then an optional YAML settings file, then
//! environment overrides.
//!
//! # Environment Variables
//!
//! All optional:
//! - `POLVO_SETTINGS` - Path to a YAML settings file
//! - `POLVO_LABOR_RATE` - Hourly labor rate (default: 22)
//! - `POLVO_SHIPPING_FEE` - Flat shipping surcharge (default: 15)
//! - `POLVO_SHIPPING_CHANNELS` - Comma-separated channels the surcharge
//!   applies to (default: online)
//! - `POLVO_SHIPPING_MAX_BATCHES` - Orders below this many batches pay the
//!   surcharge (default: 10)
//! - `POLVO_PRODUCTION_RATE` - Polvorons per hour per person (default: 80)
//!
//! # Settings file
//!
//! ```yaml
//! recipe:
//!   flour: 4
//!   powdered_milk: 2
//!   pinipig: 0.75
//!   butter: 1.2
//!   sugar: 1.5
//! costs:
//!   flour: 0.30
//!   powdered_milk: 1.20
//!   pinipig: 1.50
//!   butter: 2.00
//!   sugar: 0.50
//! labor_rate: 22
//! production_rate: 80
//! shipping:
//!   fee: 15
//!   channels: [online]
//!   max_batches: 10
//! flavor_prices:
//!   milo: 12
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;
use std::path::Path;

use polvo_planner_core::{
    Channel, Flavor, FlavorPrices, Ingredient, IngredientCosts, IngredientError, Ingredients,
    MAX_AMOUNT,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the YAML settings file.
pub const SETTINGS_VAR: &str = "POLVO_SETTINGS";

const DEFAULT_PRODUCTION_RATE: NonZeroU32 = match NonZeroU32::new(80) {
    Some(rate) => rate,
    None => NonZeroU32::MIN,
};
const DEFAULT_SHIPPING_MAX_BATCHES: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Invalid ingredient table: {0}")]
    Ingredient(#[from] IngredientError),
    #[error("Unknown sales channel: {0}")]
    UnknownChannel(String),
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: Decimal },
    #[error("{field} must be at most {max} (got {value})")]
    TooLarge {
        field: String,
        value: Decimal,
        max: Decimal,
    },
    #[error("Invalid settings file: {0}")]
    Settings(#[from] serde_yaml::Error),
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// When the flat shipping surcharge applies.
///
/// The surcharge is charged on orders sold through one of `channels` with
/// fewer than `max_batches` batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShippingPolicy {
    /// Flat fee charged per qualifying order.
    pub fee: Decimal,
    /// Channels the surcharge applies to.
    pub channels: BTreeSet<Channel>,
    /// Orders with fewer batches than this pay the surcharge.
    pub max_batches: u32,
}

impl ShippingPolicy {
    /// Whether an order on `channel` with `quantity` batches pays shipping.
    #[must_use]
    pub fn applies(&self, channel: Channel, quantity: u32) -> bool {
        self.channels.contains(&channel) && quantity < self.max_batches
    }

    /// Shipping cost for an order, zero when the policy does not apply.
    #[must_use]
    pub fn cost_for(&self, channel: Channel, quantity: u32) -> Decimal {
        if self.applies(channel, quantity) {
            self.fee
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            fee: dec!(15),
            channels: BTreeSet::from([Channel::Online]),
            max_batches: DEFAULT_SHIPPING_MAX_BATCHES,
        }
    }
}

/// Everything the ROI engine needs besides the order itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Ingredient quantities per batch.
    pub recipe: Ingredients,
    /// Unit cost of each ingredient.
    pub costs: IngredientCosts,
    /// Labor cost per hour.
    pub labor_rate: Decimal,
    pub shipping: ShippingPolicy,
    /// Polvorons one person produces per hour.
    pub production_rate: NonZeroU32,
    /// Per-flavor batch prices used when entering flavor mixes.
    pub flavor_prices: FlavorPrices,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            recipe: Ingredients::default(),
            costs: IngredientCosts::default(),
            labor_rate: dec!(22),
            shipping: ShippingPolicy::default(),
            production_rate: DEFAULT_PRODUCTION_RATE,
            flavor_prices: FlavorPrices::default(),
        }
    }
}

/// Settings file layout. Every section is optional.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Settings {
    recipe: Option<BTreeMap<String, Decimal>>,
    costs: Option<BTreeMap<String, Decimal>>,
    labor_rate: Option<Decimal>,
    shipping: Option<ShippingPolicy>,
    production_rate: Option<NonZeroU32>,
    flavor_prices: Option<FlavorPrices>,
}

impl Settings {
    fn apply(self, config: &mut EngineConfig) -> Result<(), ConfigError> {
        if let Some(recipe) = self.recipe {
            config.recipe = Ingredients::try_from(recipe)?;
        }
        if let Some(costs) = self.costs {
            config.costs = IngredientCosts::try_from(costs)?;
        }
        if let Some(rate) = self.labor_rate {
            config.labor_rate = rate;
        }
        if let Some(shipping) = self.shipping {
            config.shipping = shipping;
        }
        if let Some(rate) = self.production_rate {
            config.production_rate = rate;
        }
        if let Some(prices) = self.flavor_prices {
            config.flavor_prices = prices;
        }
        Ok(())
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed, the settings
    /// file is unreadable or invalid, or a value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(SETTINGS_VAR) {
            Some(path) => Self::from_settings_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        debug!(?config, "Loaded engine configuration");
        Ok(config)
    }

    /// Load configuration from a YAML settings file, on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise the
    /// errors of [`EngineConfig::from_settings_str`].
    pub fn from_settings_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(path = %path.display(), "Loading settings file");
        Self::from_settings_str(&content)
    }

    /// Parse settings YAML. Omitted sections keep their defaults; the
    /// `recipe` and `costs` tables must list every ingredient.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Settings` on malformed YAML, unknown keys or
    /// unknown channels, `ConfigError::Ingredient` when a `recipe` or
    /// `costs` table has an unknown, missing or negative ingredient, and
    /// the errors of [`EngineConfig::validate`].
    pub fn from_settings_str(yaml: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        let mut config = Self::default();
        settings.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the rates, ingredient tables and flavor prices are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Negative` for a negative labor rate or
    /// shipping fee, `ConfigError::Ingredient` for a negative ingredient
    /// value, and `ConfigError::TooLarge` for any amount above
    /// [`MAX_AMOUNT`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labor_rate < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "labor_rate",
                value: self.labor_rate,
            });
        }
        if self.shipping.fee < Decimal::ZERO {
            return Err(ConfigError::Negative {
                field: "shipping.fee",
                value: self.shipping.fee,
            });
        }
        at_most(self.labor_rate, || "labor_rate".to_owned())?;
        at_most(self.shipping.fee, || "shipping.fee".to_owned())?;

        for ingredient in Ingredient::ALL {
            let tables = [
                ("recipe", self.recipe.amount(ingredient)),
                ("costs", self.costs.unit_cost(ingredient)),
            ];
            for (table, value) in tables {
                if value < Decimal::ZERO {
                    return Err(IngredientError::Negative { ingredient, value }.into());
                }
                at_most(value, || format!("{table}.{ingredient}"))?;
            }
        }
        for flavor in Flavor::ALL {
            at_most(self.flavor_prices.price_of(flavor), || format!("flavor price of {flavor}"))?;
        }
        Ok(())
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("POLVO_LABOR_RATE") {
            self.labor_rate = parse_env("POLVO_LABOR_RATE", &rate)?;
        }
        if let Some(fee) = lookup("POLVO_SHIPPING_FEE") {
            self.shipping.fee = parse_env("POLVO_SHIPPING_FEE", &fee)?;
        }
        if let Some(channels) = lookup("POLVO_SHIPPING_CHANNELS") {
            self.shipping.channels = parse_channels(&channels)?;
        }
        if let Some(max) = lookup("POLVO_SHIPPING_MAX_BATCHES") {
            self.shipping.max_batches = parse_env("POLVO_SHIPPING_MAX_BATCHES", &max)?;
        }
        if let Some(rate) = lookup("POLVO_PRODUCTION_RATE") {
            self.production_rate = parse_env("POLVO_PRODUCTION_RATE", &rate)?;
        }
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an environment variable value.
fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn at_most(value: Decimal, field: impl FnOnce() -> String) -> Result<(), ConfigError> {
    if value > MAX_AMOUNT {
        return Err(ConfigError::TooLarge {
            field: field(),
            value,
            max: MAX_AMOUNT,
        });
    }
    Ok(())
}

/// Parse a comma-separated channel list. An empty list disables shipping.
fn parse_channels(value: &str) -> Result<BTreeSet<Channel>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<Channel>()
                .map_err(|_| ConfigError::UnknownChannel(name.to_string()))
        })
        .collect()
}

//! Flavors and per-flavor pricing.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A polvoron flavor sold by the bakery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    BrownButterBites,
    Milo,
    LolasMix,
    Cinnamon,
}

impl Flavor {
    /// Every flavor, in menu order.
    pub const ALL: [Self; 4] = [Self::BrownButterBites, Self::Milo, Self::LolasMix, Self::Cinnamon];

    /// Human-readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::BrownButterBites => "Brown Butter Bites",
            Self::Milo => "Milo",
            Self::LolasMix => "Lola's Mix",
            Self::Cinnamon => "Cinnamon",
        }
    }

    /// Price per batch used when no override is configured.
    #[must_use]
    pub fn default_price_per_batch(&self) -> Decimal {
        match self {
            Self::BrownButterBites | Self::Cinnamon => dec!(10),
            Self::Milo => dec!(12),
            Self::LolasMix => dec!(11),
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One flavor line of an order with a mixed flavor breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlavorLineItem {
    pub flavor: Flavor,
    /// Batches of this flavor.
    pub quantity: u32,
    pub price_per_batch: Decimal,
}

impl FlavorLineItem {
    /// Revenue of this line (`quantity × price_per_batch`).
    #[must_use]
    pub fn revenue(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.price_per_batch)
    }
}

/// Sum of batch quantities across line items.
///
/// Summed as `u64`, so no list of `u32` lines can overflow it.
#[must_use]
pub fn total_batches(items: &[FlavorLineItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity)).sum()
}

/// Display average price per batch for a flavor breakdown.
///
/// Returns zero when the breakdown has no batches.
#[must_use]
pub fn average_price_per_batch(items: &[FlavorLineItem]) -> Decimal {
    let batches = total_batches(items);
    if batches == 0 {
        return Decimal::ZERO;
    }
    let revenue = items
        .iter()
        .map(FlavorLineItem::revenue)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    revenue / Decimal::from(batches)
}

/// Per-flavor batch prices, with overrides layered on top of the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlavorPrices {
    overrides: BTreeMap<Flavor, Decimal>,
}

impl FlavorPrices {
    /// Override the price of one flavor.
    #[must_use]
    pub fn with_price(mut self, flavor: Flavor, price_per_batch: Decimal) -> Self {
        self.overrides.insert(flavor, price_per_batch);
        self
    }

    /// Current price for a flavor.
    #[must_use]
    pub fn price_of(&self, flavor: Flavor) -> Decimal {
        self.overrides
            .get(&flavor)
            .copied()
            .unwrap_or_else(|| flavor.default_price_per_batch())
    }

    /// Build priced line items from a flavor mix, skipping zero quantities.
    ///
    /// The output keeps the order of `mix`.
    #[must_use]
    pub fn price_mix(&self, mix: &[(Flavor, u32)]) -> Vec<FlavorLineItem> {
        mix.iter()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|&(flavor, quantity)| FlavorLineItem {
                flavor,
                quantity,
                price_per_batch: self.price_of(flavor),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prices() {
        let prices = FlavorPrices::default();
        assert_eq!(prices.price_of(Flavor::BrownButterBites), dec!(10));
        assert_eq!(prices.price_of(Flavor::Milo), dec!(12));
        assert_eq!(prices.price_of(Flavor::LolasMix), dec!(11));
        assert_eq!(prices.price_of(Flavor::Cinnamon), dec!(10));
    }

    #[test]
    fn test_override_price() {
        let prices = FlavorPrices::default().with_price(Flavor::Milo, dec!(14.5));
        assert_eq!(prices.price_of(Flavor::Milo), dec!(14.5));
        assert_eq!(prices.price_of(Flavor::Cinnamon), dec!(10));
    }

    #[test]
    fn test_price_mix_skips_empty_lines() {
        let items = FlavorPrices::default().price_mix(&[
            (Flavor::Milo, 3),
            (Flavor::Cinnamon, 0),
            (Flavor::LolasMix, 2),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(total_batches(&items), 5);
        assert_eq!(items[1].flavor, Flavor::LolasMix);
    }

    #[test]
    fn test_average_price() {
        let items = FlavorPrices::default().price_mix(&[(Flavor::Milo, 3), (Flavor::Cinnamon, 1)]);
        // (3 × 12 + 1 × 10) / 4
        assert_eq!(average_price_per_batch(&items), dec!(11.5));
        assert_eq!(average_price_per_batch(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_total_batches_does_not_wrap() {
        let items = FlavorPrices::default().price_mix(&[(Flavor::Milo, u32::MAX), (Flavor::Cinnamon, 1)]);
        assert_eq!(total_batches(&items), u64::from(u32::MAX) + 1);
    }

    #[test]
    fn test_flavor_serde_kebab_case() {
        assert_eq!(serde_json::to_string(&Flavor::LolasMix).unwrap(), "\"lolas-mix\"");
        let item: FlavorLineItem =
            serde_json::from_str(r#"{"flavor":"brown-butter-bites","quantity":2,"pricePerBatch":10}"#)
                .unwrap();
        assert_eq!(item.revenue(), dec!(20));
    }
}

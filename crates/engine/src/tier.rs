//! Qualitative ROI tiers used for labels and color coding.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// ROI band an order falls into.
///
/// Bands are half-open: `[0, 20)` is `Poor`, `[20, 40)` is `Fair`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiTier {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl RoiTier {
    /// Classify an ROI percentage.
    #[must_use]
    pub fn from_roi(roi: Decimal) -> Self {
        if roi < Decimal::ZERO {
            Self::Critical
        } else if roi < dec!(20) {
            Self::Poor
        } else if roi < dec!(40) {
            Self::Fair
        } else if roi < dec!(60) {
            Self::Good
        } else {
            Self::Excellent
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::Poor => "Poor",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Color token for the presentation layer (a theme variable name).
    #[must_use]
    pub const fn color_token(&self) -> &'static str {
        match self {
            Self::Critical => "roi-critical",
            Self::Poor => "roi-poor",
            Self::Fair => "roi-fair",
            Self::Good => "roi-good",
            Self::Excellent => "roi-excellent",
        }
    }
}

impl std::fmt::Display for RoiTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an ROI percentage.
#[must_use]
pub fn roi_label(roi: Decimal) -> &'static str {
    RoiTier::from_roi(roi).label()
}

/// Color token for an ROI percentage.
#[must_use]
pub fn roi_color(roi: Decimal) -> &'static str {
    RoiTier::from_roi(roi).color_token()
}

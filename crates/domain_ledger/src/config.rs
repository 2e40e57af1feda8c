//! Ledger tolerances

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Owed amounts at or below this are treated as settled.
pub const DEFAULT_SETTLE_TOLERANCE: Decimal = dec!(0.01);

/// Contributions at or below this are hidden from the chart.
pub const DEFAULT_CHART_THRESHOLD: Decimal = dec!(0.01);

/// Tunable thresholds for the ledger service
///
/// The two thresholds share a value by convention only; they guard
/// different things and are configured separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Settle-up is refused when the owed amount is `<=` this value
    #[serde(default = "default_settle_tolerance")]
    pub settle_tolerance: Decimal,
    /// Chart data only includes contributions `>` this value
    #[serde(default = "default_chart_threshold")]
    pub chart_threshold: Decimal,
}

fn default_settle_tolerance() -> Decimal {
    DEFAULT_SETTLE_TOLERANCE
}

fn default_chart_threshold() -> Decimal {
    DEFAULT_CHART_THRESHOLD
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            settle_tolerance: DEFAULT_SETTLE_TOLERANCE,
            chart_threshold: DEFAULT_CHART_THRESHOLD,
        }
    }
}

impl LedgerConfig {
    /// Overrides the settle-up tolerance
    pub fn with_settle_tolerance(mut self, tolerance: Decimal) -> Self {
        self.settle_tolerance = tolerance;
        self
    }

    /// Overrides the chart display threshold
    pub fn with_chart_threshold(mut self, threshold: Decimal) -> Self {
        self.chart_threshold = threshold;
        self
    }
}

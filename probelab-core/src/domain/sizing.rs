//! Position-sizing inputs handed to decision policies.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Sizing envelope a decision policy must respect when committing capital.
///
/// The simulator treats this as opaque context: it is passed through to the
/// policy on every opportunity and never interpreted by the engine itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingConfig {
    /// Nominal capital committed per executed trade.
    pub position_size: Decimal,
    /// Largest tolerable loss on a single trade.
    pub max_risk_per_trade: Decimal,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            position_size: dec!(500),
            max_risk_per_trade: dec!(50),
        }
    }
}

impl SizingConfig {
    /// Scale the envelope by a fraction, e.g. a 20% curtailment multiplier.
    pub fn scaled(&self, multiplier: Decimal) -> Self {
        Self {
            position_size: self.position_size * multiplier,
            max_risk_per_trade: self.max_risk_per_trade * multiplier,
        }
    }
}

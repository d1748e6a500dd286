//! MarketCondition — a synthetic snapshot of the market at one instant.

use chrono::{NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse market regime classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketRegime {
    Calm,
    Mixed,
    Volatile,
}

/// Snapshot of market conditions at a single sampled instant.
///
/// Produced by the condition generator, consumed by decision policies.
/// Immutable once generated: the same `(timestamp, seed)` pair always
/// reproduces the same condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketCondition {
    pub timestamp: NaiveDateTime,
    /// Underlying reference price.
    pub underlying_price: Decimal,
    /// Volatility index level.
    pub vix: f64,
    /// Signed trend score in [-1, 1]. Negative = downtrend.
    pub trend_score: f64,
    pub regime: MarketRegime,
}

impl MarketCondition {
    /// Hour component of the snapshot's timestamp (session-local).
    pub fn session_hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Normalized stress score in [0, 1].
    ///
    /// Blend of volatility level (vix mapped from [15, 65] onto [0, 1]) and
    /// trend magnitude, weighted 60/40. Calm midday conditions score near
    /// zero; a vix spike with a strong directional move approaches 1.
    pub fn stress_score(&self) -> f64 {
        let vol_component = ((self.vix - 15.0) / 50.0).clamp(0.0, 1.0);
        vol_component * 0.6 + self.trend_score.abs() * 0.4
    }
}

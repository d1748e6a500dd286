//! Synthetic market-condition generation.
//!
//! Conditions are produced one timestamp at a time from the seed hierarchy,
//! so any single slot can be regenerated without replaying the ones before
//! it. For a fixed master seed the full stream is reproducible.
//!
//! - Volatility draws from a uniform base band, widened near the open and
//!   into the late afternoon
//! - Regime is a weighted pick (calm-dominant)
//! - Trend score is uniform over [-1, 1]
//! - Underlying price jitters in whole cents around a configurable base

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{MarketCondition, MarketRegime};
use crate::rng::SeedHierarchy;

/// Uniform volatility band before intraday adjustment.
const VIX_BASE_RANGE: (f64, f64) = (18.0, 33.0);
/// Multiplier applied during the opening hour (09:xx).
const VIX_OPEN_MULT: f64 = 1.2;
/// Multiplier applied from 15:00 onward.
const VIX_LATE_MULT: f64 = 1.1;

/// Regime selection weights; must sum to 1.
const REGIME_WEIGHTS: [(MarketRegime, f64); 3] = [
    (MarketRegime::Calm, 0.6),
    (MarketRegime::Mixed, 0.3),
    (MarketRegime::Volatile, 0.1),
];

/// Deterministic generator of per-slot market conditions.
#[derive(Debug, Clone)]
pub struct MarketConditionGenerator {
    seeds: SeedHierarchy,
    base_price: Decimal,
}

impl MarketConditionGenerator {
    pub fn new(master_seed: u64) -> Self {
        Self::with_base_price(master_seed, dec!(450))
    }

    pub fn with_base_price(master_seed: u64, base_price: Decimal) -> Self {
        Self {
            seeds: SeedHierarchy::new(master_seed),
            base_price,
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.seeds.master_seed()
    }

    /// Generate the condition for one timestamp slot.
    ///
    /// Draw order is fixed (vix, trend, regime, price jitter); reordering
    /// draws would silently change every generated stream.
    pub fn condition_at(&self, timestamp: NaiveDateTime, counter: u64) -> MarketCondition {
        let mut rng = self.seeds.rng_for(timestamp, counter);

        let vix = adjust_vix(rng.gen_range(VIX_BASE_RANGE.0..VIX_BASE_RANGE.1), timestamp.hour());
        let trend_score = rng.gen_range(-1.0..=1.0);
        let regime = pick_regime(rng.gen_range(0.0..1.0));
        let jitter_cents: i64 = rng.gen_range(-750..=750);

        MarketCondition {
            timestamp,
            underlying_price: self.base_price + Decimal::new(jitter_cents, 2),
            vix,
            trend_score,
            regime,
        }
    }
}

fn adjust_vix(base: f64, hour: u32) -> f64 {
    if hour == 9 {
        base * VIX_OPEN_MULT
    } else if hour >= 15 {
        base * VIX_LATE_MULT
    } else {
        base
    }
}

/// Walk the cumulative weight table and return the first regime whose
/// cumulative weight reaches the draw; a draw exactly on a bound picks the
/// earlier regime. Floating round-off can leave a draw just above the final
/// sum, in which case the last entry wins.
fn pick_regime(draw: f64) -> MarketRegime {
    let mut cumulative = 0.0;
    for (regime, weight) in REGIME_WEIGHTS {
        cumulative += weight;
        if draw <= cumulative {
            return regime;
        }
    }
    REGIME_WEIGHTS[REGIME_WEIGHTS.len() - 1].0
}

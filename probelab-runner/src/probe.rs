//! Probe parameter design — turning crisis aggregates into a conservative
//! small-size trading configuration.
//!
//! A probe trades a fraction of normal size under hard loss caps, purely to
//! keep collecting live execution data through a stress window. Parameters
//! are derived from the catalogue aggregates by fixed conservative rules,
//! never fitted: the only inputs that move are the worst observed win rate
//! and the baseline trade frequency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use probelab_core::domain::CrisisPeriod;

use crate::crisis::CrisisAnalysis;

/// Hard floor for the target win rate.
pub const WIN_RATE_FLOOR: f64 = 0.60;
/// Margin added above the worst observed monthly win rate.
pub const WIN_RATE_MARGIN: f64 = 0.05;
/// Volatility level above which the probe regime activates.
pub const ACTIVATION_VIX: f64 = 22.0;
/// Stress score above which the probe regime activates.
pub const ACTIVATION_STRESS: f64 = 0.35;
/// Consecutive losses that activate the probe regime.
pub const ACTIVATION_STREAK: u32 = 2;

/// Complete probe configuration, derived in one shot from the catalogue.
///
/// Treat as immutable: to change a probe, re-derive it from a catalogue
/// rather than editing fields, so the bookkeeping section stays truthful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeParameterSet {
    // profit targets
    pub target_profit_per_trade: Decimal,
    pub target_monthly_profit: Decimal,
    pub target_win_rate: f64,

    // win-rate floors
    pub min_win_rate: f64,
    pub warn_win_rate: f64,

    // position limits
    pub position_size_multiplier: Decimal,
    pub max_concurrent_positions: u32,

    // loss caps
    pub max_trade_loss: Decimal,
    pub max_daily_loss: Decimal,
    pub max_monthly_loss: Decimal,

    // activation thresholds
    pub activate_above_vix: f64,
    pub activate_above_stress: f64,
    pub activate_after_consecutive_losses: u32,

    // early warning
    pub warning_loss_level: Decimal,
    pub warning_win_rate_floor: f64,
    pub warning_consecutive_losses: u32,

    // bookkeeping
    pub derived_from_crises: Vec<String>,
    pub worst_observed_win_rate: f64,
    pub baseline_avg_trades_per_month: f64,
}

/// Derive the probe configuration from a catalogue and its aggregates.
pub fn design_probe_parameters(
    catalogue: &[CrisisPeriod],
    analysis: &CrisisAnalysis,
) -> ProbeParameterSet {
    let target_win_rate = (analysis.worst_win_rate + WIN_RATE_MARGIN).max(WIN_RATE_FLOOR);
    let warn_win_rate = (target_win_rate - WIN_RATE_MARGIN).max(WIN_RATE_FLOOR);
    let max_monthly_loss = dec!(100);

    ProbeParameterSet {
        target_profit_per_trade: dec!(5),
        target_monthly_profit: dec!(25),
        target_win_rate,

        min_win_rate: WIN_RATE_FLOOR,
        warn_win_rate,

        position_size_multiplier: dec!(0.20),
        max_concurrent_positions: 1,

        max_trade_loss: dec!(10),
        max_daily_loss: dec!(25),
        max_monthly_loss,

        activate_above_vix: ACTIVATION_VIX,
        activate_above_stress: ACTIVATION_STRESS,
        activate_after_consecutive_losses: ACTIVATION_STREAK,

        warning_loss_level: max_monthly_loss / dec!(2),
        warning_win_rate_floor: WIN_RATE_FLOOR,
        warning_consecutive_losses: ACTIVATION_STREAK,

        derived_from_crises: catalogue.iter().map(|c| c.name.clone()).collect(),
        worst_observed_win_rate: analysis.worst_win_rate,
        baseline_avg_trades_per_month: analysis.avg_trades_per_month,
    }
}

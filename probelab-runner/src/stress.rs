//! Probe stress simulation — replaying a probe configuration against
//! catalogued crises.
//!
//! The estimate is deliberately coarse: effective trades per month are the
//! crisis's average trade count scaled by the probe multiplier, and every
//! trade is assumed to resolve at the probe's target win rate with the
//! fixed target profit / capped loss amounts. The monthly loss cap is a
//! hard circuit breaker applied to the estimate, not an emergent property.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use probelab_core::domain::{CrisisPeriod, MonthResult};

use crate::probe::ProbeParameterSet;

/// One month of the probe replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthEstimate {
    pub year: i32,
    pub month: u32,
    /// Estimated probe P&L, rounded to cents and cap-clamped.
    pub estimated_pnl: Decimal,
    pub actual_pnl: Decimal,
    /// True when the monthly cap clamped the raw estimate.
    pub cap_bound: bool,
}

/// Probe replay of a single crisis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisProbeOutcome {
    pub crisis_name: String,
    pub months: Vec<MonthEstimate>,
    pub simulated_total: Decimal,
    pub actual_total: Decimal,
    /// Fraction of the historical loss the probe avoids, in [0, 1].
    pub capital_preserved: f64,
    /// True when the simulated loss magnitude is at most half the actual.
    pub loss_prevented: bool,
    /// True when the crisis's indicators would have tripped a warning.
    pub early_warning_fired: bool,
    /// True when the activation thresholds fire on the crisis indicators.
    pub would_activate: bool,
}

/// Suite result across a catalogue plus the synthetic worst case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressReport {
    pub outcomes: Vec<CrisisProbeOutcome>,
    pub worst_case: CrisisProbeOutcome,
    /// Every outcome, worst case included, prevented its crisis.
    pub all_prevented: bool,
}

/// Synthetic beyond-history scenario: volatility at 100, half the market
/// gone, trade frequency in full panic. Exists so the cap clamp is
/// exercised against something worse than anything catalogued.
pub fn worst_case() -> CrisisPeriod {
    CrisisPeriod {
        name: "WORST_CASE".into(),
        start: chrono::NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or_default(),
        end: chrono::NaiveDate::from_ymd_opt(2030, 1, 31).unwrap_or_default(),
        total_loss: dec!(-2000),
        peak_vix: 100.0,
        market_decline_pct: 50.0,
        months: vec![MonthResult {
            year: 2030,
            month: 1,
            net_pnl: dec!(-2000),
            win_rate: 0.10,
            trade_count: 600,
        }],
    }
}

/// Replay the probe against one crisis.
pub fn run_probe_backtest(crisis: &CrisisPeriod, params: &ProbeParameterSet) -> CrisisProbeOutcome {
    let monthly_estimate = estimate_monthly_pnl(crisis, params);
    let cap = params.max_monthly_loss;
    let clamped = clamp_to_cap(monthly_estimate, cap);
    let cap_bound = clamped != monthly_estimate;

    let months: Vec<MonthEstimate> = crisis
        .months
        .iter()
        .map(|m| MonthEstimate {
            year: m.year,
            month: m.month,
            estimated_pnl: clamped,
            actual_pnl: m.net_pnl,
            cap_bound,
        })
        .collect();

    let simulated_total: Decimal = months.iter().map(|m| m.estimated_pnl).sum();
    let actual_total = crisis.total_loss;
    let simulated_loss = (-simulated_total).max(Decimal::ZERO);
    let actual_loss = (-actual_total).max(Decimal::ZERO);

    CrisisProbeOutcome {
        crisis_name: crisis.name.clone(),
        months,
        simulated_total,
        actual_total,
        capital_preserved: capital_preserved(simulated_loss, actual_loss),
        loss_prevented: simulated_loss * dec!(2) <= actual_loss,
        early_warning_fired: early_warning_fires(crisis, params),
        would_activate: crisis.peak_vix > params.activate_above_vix
            || crisis.stress_score() > params.activate_above_stress,
    }
}

/// Replay the whole catalogue and the synthetic worst case.
pub fn run_stress_suite(catalogue: &[CrisisPeriod], params: &ProbeParameterSet) -> StressReport {
    let outcomes: Vec<CrisisProbeOutcome> = catalogue
        .iter()
        .map(|c| run_probe_backtest(c, params))
        .collect();
    let worst = run_probe_backtest(&worst_case(), params);
    let all_prevented =
        outcomes.iter().all(|o| o.loss_prevented) && worst.loss_prevented;

    StressReport {
        outcomes,
        worst_case: worst,
        all_prevented,
    }
}

/// Raw monthly estimate before clamping: effective trades times the
/// target-win-rate-weighted per-trade P&L, rounded to cents.
fn estimate_monthly_pnl(crisis: &CrisisPeriod, params: &ProbeParameterSet) -> Decimal {
    if crisis.months.is_empty() {
        return Decimal::ZERO;
    }
    let avg_trades: f64 = crisis
        .months
        .iter()
        .map(|m| m.trade_count as f64)
        .sum::<f64>()
        / crisis.months.len() as f64;
    let multiplier = params.position_size_multiplier.to_f64().unwrap_or(0.0);
    let effective_trades = avg_trades * multiplier;

    let wr = params.target_win_rate;
    let profit = params.target_profit_per_trade.to_f64().unwrap_or(0.0);
    let loss = params.max_trade_loss.to_f64().unwrap_or(0.0);
    let per_trade = wr * profit - (1.0 - wr) * loss;

    Decimal::from_f64(effective_trades * per_trade)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2)
}

fn clamp_to_cap(estimate: Decimal, cap: Decimal) -> Decimal {
    if estimate < -cap {
        -cap
    } else if estimate > cap {
        cap
    } else {
        estimate
    }
}

/// 1 − simulated/actual loss, clamped to [0, 1]; full preservation when
/// the crisis had no actual loss.
fn capital_preserved(simulated_loss: Decimal, actual_loss: Decimal) -> f64 {
    if actual_loss == Decimal::ZERO {
        return 1.0;
    }
    let ratio = (simulated_loss / actual_loss).to_f64().unwrap_or(1.0);
    (1.0 - ratio).clamp(0.0, 1.0)
}

fn early_warning_fires(crisis: &CrisisPeriod, params: &ProbeParameterSet) -> bool {
    crisis.peak_vix >= params.activate_above_vix
        || crisis
            .months
            .iter()
            .any(|m| m.net_pnl < Decimal::ZERO && m.net_pnl.abs() >= params.warning_loss_level)
}

//! Risk-pattern analytics: loss streaks, daily loss extremes, and the
//! position-curtailment state machine.
//!
//! Like the performance metrics, everything here is a pure function over a
//! record sequence in timestamp order. Skipped slots never contribute.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use probelab_core::domain::ExecutionRecord;

/// One maximal block of consecutive losing trades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossRun {
    pub length: u32,
    /// Sum of the losing P&L in the run (negative).
    pub total: Decimal,
}

/// Consecutive-loss statistics over executed trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossRunStats {
    pub runs: Vec<LossRun>,
    pub max_length: u32,
    /// Mean run total (negative); zero when there were no losing runs.
    pub avg_total: Decimal,
}

/// Single scan over the records; a run still open at the end of the
/// sequence counts like any closed run.
pub fn consecutive_loss_runs(records: &[ExecutionRecord]) -> LossRunStats {
    let mut runs: Vec<LossRun> = Vec::new();
    let mut length = 0u32;
    let mut total = Decimal::ZERO;

    for record in records.iter().filter(|r| r.executed) {
        if record.is_loss() {
            length += 1;
            total += record.pnl;
        } else if length > 0 {
            runs.push(LossRun { length, total });
            length = 0;
            total = Decimal::ZERO;
        }
    }
    if length > 0 {
        runs.push(LossRun { length, total });
    }

    let max_length = runs.iter().map(|r| r.length).max().unwrap_or(0);
    let avg_total = if runs.is_empty() {
        Decimal::ZERO
    } else {
        runs.iter().map(|r| r.total).sum::<Decimal>() / Decimal::from(runs.len() as u64)
    };

    LossRunStats {
        runs,
        max_length,
        avg_total,
    }
}

/// Per-day P&L extremes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRiskStats {
    /// Net P&L per calendar day with at least one executed trade.
    pub daily_pnl: BTreeMap<NaiveDate, Decimal>,
    /// Most negative day total; zero when no day closed negative.
    pub largest_daily_loss: Decimal,
    /// Days whose loss magnitude strictly exceeds the alert threshold.
    pub alert_days: u32,
}

pub fn default_alert_threshold() -> Decimal {
    dec!(50)
}

/// Group executed P&L by calendar day and extract loss extremes.
pub fn daily_risk(records: &[ExecutionRecord], alert_threshold: Decimal) -> DailyRiskStats {
    let mut daily_pnl: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records.iter().filter(|r| r.executed) {
        *daily_pnl.entry(record.date()).or_insert(Decimal::ZERO) += record.pnl;
    }

    let largest_daily_loss = daily_pnl
        .values()
        .copied()
        .filter(|v| *v < Decimal::ZERO)
        .min()
        .unwrap_or(Decimal::ZERO);
    let alert_days = daily_pnl
        .values()
        .filter(|v| **v < Decimal::ZERO && v.abs() > alert_threshold)
        .count() as u32;

    DailyRiskStats {
        daily_pnl,
        largest_daily_loss,
        alert_days,
    }
}

// ─── Curtailment state machine ──────────────────────────────────────

/// Position-size schedule walked in response to losing days.
///
/// `tiers[0]` is full size; each losing day steps one tier deeper (floored
/// at the last entry) and any winning day resets to full size. The factor
/// applied to a day is the tier in force *entering* that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurtailmentConfig {
    pub tiers: Vec<Decimal>,
}

impl Default for CurtailmentConfig {
    fn default() -> Self {
        Self {
            tiers: vec![dec!(1.0), dec!(0.6), dec!(0.4), dec!(0.25)],
        }
    }
}

/// Outcome of walking the curtailment schedule over a daily P&L series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurtailmentReport {
    /// Days traded at reduced size.
    pub days_curtailed: u32,
    /// Deepest tier index reached (0 = never curtailed).
    pub deepest_tier: usize,
    /// Mean applied size factor across all days; 1.0 for an empty series.
    pub avg_size_factor: f64,
    /// Σ (1 − factor) × |day loss| over curtailed losing days.
    pub loss_avoided: Decimal,
}

/// Walk the schedule over per-day P&L in date order.
pub fn curtailment_walk(
    daily_pnl: &BTreeMap<NaiveDate, Decimal>,
    config: &CurtailmentConfig,
) -> CurtailmentReport {
    if config.tiers.is_empty() || daily_pnl.is_empty() {
        return CurtailmentReport {
            days_curtailed: 0,
            deepest_tier: 0,
            avg_size_factor: 1.0,
            loss_avoided: Decimal::ZERO,
        };
    }

    let mut tier = 0usize;
    let mut deepest = 0usize;
    let mut curtailed = 0u32;
    let mut factor_sum = Decimal::ZERO;
    let mut loss_avoided = Decimal::ZERO;

    for pnl in daily_pnl.values() {
        let factor = config.tiers[tier];
        factor_sum += factor;
        if factor < dec!(1.0) {
            curtailed += 1;
            if *pnl < Decimal::ZERO {
                loss_avoided += (dec!(1.0) - factor) * pnl.abs();
            }
        }

        if *pnl < Decimal::ZERO {
            tier = (tier + 1).min(config.tiers.len() - 1);
            deepest = deepest.max(tier);
        } else if *pnl > Decimal::ZERO {
            tier = 0;
        }
    }

    let avg = factor_sum / Decimal::from(daily_pnl.len() as u64);
    CurtailmentReport {
        days_curtailed: curtailed,
        deepest_tier: deepest,
        avg_size_factor: avg.to_f64().unwrap_or(1.0),
        loss_avoided,
    }
}

// ─── Aggregate ──────────────────────────────────────────────────────

/// Inputs for the risk scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub alert_threshold: Decimal,
    pub curtailment: CurtailmentConfig,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            alert_threshold: default_alert_threshold(),
            curtailment: CurtailmentConfig::default(),
        }
    }
}

/// Full risk-pattern report for one record sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub loss_runs: LossRunStats,
    pub daily: DailyRiskStats,
    pub curtailment: CurtailmentReport,
}

impl RiskReport {
    pub fn compute(records: &[ExecutionRecord], config: &RiskConfig) -> Self {
        let daily = daily_risk(records, config.alert_threshold);
        let curtailment = curtailment_walk(&daily.daily_pnl, &config.curtailment);
        Self {
            loss_runs: consecutive_loss_runs(records),
            daily,
            curtailment,
        }
    }
}

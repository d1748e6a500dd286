//! Performance analytics — pure functions over execution-record sequences.
//!
//! Every metric is a pure function: a slice of records in, scalar out.
//! Monetary statistics stay in `Decimal`; ratios and rates are `f64`.
//! No dependencies on the simulator, policies, or the orchestration layer.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use probelab_core::domain::ExecutionRecord;

/// Aggregate performance statistics for one simulated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub opportunity_count: usize,
    pub executed_count: usize,
    /// Executed / opportunities, in [0, 1].
    pub execution_rate: f64,
    pub win_count: usize,
    pub loss_count: usize,
    /// Wins / executed, in [0, 1].
    pub win_rate: f64,
    pub total_pnl: Decimal,
    /// Mean P&L per executed trade.
    pub avg_pnl: Decimal,
    pub avg_win: Decimal,
    /// Mean losing P&L (negative).
    pub avg_loss: Decimal,
    pub largest_win: Decimal,
    /// Most negative single-trade P&L.
    pub largest_loss: Decimal,
    /// Gross profit / gross loss; 0 when there are no losses.
    pub profit_factor: f64,
    /// Largest peak-to-trough drop of the cumulative P&L walk (≥ 0).
    pub max_drawdown: Decimal,
    /// Executed trades per calendar day.
    pub daily_counts: BTreeMap<NaiveDate, u32>,
    pub max_daily_count: u32,
    /// Largest executed-trade count in any ISO week.
    pub max_weekly_count: u32,
    pub spacing: SpacingStats,
}

/// Gap statistics between consecutive executed trades, in minutes.
///
/// All three are 0.0 when fewer than two trades executed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingStats {
    pub min_minutes: f64,
    pub avg_minutes: f64,
    pub max_minutes: f64,
}

impl PerformanceSummary {
    /// Compute all statistics for a record sequence.
    ///
    /// The time-sensitive metrics (drawdown, spacing) order the records by
    /// timestamp themselves; the slice can arrive in any order.
    pub fn compute(records: &[ExecutionRecord]) -> Self {
        let executed: Vec<&ExecutionRecord> = records.iter().filter(|r| r.executed).collect();
        let wins = executed.iter().filter(|r| r.is_win()).count();
        let losses = executed.iter().filter(|r| r.is_loss()).count();
        let total: Decimal = executed.iter().map(|r| r.pnl).sum();
        let daily = daily_counts(records);

        Self {
            opportunity_count: records.len(),
            executed_count: executed.len(),
            execution_rate: execution_rate(records),
            win_count: wins,
            loss_count: losses,
            win_rate: win_rate(records),
            total_pnl: total,
            avg_pnl: if executed.is_empty() {
                Decimal::ZERO
            } else {
                total / Decimal::from(executed.len() as u64)
            },
            avg_win: avg_win(records),
            avg_loss: avg_loss(records),
            largest_win: largest_win(records),
            largest_loss: largest_loss(records),
            profit_factor: profit_factor(records),
            max_drawdown: max_drawdown(records),
            max_daily_count: daily.values().copied().max().unwrap_or(0),
            max_weekly_count: max_trades_per_week(records),
            daily_counts: daily,
            spacing: spacing_stats(records),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Fraction of opportunities that produced a trade.
pub fn execution_rate(records: &[ExecutionRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let executed = records.iter().filter(|r| r.executed).count();
    executed as f64 / records.len() as f64
}

/// Fraction of executed trades that won. 0.0 when nothing executed.
pub fn win_rate(records: &[ExecutionRecord]) -> f64 {
    let executed = records.iter().filter(|r| r.executed).count();
    if executed == 0 {
        return 0.0;
    }
    let wins = records.iter().filter(|r| r.is_win()).count();
    wins as f64 / executed as f64
}

/// Mean winning P&L; zero when there are no winners.
pub fn avg_win(records: &[ExecutionRecord]) -> Decimal {
    decimal_mean(records.iter().filter(|r| r.is_win()).map(|r| r.pnl))
}

/// Mean losing P&L (negative); zero when there are no losers.
pub fn avg_loss(records: &[ExecutionRecord]) -> Decimal {
    decimal_mean(records.iter().filter(|r| r.is_loss()).map(|r| r.pnl))
}

/// Largest single-trade win; zero when there are no winners.
pub fn largest_win(records: &[ExecutionRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| r.is_win())
        .map(|r| r.pnl)
        .max()
        .unwrap_or(Decimal::ZERO)
}

/// Most negative single-trade P&L; zero when there are no losers.
pub fn largest_loss(records: &[ExecutionRecord]) -> Decimal {
    records
        .iter()
        .filter(|r| r.is_loss())
        .map(|r| r.pnl)
        .min()
        .unwrap_or(Decimal::ZERO)
}

/// Profit factor: gross profits / gross losses.
///
/// Returns 0.0 when the record set has no losses, including the empty set.
pub fn profit_factor(records: &[ExecutionRecord]) -> f64 {
    let gross_profit: Decimal = records.iter().filter(|r| r.is_win()).map(|r| r.pnl).sum();
    let gross_loss: Decimal = records
        .iter()
        .filter(|r| r.is_loss())
        .map(|r| r.pnl.abs())
        .sum();

    if gross_loss == Decimal::ZERO {
        return 0.0;
    }
    (gross_profit / gross_loss).to_f64().unwrap_or(0.0)
}

/// Maximum drawdown of the cumulative P&L walk, as a non-negative magnitude.
///
/// The walk runs in timestamp order regardless of slice order. It starts at
/// zero, so an opening losing streak counts as drawdown from the zero peak.
pub fn max_drawdown(records: &[ExecutionRecord]) -> Decimal {
    let mut executed: Vec<&ExecutionRecord> = records.iter().filter(|r| r.executed).collect();
    executed.sort_by_key(|r| r.timestamp);

    let mut equity = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;

    for record in executed {
        equity += record.pnl;
        if equity > peak {
            peak = equity;
        }
        let dd = peak - equity;
        if dd > max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Executed trades per calendar day, keyed in date order.
pub fn daily_counts(records: &[ExecutionRecord]) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| r.executed) {
        *counts.entry(record.date()).or_insert(0u32) += 1;
    }
    counts
}

/// Largest executed-trade count in any ISO week.
pub fn max_trades_per_week(records: &[ExecutionRecord]) -> u32 {
    let mut counts: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for record in records.iter().filter(|r| r.executed) {
        let week = record.date().iso_week();
        *counts.entry((week.year(), week.week())).or_insert(0) += 1;
    }
    counts.values().copied().max().unwrap_or(0)
}

/// Min/avg/max gap between consecutive executed trades, in minutes.
///
/// Executions are sorted by timestamp first, so the gaps are always
/// non-negative whatever order the slice arrives in.
pub fn spacing_stats(records: &[ExecutionRecord]) -> SpacingStats {
    let mut times: Vec<NaiveDateTime> = records
        .iter()
        .filter(|r| r.executed)
        .map(|r| r.timestamp)
        .collect();
    if times.len() < 2 {
        return SpacingStats {
            min_minutes: 0.0,
            avg_minutes: 0.0,
            max_minutes: 0.0,
        };
    }
    times.sort_unstable();

    let gaps: Vec<f64> = times
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds() as f64 / 60.0)
        .collect();

    let min = gaps.iter().copied().fold(f64::INFINITY, f64::min);
    let max = gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = gaps.iter().sum::<f64>() / gaps.len() as f64;

    SpacingStats {
        min_minutes: min,
        avg_minutes: avg,
        max_minutes: max,
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn decimal_mean(values: impl Iterator<Item = Decimal>) -> Decimal {
    let collected: Vec<Decimal> = values.collect();
    if collected.is_empty() {
        return Decimal::ZERO;
    }
    collected.iter().sum::<Decimal>() / Decimal::from(collected.len() as u64)
}

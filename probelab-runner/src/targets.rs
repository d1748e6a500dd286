//! Acceptance-target validation over a performance summary.
//!
//! Seven fixed checks, each a literal threshold. The output is a report
//! card: nothing downstream gates on it, and a failing verdict never stops
//! a run.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::metrics::PerformanceSummary;

pub const MAX_WEEKLY_TRADES: u32 = 250;
pub const MAX_DAILY_TRADES: u32 = 50;
pub const MIN_SPACING_MINUTES: f64 = 6.0;
pub const MIN_WIN_RATE: f64 = 0.90;
pub const EXECUTION_RATE_BAND: (f64, f64) = (0.30, 0.70);

/// One named check with its observed value rendered for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetCheck {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

/// Three-tier reading of the pass count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Ready,
    NeedsMinorAdjustment,
    NeedsSignificantRefinement,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Ready => "ready",
            Verdict::NeedsMinorAdjustment => "needs minor adjustment",
            Verdict::NeedsSignificantRefinement => "needs significant refinement",
        }
    }
}

/// Full report card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetReport {
    pub checks: Vec<TargetCheck>,
    pub passed_count: usize,
    pub verdict: Verdict,
}

/// Run the fixed table of checks against one summary.
pub fn validate_targets(summary: &PerformanceSummary) -> TargetReport {
    // Spacing is only measurable with two or more executions; with fewer,
    // no spacing violation is possible and the check passes vacuously.
    let spacing_ok =
        summary.executed_count < 2 || summary.spacing.min_minutes >= MIN_SPACING_MINUTES;

    let checks = vec![
        check(
            "weekly_volume",
            summary.max_weekly_count <= MAX_WEEKLY_TRADES,
            format!(
                "max {} trades/week (limit {})",
                summary.max_weekly_count, MAX_WEEKLY_TRADES
            ),
        ),
        check(
            "daily_volume",
            summary.max_daily_count <= MAX_DAILY_TRADES,
            format!(
                "max {} trades/day (limit {})",
                summary.max_daily_count, MAX_DAILY_TRADES
            ),
        ),
        check(
            "trade_spacing",
            spacing_ok,
            format!(
                "min spacing {:.1} min (floor {:.1})",
                summary.spacing.min_minutes, MIN_SPACING_MINUTES
            ),
        ),
        check(
            "win_rate",
            summary.win_rate >= MIN_WIN_RATE,
            format!("win rate {:.3} (floor {:.2})", summary.win_rate, MIN_WIN_RATE),
        ),
        check(
            "avg_trade_pnl",
            summary.avg_pnl >= dec!(20),
            format!("avg P&L {} (floor 20)", summary.avg_pnl.round_dp(2)),
        ),
        check(
            "max_drawdown",
            summary.max_drawdown <= dec!(100),
            format!("drawdown {} (cap 100)", summary.max_drawdown.round_dp(2)),
        ),
        check(
            "execution_rate",
            summary.execution_rate >= EXECUTION_RATE_BAND.0
                && summary.execution_rate <= EXECUTION_RATE_BAND.1,
            format!(
                "execution rate {:.3} (band {:.2}..{:.2})",
                summary.execution_rate, EXECUTION_RATE_BAND.0, EXECUTION_RATE_BAND.1
            ),
        ),
    ];

    let passed_count = checks.iter().filter(|c| c.passed).count();
    let verdict = match passed_count {
        n if n >= 6 => Verdict::Ready,
        5 => Verdict::NeedsMinorAdjustment,
        _ => Verdict::NeedsSignificantRefinement,
    };

    TargetReport {
        checks,
        passed_count,
        verdict,
    }
}

fn check(name: &str, passed: bool, detail: String) -> TargetCheck {
    TargetCheck {
        name: name.to_string(),
        passed,
        detail,
    }
}

//! Probe-design reporting — parameter files and crisis readouts.
//!
//! Two renderers:
//! - `render_parameter_toml()`: a derived [`ProbeParameterSet`] as a TOML
//!   document, ready to drop into a live configuration.
//! - `generate_crisis_report()`: Markdown covering the catalogue aggregates,
//!   the derived parameters, and the per-crisis probe outcomes.

use anyhow::{Context, Result};

use crate::crisis::CrisisAnalysis;
use crate::probe::ProbeParameterSet;
use crate::stress::{CrisisProbeOutcome, StressReport};

/// Render a parameter set as a commented TOML document.
pub fn render_parameter_toml(params: &ProbeParameterSet) -> Result<String> {
    let body = toml::to_string_pretty(params).context("failed to serialize probe parameters")?;

    let mut out = String::with_capacity(body.len() + 256);
    out.push_str("# Probe parameters derived from historical crisis periods.\n");
    out.push_str(&format!(
        "# Crises: {}\n",
        params.derived_from_crises.join(", ")
    ));
    out.push_str(&format!(
        "# Worst observed win rate: {:.2}\n\n",
        params.worst_observed_win_rate
    ));
    out.push_str(&body);
    Ok(out)
}

/// Generate a Markdown report for a crisis analysis and stress run.
pub fn generate_crisis_report(
    analysis: &CrisisAnalysis,
    stress: &StressReport,
    params: &ProbeParameterSet,
) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Crisis Probe Report\n\n");

    // Catalogue aggregates
    md.push_str("## Historical Catalogue\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Crises Analyzed | {} |\n",
        params.derived_from_crises.len()
    ));
    md.push_str(&format!(
        "| Total Catalogued Loss | ${} |\n",
        analysis.total_catalogued_loss
    ));
    md.push_str(&format!(
        "| Avg Win Rate | {:.1}% |\n",
        analysis.avg_win_rate * 100.0
    ));
    md.push_str(&format!(
        "| Worst Win Rate | {:.1}% |\n",
        analysis.worst_win_rate * 100.0
    ));
    let (worst_crisis, worst_month) = &analysis.worst_month;
    md.push_str(&format!(
        "| Worst Month | {} {}-{:02} (${}) |\n",
        worst_crisis, worst_month.year, worst_month.month, worst_month.net_pnl
    ));
    md.push_str(&format!(
        "| Avg Loss per Trade | ${} |\n",
        analysis.avg_loss_per_trade
    ));
    md.push_str(&format!(
        "| Avg Trades per Month | {:.1} |\n",
        analysis.avg_trades_per_month
    ));
    md.push('\n');

    // Derived parameters
    md.push_str("## Probe Parameters\n\n");
    md.push_str("| Parameter | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Target Win Rate | {:.1}% |\n",
        params.target_win_rate * 100.0
    ));
    md.push_str(&format!(
        "| Position Size Multiplier | {} |\n",
        params.position_size_multiplier
    ));
    md.push_str(&format!(
        "| Per-Trade / Daily / Monthly Loss Caps | ${} / ${} / ${} |\n",
        params.max_trade_loss, params.max_daily_loss, params.max_monthly_loss
    ));
    md.push_str(&format!(
        "| Activation | VIX > {} or stress > {} or {} consecutive losses |\n",
        params.activate_above_vix,
        params.activate_above_stress,
        params.activate_after_consecutive_losses
    ));
    md.push_str(&format!(
        "| Warning | loss >= ${} or win rate < {:.1}% or {} straight losses |\n",
        params.warning_loss_level,
        params.warning_win_rate_floor * 100.0,
        params.warning_consecutive_losses
    ));
    md.push('\n');

    // Stress outcomes
    md.push_str("## Stress Outcomes\n\n");
    md.push_str("| Crisis | Actual | Probe | Preserved | Prevented | Early Warning |\n");
    md.push_str("| --- | --- | --- | --- | --- | --- |\n");
    for outcome in &stress.outcomes {
        md.push_str(&outcome_row(outcome));
    }
    md.push_str(&outcome_row(&stress.worst_case));
    md.push('\n');

    if stress.all_prevented {
        md.push_str("All catalogued crises held below half of their actual losses.\n");
    } else {
        md.push_str("**Some catalogued crises were NOT prevented at probe scale.**\n");
    }

    md
}

fn outcome_row(outcome: &CrisisProbeOutcome) -> String {
    format!(
        "| {} | ${} | ${} | {:.1}% | {} | {} |\n",
        outcome.crisis_name,
        outcome.actual_total,
        outcome.simulated_total,
        outcome.capital_preserved * 100.0,
        if outcome.loss_prevented { "yes" } else { "no" },
        if outcome.early_warning_fired {
            "fired"
        } else {
            "quiet"
        }
    )
}

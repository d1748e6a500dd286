//! Reporting and export — JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for session results:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: execution tape and daily P&L for external analysis tools
//! - **Markdown**: human-readable single-session reports
//!
//! All persisted artifacts include a `schema_version` field. Unknown versions
//! are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use probelab_core::domain::ExecutionRecord;

use crate::runner::{SessionResult, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `SessionResult` to pretty JSON.
pub fn export_json(result: &SessionResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize SessionResult to JSON")
}

/// Deserialize a `SessionResult` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<SessionResult> {
    let result: SessionResult =
        serde_json::from_str(json).context("failed to deserialize SessionResult from JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the execution tape as CSV.
///
/// Columns: opportunity_id, timestamp, executed, pnl
pub fn export_records_csv(records: &[ExecutionRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["opportunity_id", "timestamp", "executed", "pnl"])?;
    for r in records {
        wtr.write_record([
            &r.opportunity_id.to_string(),
            &r.timestamp.to_string(),
            &r.executed.to_string(),
            &r.pnl.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the per-day view as CSV with date, trade count, and net P&L columns.
pub fn export_daily_csv(result: &SessionResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["date", "trades", "net_pnl"])?;
    for (date, pnl) in &result.risk.daily.daily_pnl {
        let trades = result.summary.daily_counts.get(date).copied().unwrap_or(0);
        wtr.write_record([&date.to_string(), &trades.to_string(), &pnl.to_string()])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for a single session.
///
/// Creates a directory named `session_{id}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json` — the full `SessionResult`
/// - `records.csv` — the execution tape (empty tape writes a header-only file)
/// - `daily.csv` — per-day trade counts and net P&L
///
/// Returns the path to the created directory.
pub fn save_artifacts(result: &SessionResult, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "session_{}_{}",
        short_id(&result.session_id),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let json = export_json(result)?;
    std::fs::write(run_dir.join("manifest.json"), &json)?;

    let records_csv = export_records_csv(&result.records)?;
    std::fs::write(run_dir.join("records.csv"), &records_csv)?;

    let daily_csv = export_daily_csv(result)?;
    std::fs::write(run_dir.join("daily.csv"), &daily_csv)?;

    Ok(run_dir)
}

/// Load a `SessionResult` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<SessionResult> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

fn short_id(session_id: &str) -> &str {
    session_id.get(..12).unwrap_or(session_id)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report for a single session.
pub fn generate_report(result: &SessionResult) -> String {
    let mut md = String::with_capacity(2048);

    md.push_str("# Session Report\n\n");

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Session | {} |\n", short_id(&result.session_id)));
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        result.config.session.start_date, result.config.session.end_date
    ));
    md.push_str(&format!(
        "| Cadence | every {} min |\n",
        result.config.session.interval_minutes
    ));
    md.push_str(&format!("| Seed | {} |\n", result.config.session.seed));
    md.push_str(&format!(
        "| Opportunities | {} ({} executed) |\n",
        result.summary.opportunity_count, result.summary.executed_count
    ));
    if result.policy_failures > 0 {
        md.push_str(&format!(
            "| Policy Failures | **{}** |\n",
            result.policy_failures
        ));
    }
    md.push('\n');

    // Performance Summary
    let s = &result.summary;
    md.push_str("## Performance Summary\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Execution Rate | {:.1}% |\n",
        s.execution_rate * 100.0
    ));
    md.push_str(&format!("| Win Rate | {:.1}% |\n", s.win_rate * 100.0));
    md.push_str(&format!(
        "| Wins / Losses | {} / {} |\n",
        s.win_count, s.loss_count
    ));
    md.push_str(&format!("| Total P&L | ${} |\n", s.total_pnl));
    md.push_str(&format!("| Avg P&L per Trade | ${} |\n", s.avg_pnl));
    md.push_str(&format!(
        "| Avg Win / Avg Loss | ${} / ${} |\n",
        s.avg_win, s.avg_loss
    ));
    md.push_str(&format!(
        "| Largest Win / Loss | ${} / ${} |\n",
        s.largest_win, s.largest_loss
    ));
    md.push_str(&format!("| Profit Factor | {:.2} |\n", s.profit_factor));
    md.push_str(&format!("| Max Drawdown | ${} |\n", s.max_drawdown));
    md.push_str(&format!(
        "| Busiest Day / Week | {} / {} trades |\n",
        s.max_daily_count, s.max_weekly_count
    ));
    md.push_str(&format!(
        "| Trade Spacing | min {:.1} / avg {:.1} / max {:.1} min |\n",
        s.spacing.min_minutes, s.spacing.avg_minutes, s.spacing.max_minutes
    ));
    md.push('\n');

    // Risk Patterns
    let r = &result.risk;
    md.push_str("## Risk Patterns\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!(
        "| Consecutive-Loss Runs | {} (max length {}) |\n",
        r.loss_runs.runs.len(),
        r.loss_runs.max_length
    ));
    md.push_str(&format!(
        "| Avg Run Total | ${} |\n",
        r.loss_runs.avg_total
    ));
    md.push_str(&format!(
        "| Largest Daily Loss | ${} |\n",
        r.daily.largest_daily_loss
    ));
    md.push_str(&format!("| Alert Days | {} |\n", r.daily.alert_days));
    md.push_str(&format!(
        "| Days Curtailed | {} (deepest tier {}) |\n",
        r.curtailment.days_curtailed, r.curtailment.deepest_tier
    ));
    md.push_str(&format!(
        "| Avg Size Factor | {:.2} |\n",
        r.curtailment.avg_size_factor
    ));
    md.push_str(&format!(
        "| Loss Avoided by Curtailment | ${} |\n",
        r.curtailment.loss_avoided
    ));
    md.push('\n');

    // Target Checklist
    md.push_str("## Target Checklist\n\n");
    md.push_str("| Check | Status | Detail |\n");
    md.push_str("| --- | --- | --- |\n");
    for check in &result.targets.checks {
        md.push_str(&format!(
            "| {} | {} | {} |\n",
            check.name,
            if check.passed { "PASS" } else { "FAIL" },
            check.detail
        ));
    }
    md.push('\n');
    md.push_str(&format!(
        "**Verdict: {}** ({} of {} checks passed)\n",
        result.targets.verdict.label(),
        result.targets.passed_count,
        result.targets.checks.len()
    ));

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::runner::run_session;

    fn sample_result() -> SessionResult {
        let mut config = SessionConfig::sample_week();
        config.keep_records = true;
        run_session(&config).unwrap()
    }

    #[test]
    fn json_roundtrip_preserves_schema_version() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let restored = import_json(&json).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.session_id, result.session_id);
        assert_eq!(restored.summary.total_pnl, result.summary.total_pnl);
        assert_eq!(restored.records.len(), result.records.len());
    }

    #[test]
    fn import_rejects_future_schema_version() {
        let mut result = sample_result();
        result.schema_version = 99;
        let json = export_json(&result).unwrap();
        assert!(import_json(&json).is_err());
    }

    #[test]
    fn missing_schema_version_defaults_to_current() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let restored = import_json(&value.to_string()).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn records_csv_has_one_row_per_slot() {
        let result = sample_result();
        let csv_text = export_records_csv(&result.records).unwrap();
        let lines = csv_text.lines().count();
        assert_eq!(lines, result.records.len() + 1);
        assert!(csv_text.starts_with("opportunity_id,timestamp,executed,pnl"));
    }

    #[test]
    fn daily_csv_covers_every_trading_day() {
        let result = sample_result();
        let csv_text = export_daily_csv(&result).unwrap();
        let lines = csv_text.lines().count();
        assert_eq!(lines, result.risk.daily.daily_pnl.len() + 1);
    }

    #[test]
    fn artifacts_roundtrip() {
        let result = sample_result();
        let dir = tempfile::tempdir().unwrap();
        let run_dir = save_artifacts(&result, dir.path()).unwrap();

        assert!(run_dir.join("manifest.json").exists());
        assert!(run_dir.join("records.csv").exists());
        assert!(run_dir.join("daily.csv").exists());

        let loaded = load_artifacts(&run_dir).unwrap();
        assert_eq!(loaded.schema_version, SCHEMA_VERSION);
        assert_eq!(loaded.session_id, result.session_id);
    }

    #[test]
    fn report_mentions_verdict_and_session() {
        let result = sample_result();
        let md = generate_report(&result);
        assert!(md.starts_with("# Session Report"));
        assert!(md.contains(short_id(&result.session_id)));
        assert!(md.contains("**Verdict:"));
        assert!(md.contains("| Execution Rate |"));
    }
}

//! ProbeLab CLI — session simulation, crisis probe design, config templates.
//!
//! Commands:
//! - `simulate` — run a session from a TOML config (or the built-in sample week)
//! - `crisis` — analyze the crisis catalogue and design probe parameters
//! - `template` — emit a starter session config

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use probelab_runner::config::SessionConfig;
use probelab_runner::crisis::{load_catalogue_or_builtin, CrisisAnalysis};
use probelab_runner::export::{generate_report, save_artifacts};
use probelab_runner::probe::{design_probe_parameters, ProbeParameterSet};
use probelab_runner::reporting::{generate_crisis_report, render_parameter_toml};
use probelab_runner::runner::{run_session, SessionResult};
use probelab_runner::stress::{run_stress_suite, StressReport};

#[derive(Parser)]
#[command(
    name = "probelab",
    about = "ProbeLab CLI — probe-scale strategy risk analytics"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation session and save its artifacts.
    Simulate {
        /// Path to a TOML config file. Defaults to the built-in sample week.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// Override the end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Override the master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Override the sampling interval in minutes.
        #[arg(long)]
        interval: Option<i64>,

        /// Keep the full execution tape in the saved artifacts.
        #[arg(long, default_value_t = false)]
        records: bool,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Also write a Markdown report into the artifact directory.
        #[arg(long, default_value_t = false)]
        report: bool,
    },
    /// Analyze the crisis catalogue and design probe parameters.
    Crisis {
        /// Path to a crisis catalogue JSON file. Defaults to the built-in catalogue.
        #[arg(long)]
        catalogue: Option<PathBuf>,

        /// Output directory for the parameter file and report.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Emit a starter session config as TOML.
    Template {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config,
            start,
            end,
            seed,
            interval,
            records,
            output_dir,
            report,
        } => run_simulate(config, start, end, seed, interval, records, output_dir, report),
        Commands::Crisis {
            catalogue,
            output_dir,
        } => run_crisis(catalogue, output_dir),
        Commands::Template { out } => run_template(out),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_simulate(
    config_path: Option<PathBuf>,
    start: Option<String>,
    end: Option<String>,
    seed: Option<u64>,
    interval: Option<i64>,
    records: bool,
    output_dir: PathBuf,
    report: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => SessionConfig::from_file(&path)?,
        None => SessionConfig::sample_week(),
    };

    if let Some(s) = start.as_deref() {
        config.session.start_date = NaiveDate::parse_from_str(s, "%Y-%m-%d")?;
    }
    if let Some(e) = end.as_deref() {
        config.session.end_date = NaiveDate::parse_from_str(e, "%Y-%m-%d")?;
    }
    if let Some(seed) = seed {
        config.session.seed = seed;
    }
    if let Some(interval) = interval {
        config.session.interval_minutes = interval;
    }
    if records {
        config.keep_records = true;
    }
    config.validate()?;

    let result = run_session(&config)?;

    print_summary(&result);

    let run_dir = save_artifacts(&result, &output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());

    if report {
        let md = generate_report(&result);
        let path = run_dir.join("report.md");
        std::fs::write(&path, md)?;
        println!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn run_crisis(catalogue_path: Option<PathBuf>, output_dir: PathBuf) -> Result<()> {
    let catalogue = load_catalogue_or_builtin(catalogue_path.as_deref())?;
    let Some(analysis) = CrisisAnalysis::aggregate(&catalogue) else {
        bail!("crisis catalogue has no analyzable periods");
    };

    let params = design_probe_parameters(&catalogue, &analysis);
    let stress = run_stress_suite(&catalogue, &params);

    print_crisis_summary(&analysis, &stress, &params);

    std::fs::create_dir_all(&output_dir)?;

    let params_path = output_dir.join("probe_params.toml");
    std::fs::write(&params_path, render_parameter_toml(&params)?)?;
    println!("Parameters saved to: {}", params_path.display());

    let report_path = output_dir.join("crisis_report.md");
    std::fs::write(&report_path, generate_crisis_report(&analysis, &stress, &params))?;
    println!("Report saved to: {}", report_path.display());

    if !stress.all_prevented {
        eprintln!("WARNING: probe scale does not prevent every catalogued crisis");
    }

    Ok(())
}

fn run_template(out: Option<PathBuf>) -> Result<()> {
    let template = SessionConfig::sample_week().to_toml()?;
    match out {
        Some(path) => {
            std::fs::write(&path, template)?;
            println!("Template written to: {}", path.display());
        }
        None => print!("{template}"),
    }
    Ok(())
}

fn print_summary(result: &SessionResult) {
    let short_id = result.session_id.get(..12).unwrap_or(&result.session_id);
    let s = &result.summary;
    let r = &result.risk;

    println!();
    println!("=== Session Result ===");
    println!("Session:        {short_id}");
    println!(
        "Period:         {} to {}",
        result.config.session.start_date, result.config.session.end_date
    );
    println!("Seed:           {}", result.config.session.seed);
    println!(
        "Opportunities:  {} ({} executed)",
        s.opportunity_count, s.executed_count
    );
    if result.policy_failures > 0 {
        println!("Policy Failures:{}", result.policy_failures);
    }
    println!();
    println!("--- Performance ---");
    println!("Execution Rate: {:.1}%", s.execution_rate * 100.0);
    println!("Win Rate:       {:.1}%", s.win_rate * 100.0);
    println!("Total P&L:      ${}", s.total_pnl);
    println!("Avg P&L:        ${}", s.avg_pnl);
    println!("Profit Factor:  {:.2}", s.profit_factor);
    println!("Max Drawdown:   ${}", s.max_drawdown);
    println!(
        "Spacing:        min {:.1} / avg {:.1} min",
        s.spacing.min_minutes, s.spacing.avg_minutes
    );
    println!();
    println!("--- Risk ---");
    println!(
        "Loss Runs:      {} (max length {})",
        r.loss_runs.runs.len(),
        r.loss_runs.max_length
    );
    println!("Worst Day:      ${}", r.daily.largest_daily_loss);
    println!("Alert Days:     {}", r.daily.alert_days);
    println!();
    println!("--- Targets ---");
    for check in &result.targets.checks {
        println!(
            "[{}] {:<16} {}",
            if check.passed { "PASS" } else { "FAIL" },
            check.name,
            check.detail
        );
    }
    println!(
        "Verdict:        {} ({} of {} passed)",
        result.targets.verdict.label(),
        result.targets.passed_count,
        result.targets.checks.len()
    );
    println!();
}

fn print_crisis_summary(
    analysis: &CrisisAnalysis,
    stress: &StressReport,
    params: &ProbeParameterSet,
) {
    println!();
    println!("=== Crisis Probe Design ===");
    println!("Crises:         {}", params.derived_from_crises.join(", "));
    println!(
        "Worst Win Rate: {:.1}% ({} {}-{:02})",
        analysis.worst_win_rate * 100.0,
        analysis.worst_month.0,
        analysis.worst_month.1.year,
        analysis.worst_month.1.month
    );
    println!("Target Win Rate:{:.1}%", params.target_win_rate * 100.0);
    println!("Size Multiplier:{}", params.position_size_multiplier);
    println!(
        "Loss Caps:      ${} trade / ${} day / ${} month",
        params.max_trade_loss, params.max_daily_loss, params.max_monthly_loss
    );
    println!();
    println!("--- Stress Outcomes ---");
    for outcome in stress
        .outcomes
        .iter()
        .chain(std::iter::once(&stress.worst_case))
    {
        println!(
            "{:<18} actual {:>9}  probe {:>8}  preserved {:>5.1}%  {}",
            outcome.crisis_name,
            outcome.actual_total,
            outcome.simulated_total,
            outcome.capital_preserved * 100.0,
            if outcome.loss_prevented {
                "prevented"
            } else {
                "NOT prevented"
            }
        );
    }
    println!();
}

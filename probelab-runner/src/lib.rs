//! ProbeLab Runner — session orchestration, analytics, and probe design.
//!
//! This crate builds on `probelab-core` to provide:
//! - Session runner wiring stream construction, simulation, and analytics
//! - Performance metrics (execution rate, win rate, drawdown, spacing)
//! - Risk-pattern scans (loss runs, daily extremes, curtailment)
//! - Historical crisis catalogue with aggregate analysis
//! - Probe parameter design and crisis stress replay
//! - Acceptance-target validation with a three-tier verdict
//! - JSON/CSV/Markdown artifact export

pub mod config;
pub mod crisis;
pub mod export;
pub mod metrics;
pub mod policy;
pub mod probe;
pub mod reporting;
pub mod risk;
pub mod runner;
pub mod stress;
pub mod targets;

pub use config::{ConfigError, SessionConfig, SessionId, SessionWindow};
pub use crisis::{
    builtin_catalogue, load_catalogue, load_catalogue_or_builtin, validate_catalogue,
    CatalogueError, CrisisAnalysis,
};
pub use export::{
    export_json, generate_report, import_json, load_artifacts, save_artifacts,
};
pub use metrics::{PerformanceSummary, SpacingStats};
pub use policy::{ProbePolicy, ProbePolicyConfig};
pub use probe::{design_probe_parameters, ProbeParameterSet};
pub use reporting::{generate_crisis_report, render_parameter_toml};
pub use risk::{CurtailmentConfig, CurtailmentReport, LossRunStats, RiskConfig, RiskReport};
pub use runner::{
    run_session, run_session_with_policy, simulate_unordered, SessionError, SessionResult,
    SCHEMA_VERSION,
};
pub use stress::{run_probe_backtest, run_stress_suite, CrisisProbeOutcome, StressReport};
pub use targets::{validate_targets, TargetCheck, TargetReport, Verdict};

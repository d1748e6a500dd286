//! Session runner — wires together stream construction, simulation,
//! analytics, and target validation.
//!
//! Two entry points:
//! - `run_session()`: builds the stream and drives the reference probe
//!   policy. Used by the CLI.
//! - `run_session_with_policy()`: same wiring, caller-supplied policy.
//!
//! `simulate_unordered()` is the parallel scoring path for stateless
//! decision rules.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use probelab_core::domain::{ExecutionRecord, Opportunity, SizingConfig};
use probelab_core::generator::MarketConditionGenerator;
use probelab_core::simulator::{simulate, DecisionError, DecisionPolicy, SimulationOutcome};
use probelab_core::stream::build_opportunities;

use crate::config::{ConfigError, SessionConfig, SessionId, SessionWindow};
use crate::metrics::PerformanceSummary;
use crate::policy::ProbePolicy;
use crate::risk::RiskReport;
use crate::targets::{validate_targets, TargetReport};

/// Errors from the session runner.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("no opportunities between {start} and {end}: the window contains no session slots")]
    EmptyStream { start: String, end: String },
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one simulation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub session_id: SessionId,
    pub config: SessionConfig,
    pub summary: PerformanceSummary,
    pub risk: RiskReport,
    pub targets: TargetReport,
    pub policy_failures: u32,
    /// Per-slot record tape; populated only when the config asks for it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<ExecutionRecord>,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a session with the reference probe policy.
pub fn run_session(config: &SessionConfig) -> Result<SessionResult, SessionError> {
    let mut policy = ProbePolicy::new(config.policy.clone());
    run_session_with_policy(config, &mut policy)
}

/// Run a session with a caller-supplied decision policy.
pub fn run_session_with_policy(
    config: &SessionConfig,
    policy: &mut dyn DecisionPolicy,
) -> Result<SessionResult, SessionError> {
    config.validate()?;

    let generator = MarketConditionGenerator::new(config.session.seed);
    let (start, end) = window_bounds(&config.session);
    let opportunities = build_opportunities(
        &generator,
        start,
        end,
        Duration::minutes(config.session.interval_minutes),
    );
    if opportunities.is_empty() {
        return Err(SessionError::EmptyStream {
            start: config.session.start_date.to_string(),
            end: config.session.end_date.to_string(),
        });
    }

    let outcome = simulate(policy, &opportunities, &config.sizing);
    Ok(assemble(config, outcome))
}

/// Evaluate a stateless decision function over a stream in parallel.
///
/// Stateless rules carry no spacing clock or volume counters, so their
/// slots are independent. Records come back re-sorted into
/// (timestamp, id) order, matching the sequential path exactly.
pub fn simulate_unordered<F>(
    decide: F,
    opportunities: &[Opportunity],
    sizing: &SizingConfig,
) -> SimulationOutcome
where
    F: Fn(&Opportunity, &SizingConfig) -> Result<Decimal, DecisionError> + Sync,
{
    let mut scored: Vec<(ExecutionRecord, bool)> = opportunities
        .par_iter()
        .map(|opportunity| match decide(opportunity, sizing) {
            Ok(pnl) if pnl != Decimal::ZERO => (
                ExecutionRecord {
                    opportunity_id: opportunity.id,
                    timestamp: opportunity.timestamp,
                    executed: true,
                    pnl,
                },
                false,
            ),
            Ok(_) => (unexecuted(opportunity), false),
            Err(_) => (unexecuted(opportunity), true),
        })
        .collect();

    scored.sort_by_key(|(record, _)| (record.timestamp, record.opportunity_id));
    let policy_failures = scored.iter().filter(|(_, failed)| *failed).count() as u32;
    let records = scored.into_iter().map(|(record, _)| record).collect();

    SimulationOutcome {
        records,
        policy_failures,
    }
}

fn unexecuted(opportunity: &Opportunity) -> ExecutionRecord {
    ExecutionRecord {
        opportunity_id: opportunity.id,
        timestamp: opportunity.timestamp,
        executed: false,
        pnl: Decimal::ZERO,
    }
}

fn window_bounds(window: &SessionWindow) -> (NaiveDateTime, NaiveDateTime) {
    let start = window.start_date.and_time(NaiveTime::MIN);
    let end = window
        .end_date
        .succ_opt()
        .unwrap_or(window.end_date)
        .and_time(NaiveTime::MIN);
    (start, end)
}

fn assemble(config: &SessionConfig, outcome: SimulationOutcome) -> SessionResult {
    let summary = PerformanceSummary::compute(&outcome.records);
    let risk = RiskReport::compute(&outcome.records, &config.risk);
    let targets = validate_targets(&summary);
    let records = if config.keep_records {
        outcome.records
    } else {
        Vec::new()
    };

    SessionResult {
        schema_version: SCHEMA_VERSION,
        session_id: config.session_id(),
        config: config.clone(),
        summary,
        risk,
        targets,
        policy_failures: outcome.policy_failures,
        records,
    }
}

//! Execution simulation over an opportunity stream.
//!
//! The simulator owns none of the trading logic. It walks opportunities in
//! order, asks a [`DecisionPolicy`] what to do with each one, and records
//! the outcome. A policy failure on one opportunity never aborts the run:
//! that slot is recorded as unexecuted and the walk continues.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{ExecutionRecord, Opportunity, SizingConfig};

/// Errors a decision policy may raise for a single opportunity.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// A pricing or signal input the policy depends on was unavailable.
    #[error("required input missing: {0}")]
    MissingInput(String),
    /// Any other policy-internal failure.
    #[error("policy failure: {0}")]
    Policy(String),
}

/// A trading decision rule evaluated once per opportunity.
///
/// Implementations return the realized P&L of the trade they chose to
/// take, or [`Decimal::ZERO`] to pass on the opportunity. Policies may
/// carry mutable state (spacing clocks, volume counters), which is why
/// evaluation is sequential and in timestamp order.
pub trait DecisionPolicy {
    fn decide(
        &mut self,
        opportunity: &Opportunity,
        sizing: &SizingConfig,
    ) -> Result<Decimal, DecisionError>;
}

/// Result of simulating a policy over a stream.
#[derive(Debug, Clone, Default)]
pub struct SimulationOutcome {
    /// One record per input opportunity, in input order.
    pub records: Vec<ExecutionRecord>,
    /// Opportunities whose decision raised an error and were degraded to
    /// unexecuted records.
    pub policy_failures: u32,
}

/// Run `policy` over `opportunities`, producing one record per slot.
pub fn simulate(
    policy: &mut dyn DecisionPolicy,
    opportunities: &[Opportunity],
    sizing: &SizingConfig,
) -> SimulationOutcome {
    let mut records = Vec::with_capacity(opportunities.len());
    let mut policy_failures = 0u32;

    for opportunity in opportunities {
        let record = match policy.decide(opportunity, sizing) {
            Ok(pnl) if pnl != Decimal::ZERO => ExecutionRecord {
                opportunity_id: opportunity.id,
                timestamp: opportunity.timestamp,
                executed: true,
                pnl,
            },
            Ok(_) => unexecuted(opportunity),
            Err(_) => {
                policy_failures += 1;
                unexecuted(opportunity)
            }
        };
        records.push(record);
    }

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

//! ProbeLab Core — deterministic opportunity streams and execution simulation.
//!
//! This crate contains the data-producing half of the toolkit:
//! - Domain types (market conditions, opportunities, execution records,
//!   sizing, crisis periods)
//! - Seeded RNG hierarchy keyed on (timestamp, counter)
//! - Synthetic market-condition generation
//! - Session-aware opportunity stream construction
//! - Execution simulation over a pluggable decision policy

pub mod domain;
pub mod generator;
pub mod rng;
pub mod simulator;
pub mod stream;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: core types are Send + Sync.
    ///
    /// Simulation batches are evaluated across worker threads downstream;
    /// if any type fails this check, the build breaks immediately.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::MarketRegime>();
        require_sync::<domain::MarketRegime>();
        require_send::<domain::MarketCondition>();
        require_sync::<domain::MarketCondition>();
        require_send::<domain::Opportunity>();
        require_sync::<domain::Opportunity>();
        require_send::<domain::OpportunityId>();
        require_sync::<domain::OpportunityId>();
        require_send::<domain::ExecutionRecord>();
        require_sync::<domain::ExecutionRecord>();
        require_send::<domain::SizingConfig>();
        require_sync::<domain::SizingConfig>();
        require_send::<domain::CrisisPeriod>();
        require_sync::<domain::CrisisPeriod>();
        require_send::<domain::MonthResult>();
        require_sync::<domain::MonthResult>();

        // RNG and generator
        require_send::<rng::SeedHierarchy>();
        require_sync::<rng::SeedHierarchy>();
        require_send::<generator::MarketConditionGenerator>();
        require_sync::<generator::MarketConditionGenerator>();

        // Simulation
        require_send::<simulator::SimulationOutcome>();
        require_sync::<simulator::SimulationOutcome>();
        require_send::<simulator::DecisionError>();
        require_sync::<simulator::DecisionError>();
    }

    /// Architecture contract: decision policies never see neighbouring
    /// opportunities or prior records.
    ///
    /// The trait signature takes one `&Opportunity` and the sizing envelope,
    /// nothing else. Any cross-slot state a policy wants (spacing clocks,
    /// daily counters) must live inside the policy itself, which keeps the
    /// simulator a plain fold over the stream.
    #[test]
    fn decision_policy_sees_one_opportunity_at_a_time() {
        fn _check_trait_object_builds(
            policy: &mut dyn simulator::DecisionPolicy,
            opportunity: &domain::Opportunity,
            sizing: &domain::SizingConfig,
        ) -> Result<rust_decimal::Decimal, simulator::DecisionError> {
            policy.decide(opportunity, sizing)
        }
    }
}

//! Opportunity — a sampled instant at which a trade could be taken.

use super::condition::MarketCondition;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monotonically increasing opportunity number within one stream.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct OpportunityId(pub u64);

impl fmt::Display for OpportunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One candidate trade instant, offered to the simulator exactly once.
///
/// Never mutated after creation. The embedded condition is the full context
/// a decision policy sees; `is_optimal` is the stream builder's fixed
/// simplified classification, not a trading signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub timestamp: NaiveDateTime,
    pub condition: MarketCondition,
    pub is_optimal: bool,
}

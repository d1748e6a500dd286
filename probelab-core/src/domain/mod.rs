//! Domain types for ProbeLab

pub mod condition;
pub mod crisis;
pub mod opportunity;
pub mod record;
pub mod sizing;

pub use condition::{MarketCondition, MarketRegime};
pub use crisis::{CrisisPeriod, MonthResult};
pub use opportunity::{Opportunity, OpportunityId};
pub use record::ExecutionRecord;
pub use sizing::SizingConfig;

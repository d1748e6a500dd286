//! ExecutionRecord — the realized outcome for one opportunity.

use super::opportunity::OpportunityId;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Realized outcome for a single opportunity: whether it executed and the
/// signed P&L.
///
/// Created exactly once per opportunity by the simulator and never mutated.
/// The timestamp always equals the source opportunity's timestamp — no
/// execution latency is modeled — so time order and offer order coincide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub opportunity_id: OpportunityId,
    pub timestamp: NaiveDateTime,
    pub executed: bool,
    /// Signed realized P&L. Always zero when `executed` is false.
    pub pnl: Decimal,
}

impl ExecutionRecord {
    /// The record's calendar date, used for daily grouping.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_win(&self) -> bool {
        self.executed && self.pnl > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.executed && self.pnl < Decimal::ZERO
    }
}

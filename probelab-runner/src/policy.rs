//! Reference probe policy — a conservative decision rule with spacing and
//! volume discipline.
//!
//! Signal generation is out of scope here: the policy trades every optimal
//! slot its limits allow and resolves each trade from a seeded RNG at a
//! configured win probability. What it does enforce for real are the
//! execution-side rules the acceptance targets measure — minimum spacing
//! between fills, a daily cap, and a weekly cap.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use probelab_core::domain::{Opportunity, SizingConfig};
use probelab_core::rng::SeedHierarchy;
use probelab_core::simulator::{DecisionError, DecisionPolicy};

/// Tunables for the probe policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbePolicyConfig {
    pub min_spacing_minutes: i64,
    pub max_daily_trades: u32,
    pub max_weekly_trades: u32,
    /// Probability a taken trade resolves as a win, in [0, 1].
    pub win_probability: f64,
    pub win_amount: Decimal,
    /// Loss magnitude (positive); the realized loss is negative.
    pub loss_amount: Decimal,
    pub outcome_seed: u64,
}

impl Default for ProbePolicyConfig {
    fn default() -> Self {
        Self {
            min_spacing_minutes: 6,
            max_daily_trades: 50,
            max_weekly_trades: 250,
            win_probability: 0.92,
            win_amount: dec!(24),
            loss_amount: dec!(10),
            outcome_seed: 0,
        }
    }
}

/// Stateful [`DecisionPolicy`] carrying the spacing clock and volume
/// counters between opportunities.
#[derive(Debug, Clone)]
pub struct ProbePolicy {
    config: ProbePolicyConfig,
    seeds: SeedHierarchy,
    last_trade: Option<NaiveDateTime>,
    day: Option<(NaiveDate, u32)>,
    week: Option<((i32, u32), u32)>,
    draws: u64,
}

impl ProbePolicy {
    pub fn new(config: ProbePolicyConfig) -> Self {
        let seeds = SeedHierarchy::new(config.outcome_seed);
        Self {
            config,
            seeds,
            last_trade: None,
            day: None,
            week: None,
            draws: 0,
        }
    }

    fn spacing_allows(&self, timestamp: NaiveDateTime) -> bool {
        match self.last_trade {
            None => true,
            Some(last) => timestamp - last >= Duration::minutes(self.config.min_spacing_minutes),
        }
    }

    fn daily_count(&self, date: NaiveDate) -> u32 {
        match self.day {
            Some((d, n)) if d == date => n,
            _ => 0,
        }
    }

    fn weekly_count(&self, date: NaiveDate) -> u32 {
        let key = (date.iso_week().year(), date.iso_week().week());
        match self.week {
            Some((k, n)) if k == key => n,
            _ => 0,
        }
    }

    fn record_trade(&mut self, timestamp: NaiveDateTime) {
        let date = timestamp.date();
        let week_key = (date.iso_week().year(), date.iso_week().week());
        self.last_trade = Some(timestamp);
        self.day = Some((date, self.daily_count(date) + 1));
        self.week = Some((week_key, self.weekly_count(date) + 1));
    }

    /// Resolve the trade outcome. Draw order is fixed: the win/loss coin
    /// first, then the cent jitter.
    fn draw_outcome(&mut self, timestamp: NaiveDateTime, sizing: &SizingConfig) -> Decimal {
        let mut rng = self.seeds.rng_for(timestamp, self.draws);
        self.draws += 1;

        let win = rng.gen_bool(self.config.win_probability.clamp(0.0, 1.0));
        if win {
            let jitter_cents: i64 = rng.gen_range(-50..=50);
            self.config.win_amount + Decimal::new(jitter_cents, 2)
        } else {
            // losses stay within the sizing risk budget, and the jitter
            // stays strictly below the magnitude
            let magnitude = self.config.loss_amount.min(sizing.max_risk_per_trade);
            let magnitude_cents = (magnitude * dec!(100)).to_i64().unwrap_or(0);
            let max_jitter = magnitude_cents.saturating_sub(1).clamp(0, 50);
            let jitter_cents: i64 = rng.gen_range(0..=max_jitter);
            -(magnitude - Decimal::new(jitter_cents, 2))
        }
    }
}

impl DecisionPolicy for ProbePolicy {
    fn decide(
        &mut self,
        opportunity: &Opportunity,
        sizing: &SizingConfig,
    ) -> Result<Decimal, DecisionError> {
        if !opportunity.is_optimal {
            return Ok(Decimal::ZERO);
        }
        let timestamp = opportunity.timestamp;
        let date = timestamp.date();
        if !self.spacing_allows(timestamp)
            || self.daily_count(date) >= self.config.max_daily_trades
            || self.weekly_count(date) >= self.config.max_weekly_trades
        {
            return Ok(Decimal::ZERO);
        }

        let pnl = self.draw_outcome(timestamp, sizing);
        // a zero draw is no trade; it must not consume spacing or capacity
        if pnl != Decimal::ZERO {
            self.record_trade(timestamp);
        }
        Ok(pnl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probelab_core::domain::{MarketCondition, MarketRegime, OpportunityId};
    use probelab_core::simulator::simulate;

    fn optimal_at(id: u64, day: u32, hour: u32, min: u32) -> Opportunity {
        let timestamp = NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap();
        Opportunity {
            id: OpportunityId(id),
            timestamp,
            condition: MarketCondition {
                timestamp,
                underlying_price: dec!(450),
                vix: 20.0,
                trend_score: 0.1,
                regime: MarketRegime::Calm,
            },
            is_optimal: true,
        }
    }

    fn three_minute_grid(day: u32, n: u64) -> Vec<Opportunity> {
        (0..n)
            .map(|i| optimal_at(i, day, 10, 0))
            .enumerate()
            .map(|(i, mut o)| {
                o.timestamp += Duration::minutes(3 * i as i64);
                o.condition.timestamp = o.timestamp;
                o
            })
            .collect()
    }

    #[test]
    fn skips_non_optimal_slots() {
        let mut policy = ProbePolicy::new(ProbePolicyConfig::default());
        let mut opp = optimal_at(0, 4, 11, 0);
        opp.is_optimal = false;
        let outcome = simulate(&mut policy, &[opp], &SizingConfig::default());
        assert!(!outcome.records[0].executed);
    }

    #[test]
    fn enforces_minimum_spacing() {
        let mut policy = ProbePolicy::new(ProbePolicyConfig::default());
        let opps = three_minute_grid(4, 20);
        let outcome = simulate(&mut policy, &opps, &SizingConfig::default());
        let executed: Vec<_> = outcome.records.iter().filter(|r| r.executed).collect();
        assert!(executed.len() >= 2);
        for pair in executed.windows(2) {
            assert!(pair[1].timestamp - pair[0].timestamp >= Duration::minutes(6));
        }
    }

    #[test]
    fn enforces_daily_cap() {
        let config = ProbePolicyConfig {
            min_spacing_minutes: 0,
            max_daily_trades: 3,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        let opps = three_minute_grid(4, 10);
        let outcome = simulate(&mut policy, &opps, &SizingConfig::default());
        assert_eq!(outcome.records.iter().filter(|r| r.executed).count(), 3);
    }

    #[test]
    fn daily_counter_resets_across_days() {
        let config = ProbePolicyConfig {
            min_spacing_minutes: 0,
            max_daily_trades: 2,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        let mut opps = three_minute_grid(4, 4);
        opps.extend(three_minute_grid(5, 4).into_iter().map(|mut o| {
            o.id = OpportunityId(o.id.0 + 4);
            o
        }));
        let outcome = simulate(&mut policy, &opps, &SizingConfig::default());
        // two per day
        assert_eq!(outcome.records.iter().filter(|r| r.executed).count(), 4);
    }

    #[test]
    fn enforces_weekly_cap() {
        let config = ProbePolicyConfig {
            min_spacing_minutes: 0,
            max_daily_trades: 50,
            max_weekly_trades: 5,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        // Monday through Wednesday of the same ISO week
        let mut opps = three_minute_grid(4, 3);
        for (offset, day) in [(3u64, 5u32), (6, 6)] {
            opps.extend(three_minute_grid(day, 3).into_iter().map(|mut o| {
                o.id = OpportunityId(o.id.0 + offset);
                o
            }));
        }
        let outcome = simulate(&mut policy, &opps, &SizingConfig::default());
        assert_eq!(outcome.records.iter().filter(|r| r.executed).count(), 5);
    }

    #[test]
    fn outcomes_are_deterministic_for_a_seed() {
        let config = ProbePolicyConfig {
            outcome_seed: 99,
            ..ProbePolicyConfig::default()
        };
        let opps = three_minute_grid(4, 12);
        let run = |cfg: ProbePolicyConfig| {
            let mut policy = ProbePolicy::new(cfg);
            simulate(&mut policy, &opps, &SizingConfig::default())
        };
        let a = run(config.clone());
        let b = run(config);
        for (x, y) in a.records.iter().zip(&b.records) {
            assert_eq!(x.executed, y.executed);
            assert_eq!(x.pnl, y.pnl);
        }
    }

    #[test]
    fn losses_respect_the_sizing_budget() {
        let config = ProbePolicyConfig {
            win_probability: 0.0,
            min_spacing_minutes: 0,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        let sizing = SizingConfig {
            position_size: dec!(100),
            max_risk_per_trade: dec!(4),
        };
        let opps = three_minute_grid(4, 8);
        let outcome = simulate(&mut policy, &opps, &sizing);
        for record in outcome.records.iter().filter(|r| r.executed) {
            assert!(record.pnl < Decimal::ZERO);
            assert!(record.pnl.abs() <= dec!(4));
        }
    }

    #[test]
    fn tiny_risk_budgets_still_realize_strict_losses() {
        let config = ProbePolicyConfig {
            win_probability: 0.0,
            min_spacing_minutes: 0,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        let sizing = SizingConfig {
            position_size: dec!(100),
            max_risk_per_trade: dec!(0.25),
        };
        let opps = three_minute_grid(4, 8);
        let outcome = simulate(&mut policy, &opps, &sizing);
        for record in &outcome.records {
            assert!(record.executed);
            assert!(record.pnl < Decimal::ZERO);
            assert!(record.pnl.abs() <= dec!(0.25));
        }
    }

    #[test]
    fn zero_magnitude_draws_consume_no_capacity() {
        let config = ProbePolicyConfig {
            win_probability: 0.0,
            min_spacing_minutes: 0,
            max_daily_trades: 3,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);

        // a zero risk budget resolves every losing draw to no trade
        let zero_risk = SizingConfig {
            position_size: dec!(100),
            max_risk_per_trade: Decimal::ZERO,
        };
        let first = simulate(&mut policy, &three_minute_grid(4, 3), &zero_risk);
        assert!(first.records.iter().all(|r| !r.executed));

        // the same day still has its full daily allowance
        let sizing = SizingConfig {
            position_size: dec!(100),
            max_risk_per_trade: dec!(4),
        };
        let later: Vec<Opportunity> = three_minute_grid(4, 6)
            .into_iter()
            .map(|mut o| {
                o.id = OpportunityId(o.id.0 + 3);
                o.timestamp += Duration::minutes(60);
                o.condition.timestamp = o.timestamp;
                o
            })
            .collect();
        let second = simulate(&mut policy, &later, &sizing);
        assert_eq!(second.records.iter().filter(|r| r.executed).count(), 3);
    }

    #[test]
    fn wins_carry_cent_jitter_around_the_target() {
        let config = ProbePolicyConfig {
            win_probability: 1.0,
            min_spacing_minutes: 0,
            ..ProbePolicyConfig::default()
        };
        let mut policy = ProbePolicy::new(config);
        let opps = three_minute_grid(4, 8);
        let outcome = simulate(&mut policy, &opps, &SizingConfig::default());
        for record in outcome.records.iter().filter(|r| r.executed) {
            assert!(record.pnl >= dec!(23.50));
            assert!(record.pnl <= dec!(24.50));
        }
    }
}

//! Opportunity stream construction.
//!
//! Walks a date range at a fixed sampling interval, keeps only slots that
//! fall inside the regular weekday session, and attaches a generated market
//! condition plus an optimality flag to each surviving slot. Opportunity
//! ids are assigned in emission order and double as the generator counter,
//! so a single opportunity can be regenerated from (timestamp, id) alone.

use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Weekday};

use crate::domain::{MarketCondition, MarketRegime, Opportunity, OpportunityId};
use crate::generator::MarketConditionGenerator;

/// Default sampling interval between opportunity slots.
pub const DEFAULT_INTERVAL_MINUTES: i64 = 3;

/// Session open, minutes after midnight (09:30).
const SESSION_OPEN_MIN: u32 = 9 * 60 + 30;
/// Session close, minutes after midnight (16:00, inclusive).
const SESSION_CLOSE_MIN: u32 = 16 * 60;

/// True when the timestamp falls on a weekday inside [09:30, 16:00].
pub fn in_session(timestamp: NaiveDateTime) -> bool {
    match timestamp.weekday() {
        Weekday::Sat | Weekday::Sun => return false,
        _ => {}
    }
    let minute_of_day = timestamp.hour() * 60 + timestamp.minute();
    (SESSION_OPEN_MIN..=SESSION_CLOSE_MIN).contains(&minute_of_day)
}

/// Conditions considered favourable for entry: a calm regime with moderate
/// volatility, no strong directional pull, and a mid-session clock.
pub fn is_optimal(condition: &MarketCondition) -> bool {
    condition.regime == MarketRegime::Calm
        && (15.0..=28.0).contains(&condition.vix)
        && condition.trend_score.abs() <= 0.5
        && (10..=14).contains(&condition.session_hour())
}

/// Build the opportunity stream for [start, end).
///
/// Returns an empty stream when the range is empty or the interval is not
/// positive. Emitted opportunities carry strictly increasing timestamps and
/// sequential ids starting at zero.
pub fn build_opportunities(
    generator: &MarketConditionGenerator,
    start: NaiveDateTime,
    end: NaiveDateTime,
    interval: Duration,
) -> Vec<Opportunity> {
    if start >= end || interval <= Duration::zero() {
        return Vec::new();
    }

    let mut opportunities = Vec::new();
    let mut slot = start;
    let mut emitted: u64 = 0;
    while slot < end {
        if in_session(slot) {
            let condition = generator.condition_at(slot, emitted);
            let is_optimal = is_optimal(&condition);
            opportunities.push(Opportunity {
                id: OpportunityId(emitted),
                timestamp: slot,
                condition,
                is_optimal,
            });
            emitted += 1;
        }
        slot += interval;
    }
    opportunities
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn calm_condition(vix: f64, trend: f64, hour: u32) -> MarketCondition {
        MarketCondition {
            timestamp: dt(2024, 3, 4, hour, 0),
            underlying_price: dec!(450),
            vix,
            trend_score: trend,
            regime: MarketRegime::Calm,
        }
    }

    // ── session window ──

    #[test]
    fn session_boundaries() {
        // 2024-03-04 is a Monday
        assert!(!in_session(dt(2024, 3, 4, 9, 29)));
        assert!(in_session(dt(2024, 3, 4, 9, 30)));
        assert!(in_session(dt(2024, 3, 4, 12, 0)));
        assert!(in_session(dt(2024, 3, 4, 16, 0)));
        assert!(!in_session(dt(2024, 3, 4, 16, 1)));
    }

    #[test]
    fn weekends_excluded() {
        // 2024-03-02/03 are Sat/Sun
        assert!(!in_session(dt(2024, 3, 2, 12, 0)));
        assert!(!in_session(dt(2024, 3, 3, 12, 0)));
    }

    // ── optimality ──

    #[test]
    fn optimal_requires_all_conditions() {
        assert!(is_optimal(&calm_condition(20.0, 0.2, 11)));
        assert!(!is_optimal(&calm_condition(30.0, 0.2, 11))); // vix too high
        assert!(!is_optimal(&calm_condition(20.0, 0.8, 11))); // trending
        assert!(!is_optimal(&calm_condition(20.0, 0.2, 9))); // open hour
        assert!(!is_optimal(&calm_condition(20.0, 0.2, 15))); // late session

        let mut volatile = calm_condition(20.0, 0.2, 11);
        volatile.regime = MarketRegime::Volatile;
        assert!(!is_optimal(&volatile));
    }

    // ── stream construction ──

    #[test]
    fn full_week_slot_count() {
        let generator = MarketConditionGenerator::new(11);
        // Monday 2024-03-04 through Friday close
        let opps = build_opportunities(
            &generator,
            dt(2024, 3, 4, 0, 0),
            dt(2024, 3, 9, 0, 0),
            Duration::minutes(3),
        );
        // 09:30..=16:00 at 3-minute steps is 131 slots per day
        assert_eq!(opps.len(), 5 * 131);
    }

    #[test]
    fn ids_sequential_and_timestamps_increasing() {
        let generator = MarketConditionGenerator::new(11);
        let opps = build_opportunities(
            &generator,
            dt(2024, 3, 4, 9, 0),
            dt(2024, 3, 4, 17, 0),
            Duration::minutes(3),
        );
        for (i, opp) in opps.iter().enumerate() {
            assert_eq!(opp.id, OpportunityId(i as u64));
            if i > 0 {
                assert!(opp.timestamp > opps[i - 1].timestamp);
            }
        }
    }

    #[test]
    fn optimal_flag_matches_classifier() {
        let generator = MarketConditionGenerator::new(23);
        let opps = build_opportunities(
            &generator,
            dt(2024, 3, 4, 0, 0),
            dt(2024, 3, 6, 0, 0),
            Duration::minutes(3),
        );
        assert!(!opps.is_empty());
        for opp in &opps {
            assert_eq!(opp.is_optimal, is_optimal(&opp.condition));
        }
    }

    #[test]
    fn empty_range_yields_empty_stream() {
        let generator = MarketConditionGenerator::new(1);
        let t = dt(2024, 3, 4, 10, 0);
        assert!(build_opportunities(&generator, t, t, Duration::minutes(3)).is_empty());
        assert!(
            build_opportunities(&generator, dt(2024, 3, 5, 0, 0), t, Duration::minutes(3))
                .is_empty()
        );
    }

    #[test]
    fn non_positive_interval_yields_empty_stream() {
        let generator = MarketConditionGenerator::new(1);
        let start = dt(2024, 3, 4, 9, 30);
        let end = dt(2024, 3, 4, 16, 0);
        assert!(build_opportunities(&generator, start, end, Duration::zero()).is_empty());
        assert!(build_opportunities(&generator, start, end, Duration::minutes(-5)).is_empty());
    }

    #[test]
    fn stream_is_deterministic() {
        let g1 = MarketConditionGenerator::new(77);
        let g2 = MarketConditionGenerator::new(77);
        let start = dt(2024, 3, 4, 0, 0);
        let end = dt(2024, 3, 5, 0, 0);
        let a = build_opportunities(&g1, start, end, Duration::minutes(3));
        let b = build_opportunities(&g2, start, end, Duration::minutes(3));
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.condition.vix, y.condition.vix);
            assert_eq!(x.is_optimal, y.is_optimal);
        }
    }
}

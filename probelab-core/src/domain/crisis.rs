//! CrisisPeriod — a historical interval of sustained losing performance.
//!
//! Crisis periods are hand-curated reference data, not derived results:
//! each one names a date range, the aggregate loss the strategy took over
//! it, nominal stress indicators, and an ordered monthly breakdown.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One calendar month of results inside a crisis period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthResult {
    pub year: i32,
    pub month: u32,
    /// Net P&L for the month (negative in losing months).
    pub net_pnl: Decimal,
    /// Fraction of trades that won, in [0, 1].
    pub win_rate: f64,
    pub trade_count: u32,
}

impl MonthResult {
    /// Average P&L per trade for the month; zero when no trades occurred.
    pub fn avg_pnl_per_trade(&self) -> Decimal {
        if self.trade_count == 0 {
            return Decimal::ZERO;
        }
        self.net_pnl / Decimal::from(self.trade_count)
    }
}

/// A named historical crisis interval with its monthly breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisPeriod {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Known aggregate loss over the interval (negative).
    pub total_loss: Decimal,
    /// Peak volatility index level observed during the interval.
    pub peak_vix: f64,
    /// Peak-to-trough underlying decline, as a positive percentage.
    pub market_decline_pct: f64,
    /// Ordered monthly breakdown covering the interval.
    pub months: Vec<MonthResult>,
}

impl CrisisPeriod {
    /// Sum of the monthly net P&L figures.
    pub fn monthly_total(&self) -> Decimal {
        self.months.iter().map(|m| m.net_pnl).sum()
    }

    /// Normalized stress score in [0, 1], blending peak volatility and the
    /// depth of the underlying decline (60/40, vix mapped from [15, 65]).
    pub fn stress_score(&self) -> f64 {
        let vol = ((self.peak_vix - 15.0) / 50.0).clamp(0.0, 1.0);
        let decline = (self.market_decline_pct / 50.0).clamp(0.0, 1.0);
        vol * 0.6 + decline * 0.4
    }

    /// The losing month with the largest loss magnitude, if any month lost.
    pub fn worst_month(&self) -> Option<&MonthResult> {
        self.months
            .iter()
            .filter(|m| m.net_pnl < Decimal::ZERO)
            .min_by_key(|m| m.net_pnl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> CrisisPeriod {
        CrisisPeriod {
            name: "COVID_CRASH".into(),
            start: NaiveDate::from_ymd_opt(2020, 2, 15).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 4, 15).unwrap(),
            total_loss: dec!(-965.61),
            peak_vix: 82.69,
            market_decline_pct: 34.0,
            months: vec![
                MonthResult {
                    year: 2020,
                    month: 2,
                    net_pnl: dec!(-123.45),
                    win_rate: 0.52,
                    trade_count: 38,
                },
                MonthResult {
                    year: 2020,
                    month: 3,
                    net_pnl: dec!(-842.16),
                    win_rate: 0.31,
                    trade_count: 45,
                },
            ],
        }
    }

    #[test]
    fn monthly_total_matches_aggregate_loss() {
        let crisis = sample();
        assert_eq!(crisis.monthly_total(), crisis.total_loss);
    }

    #[test]
    fn worst_month_is_march() {
        let crisis = sample();
        assert_eq!(crisis.worst_month().unwrap().month, 3);
    }

    #[test]
    fn stress_score_saturates_in_covid() {
        let s = sample().stress_score();
        // vix 82.69 clamps the vol component at 1.0
        assert!((s - (0.6 + 0.4 * 34.0 / 50.0)).abs() < 1e-12);
    }

    #[test]
    fn avg_pnl_per_trade_zero_trades() {
        let m = MonthResult {
            year: 2020,
            month: 1,
            net_pnl: dec!(-10),
            win_rate: 0.0,
            trade_count: 0,
        };
        assert_eq!(m.avg_pnl_per_trade(), Decimal::ZERO);
    }

    #[test]
    fn crisis_serialization_roundtrip() {
        let crisis = sample();
        let json = serde_json::to_string(&crisis).unwrap();
        let deser: CrisisPeriod = serde_json::from_str(&json).unwrap();
        assert_eq!(crisis.name, deser.name);
        assert_eq!(crisis.months.len(), deser.months.len());
        assert_eq!(crisis.total_loss, deser.total_loss);
    }
}

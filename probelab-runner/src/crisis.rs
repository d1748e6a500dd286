//! Crisis catalogue — curated losing intervals and their aggregates.
//!
//! The built-in catalogue carries four studied stress windows. An external
//! JSON file with the same shape can replace it; files are validated on
//! load so a half-edited catalogue fails loudly instead of skewing the
//! derived probe parameters.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use probelab_core::domain::{CrisisPeriod, MonthResult};

/// Errors from catalogue loading and validation.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalogue JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalogue is empty")]
    Empty,
    #[error("crisis '{0}' has no monthly breakdown")]
    NoMonths(String),
    #[error("crisis '{0}' monthly totals do not reconcile with total_loss")]
    Inconsistent(String),
}

/// The four built-in stress windows.
pub fn builtin_catalogue() -> Vec<CrisisPeriod> {
    vec![
        CrisisPeriod {
            name: "COVID_CRASH".into(),
            start: date(2020, 2, 1),
            end: date(2020, 3, 31),
            total_loss: dec!(-965.61),
            peak_vix: 82.69,
            market_decline_pct: 34.0,
            months: vec![
                month(2020, 2, dec!(-123.45), 0.52, 38),
                month(2020, 3, dec!(-842.16), 0.31, 45),
            ],
        },
        CrisisPeriod {
            name: "VOLMAGEDDON".into(),
            start: date(2018, 2, 1),
            end: date(2018, 2, 28),
            total_loss: dec!(-520.83),
            peak_vix: 37.32,
            market_decline_pct: 10.2,
            months: vec![month(2018, 2, dec!(-520.83), 0.44, 41)],
        },
        CrisisPeriod {
            name: "DECEMBER_2018".into(),
            start: date(2018, 12, 1),
            end: date(2018, 12, 31),
            total_loss: dec!(-455.10),
            peak_vix: 36.07,
            market_decline_pct: 9.2,
            months: vec![month(2018, 12, dec!(-455.10), 0.38, 36)],
        },
        CrisisPeriod {
            name: "REGIONAL_BANKING".into(),
            start: date(2023, 3, 1),
            end: date(2023, 3, 31),
            total_loss: dec!(-380.64),
            peak_vix: 26.52,
            market_decline_pct: 7.8,
            months: vec![month(2023, 3, dec!(-380.64), 0.47, 33)],
        },
    ]
}

/// Load a catalogue from a JSON file and validate it.
pub fn load_catalogue(path: &Path) -> Result<Vec<CrisisPeriod>, CatalogueError> {
    let content = std::fs::read_to_string(path)?;
    let crises: Vec<CrisisPeriod> = serde_json::from_str(&content)?;
    validate_catalogue(&crises)?;
    Ok(crises)
}

/// Load from `path` when given, otherwise fall back to the built-ins.
pub fn load_catalogue_or_builtin(
    path: Option<&Path>,
) -> Result<Vec<CrisisPeriod>, CatalogueError> {
    match path {
        Some(p) => load_catalogue(p),
        None => Ok(builtin_catalogue()),
    }
}

/// Structural checks shared by external and built-in catalogues.
pub fn validate_catalogue(crises: &[CrisisPeriod]) -> Result<(), CatalogueError> {
    if crises.is_empty() {
        return Err(CatalogueError::Empty);
    }
    for crisis in crises {
        if crisis.months.is_empty() {
            return Err(CatalogueError::NoMonths(crisis.name.clone()));
        }
        if crisis.monthly_total() != crisis.total_loss {
            return Err(CatalogueError::Inconsistent(crisis.name.clone()));
        }
    }
    Ok(())
}

/// Aggregates over every catalogued month, the designer's raw material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrisisAnalysis {
    /// Mean monthly win rate across the catalogue.
    pub avg_win_rate: f64,
    /// Lowest monthly win rate observed.
    pub worst_win_rate: f64,
    /// Net P&L per trade over all catalogued trades (negative).
    pub avg_loss_per_trade: Decimal,
    /// Crisis name and month with the largest monthly loss.
    pub worst_month: (String, MonthResult),
    pub avg_trades_per_month: f64,
    /// Sum of every crisis's total loss (negative).
    pub total_catalogued_loss: Decimal,
}

impl CrisisAnalysis {
    /// Aggregate the catalogue; `None` when it holds no months.
    pub fn aggregate(crises: &[CrisisPeriod]) -> Option<Self> {
        let months: Vec<(&str, &MonthResult)> = crises
            .iter()
            .flat_map(|c| c.months.iter().map(move |m| (c.name.as_str(), m)))
            .collect();
        if months.is_empty() {
            return None;
        }

        let total_trades: u64 = months.iter().map(|(_, m)| m.trade_count as u64).sum();
        let total_pnl: Decimal = months.iter().map(|(_, m)| m.net_pnl).sum();
        let worst = months
            .iter()
            .min_by_key(|(_, m)| m.net_pnl)
            .map(|(name, m)| (name.to_string(), (*m).clone()))?;

        Some(Self {
            avg_win_rate: months.iter().map(|(_, m)| m.win_rate).sum::<f64>()
                / months.len() as f64,
            worst_win_rate: months
                .iter()
                .map(|(_, m)| m.win_rate)
                .fold(f64::INFINITY, f64::min),
            avg_loss_per_trade: if total_trades == 0 {
                Decimal::ZERO
            } else {
                total_pnl / Decimal::from(total_trades)
            },
            worst_month: worst,
            avg_trades_per_month: total_trades as f64 / months.len() as f64,
            total_catalogued_loss: crises.iter().map(|c| c.total_loss).sum(),
        })
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn month(year: i32, month: u32, net_pnl: Decimal, win_rate: f64, trade_count: u32) -> MonthResult {
    MonthResult {
        year,
        month,
        net_pnl,
        win_rate,
        trade_count,
    }
}

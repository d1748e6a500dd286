//! Serializable session configuration.
//!
//! A [`SessionConfig`] captures everything needed to reproduce a simulation
//! session: date window, sampling cadence, seed, sizing envelope, policy
//! tunables, and risk settings. Configs are content-addressable: two
//! identical configs hash to the same [`SessionId`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use probelab_core::domain::SizingConfig;
use probelab_core::stream::DEFAULT_INTERVAL_MINUTES;

use crate::policy::ProbePolicyConfig;
use crate::risk::RiskConfig;

/// Unique identifier for a session (content-addressable hash).
pub type SessionId = String;

/// Errors raised while loading or validating a config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Date window and sampling cadence for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    /// First calendar day (inclusive).
    pub start_date: NaiveDate,
    /// Last calendar day (inclusive).
    pub end_date: NaiveDate,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: i64,
    /// Master seed for condition generation.
    #[serde(default)]
    pub seed: u64,
}

fn default_interval_minutes() -> i64 {
    DEFAULT_INTERVAL_MINUTES
}

/// Complete configuration for a single simulation session.
///
/// Loaded from TOML; every section except `[session]` is optional and
/// falls back to its defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub session: SessionWindow,
    #[serde(default)]
    pub sizing: SizingConfig,
    #[serde(default)]
    pub policy: ProbePolicyConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    /// Carry the full per-slot record tape in the result artifact.
    #[serde(default)]
    pub keep_records: bool,
}

impl SessionConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML, e.g. for a starter template.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Cross-field rules the type signatures cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.start_date > self.session.end_date {
            return Err(ConfigError::Validation(format!(
                "start_date {} is after end_date {}",
                self.session.start_date, self.session.end_date
            )));
        }
        if self.session.interval_minutes < 1 {
            return Err(ConfigError::Validation(format!(
                "interval_minutes must be at least 1, got {}",
                self.session.interval_minutes
            )));
        }
        if !(0.0..=1.0).contains(&self.policy.win_probability) {
            return Err(ConfigError::Validation(format!(
                "win_probability must lie in [0, 1], got {}",
                self.policy.win_probability
            )));
        }
        if self.policy.min_spacing_minutes < 0 {
            return Err(ConfigError::Validation(format!(
                "min_spacing_minutes must be non-negative, got {}",
                self.policy.min_spacing_minutes
            )));
        }
        if self.policy.max_daily_trades == 0 || self.policy.max_weekly_trades == 0 {
            return Err(ConfigError::Validation(
                "daily and weekly trade caps must be positive".into(),
            ));
        }
        if self.sizing.max_risk_per_trade <= Decimal::ZERO {
            return Err(ConfigError::Validation(format!(
                "max_risk_per_trade must be positive, got {}",
                self.sizing.max_risk_per_trade
            )));
        }
        Ok(())
    }

    /// Deterministic content hash for this configuration.
    ///
    /// Identical configs hash to identical ids, so persisted results can
    /// be looked up without re-running the session.
    pub fn session_id(&self) -> SessionId {
        let json = serde_json::to_string(self).expect("SessionConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// One full trading week in March 2024, the default demo window.
    pub fn sample_week() -> Self {
        Self {
            session: SessionWindow {
                start_date: date(2024, 3, 4),
                end_date: date(2024, 3, 8),
                interval_minutes: DEFAULT_INTERVAL_MINUTES,
                seed: 42,
            },
            sizing: SizingConfig::default(),
            policy: ProbePolicyConfig::default(),
            risk: RiskConfig::default(),
            keep_records: false,
        }
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

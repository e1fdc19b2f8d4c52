use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RcaError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_f64(profile: &str, key: &str) -> Option<f64> {
    profiled_env_opt(profile, key).and_then(|v| v.parse().ok())
}

/// How the blended score is bounded after surprise and explanatory power
/// are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBounds {
    /// `max(1, score)`. Every finite score comes out as at least 1.
    #[default]
    AtLeastOne,
    /// Clamp to `[0, 1]`.
    UnitInterval,
}

impl ScoreBounds {
    pub fn apply(self, score: f64) -> f64 {
        match self {
            ScoreBounds::AtLeastOne => score.max(1.0),
            ScoreBounds::UnitInterval => score.clamp(0.0, 1.0),
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "at_least_one" => Some(ScoreBounds::AtLeastOne),
            "unit_interval" => Some(ScoreBounds::UnitInterval),
            _ => None,
        }
    }
}

/// Tuning knobs for single-layer root cause localization, typically parsed
/// from TOML and overridable from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalizerConfig {
    /// Weight of the surprise score against explanatory power, in [0, 1].
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Share of the parent's deviation a cluster must reach to explain it.
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold: f64,
    /// Accumulation stops once the next child's deviation is this many
    /// times smaller than the previous one (after the delta threshold is met).
    #[serde(default = "default_pre_delta_ratio")]
    pub pre_delta_ratio: f64,
    /// Largest share of the candidate set a cluster may cover.
    #[serde(default = "default_cluster_ratio")]
    pub cluster_ratio: f64,
    #[serde(default)]
    pub score_bounds: ScoreBounds,
}

fn default_beta() -> f64 {
    0.5
}

fn default_delta_threshold() -> f64 {
    0.95
}

fn default_pre_delta_ratio() -> f64 {
    2.0
}

fn default_cluster_ratio() -> f64 {
    0.5
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            delta_threshold: default_delta_threshold(),
            pre_delta_ratio: default_pre_delta_ratio(),
            cluster_ratio: default_cluster_ratio(),
            score_bounds: ScoreBounds::default(),
        }
    }
}

impl LocalizerConfig {
    /// Defaults overlaid with environment variables (call `load_dotenv()` first).
    /// Profile is read from `RCA_PROFILE`. When set (e.g. `PROD`), every key is
    /// first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Overlay `RCA_*` environment variables onto this config.
    pub fn with_env_overrides(self) -> Self {
        let profile = env_or("RCA_PROFILE", "").to_uppercase();
        self.with_profile_overrides(&profile)
    }

    fn with_profile_overrides(mut self, p: &str) -> Self {
        if let Some(v) = profiled_env_f64(p, "RCA_BETA") {
            self.beta = v;
        }
        if let Some(v) = profiled_env_f64(p, "RCA_DELTA_THRESHOLD") {
            self.delta_threshold = v;
        }
        if let Some(v) = profiled_env_f64(p, "RCA_PRE_DELTA_RATIO") {
            self.pre_delta_ratio = v;
        }
        if let Some(v) = profiled_env_f64(p, "RCA_CLUSTER_RATIO") {
            self.cluster_ratio = v;
        }
        if let Some(v) = profiled_env_opt(p, "RCA_SCORE_BOUNDS").and_then(|s| ScoreBounds::parse(&s)) {
            self.score_bounds = v;
        }
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values outside the ranges the algorithm is defined for.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(RcaError::InvalidConfig(format!(
                "beta must be within [0, 1], got {}",
                self.beta
            )));
        }
        if !(self.delta_threshold > 0.0 && self.delta_threshold <= 1.0) {
            return Err(RcaError::InvalidConfig(format!(
                "delta_threshold must be within (0, 1], got {}",
                self.delta_threshold
            )));
        }
        if !(self.pre_delta_ratio > 0.0) {
            return Err(RcaError::InvalidConfig(format!(
                "pre_delta_ratio must be positive, got {}",
                self.pre_delta_ratio
            )));
        }
        if !(self.cluster_ratio > 0.0 && self.cluster_ratio <= 1.0) {
            return Err(RcaError::InvalidConfig(format!(
                "cluster_ratio must be within (0, 1], got {}",
                self.cluster_ratio
            )));
        }
        Ok(())
    }

    /// Print the effective settings for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Localizer config:");
        tracing::info!("  beta:            {}", self.beta);
        tracing::info!("  delta_threshold: {}", self.delta_threshold);
        tracing::info!("  pre_delta_ratio: {}", self.pre_delta_ratio);
        tracing::info!("  cluster_ratio:   {}", self.cluster_ratio);
        tracing::info!("  score_bounds:    {:?}", self.score_bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LocalizerConfig::default();
        assert_eq!(config.beta, 0.5);
        assert_eq!(config.delta_threshold, 0.95);
        assert_eq!(config.pre_delta_ratio, 2.0);
        assert_eq!(config.cluster_ratio, 0.5);
        assert_eq!(config.score_bounds, ScoreBounds::AtLeastOne);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = LocalizerConfig::from_toml_str("beta = 0.3\nscore_bounds = \"unit_interval\"\n").unwrap();
        assert_eq!(config.beta, 0.3);
        assert_eq!(config.delta_threshold, 0.95);
        assert_eq!(config.score_bounds, ScoreBounds::UnitInterval);
    }

    #[test]
    fn out_of_range_beta_rejected() {
        let err = LocalizerConfig::from_toml_str("beta = 1.5").unwrap_err();
        assert!(matches!(err, RcaError::InvalidConfig(_)));
    }

    #[test]
    fn nan_thresholds_rejected() {
        let config = LocalizerConfig {
            pre_delta_ratio: f64::NAN,
            ..LocalizerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn profiled_env_wins_over_plain_key() {
        env::set_var("RCATESTPROFILE_RCA_BETA", "0.8");
        env::set_var("RCATESTPROFILE_RCA_SCORE_BOUNDS", "unit_interval");
        let config = LocalizerConfig::default().with_profile_overrides("RCATESTPROFILE");
        assert_eq!(config.beta, 0.8);
        assert_eq!(config.score_bounds, ScoreBounds::UnitInterval);
        env::remove_var("RCATESTPROFILE_RCA_BETA");
        env::remove_var("RCATESTPROFILE_RCA_SCORE_BOUNDS");
    }

    #[test]
    fn score_bounds_apply() {
        assert_eq!(ScoreBounds::AtLeastOne.apply(0.4), 1.0);
        assert_eq!(ScoreBounds::AtLeastOne.apply(1.7), 1.7);
        assert_eq!(ScoreBounds::UnitInterval.apply(1.7), 1.0);
        assert_eq!(ScoreBounds::UnitInterval.apply(-0.2), 0.0);
    }
}

//! Analysis configuration
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the platform config dir
//!    (~/.config/spendlens/analysis.toml on Linux)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys absent from an override keep their default values. Out-of-domain
//! values fail fast with [`Error::InvalidConfig`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::money::Money;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analysis.toml");

/// Upper bound on the time-series window (ten years)
pub const MAX_WINDOW_MONTHS: u32 = 120;

/// Tunables for a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Number of month buckets in the time series, ending at the reference month
    pub window_months: u32,
    /// Recurring clusters averaging strictly below this are "small"
    pub small_threshold: Money,
    /// Assumed reducible share of small recurring spend
    pub reduction_factor: f64,
    /// Cap on savings recommendations
    pub max_recommendations: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_months: 6,
            small_threshold: Money::from_cents(5000),
            reduction_factor: 0.20,
            max_recommendations: 5,
        }
    }
}

impl AnalysisConfig {
    /// Load from an explicit path, the default override location, or the
    /// embedded defaults, in that order. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = match path {
            Some(path) => {
                debug!("Loading analysis config from {}", path.display());
                fs::read_to_string(path).map_err(|e| {
                    Error::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
                })?
            }
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => {
                    debug!("Loading analysis config override from {}", path.display());
                    fs::read_to_string(&path).map_err(|e| {
                        Error::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
                    })?
                }
                None => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::from_toml_str(&content)
    }

    /// Parse TOML content layered over the defaults, then validate
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::InvalidConfig(format!("Invalid config TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(analysis) = raw.analysis {
            if let Some(months) = analysis.window_months {
                config.window_months = u32::try_from(months).map_err(|_| {
                    Error::InvalidConfig(format!(
                        "window_months must be between 1 and {}, got {}",
                        MAX_WINDOW_MONTHS, months
                    ))
                })?;
            }
            if let Some(threshold) = analysis.small_threshold {
                if !threshold.is_finite() || threshold < 0.0 {
                    return Err(Error::InvalidConfig(format!(
                        "small_threshold must be a non-negative amount, got {}",
                        threshold
                    )));
                }
                config.small_threshold = Money::from_major(threshold);
            }
            if let Some(factor) = analysis.reduction_factor {
                config.reduction_factor = factor;
            }
            if let Some(max) = analysis.max_recommendations {
                config.max_recommendations = usize::try_from(max).map_err(|_| {
                    Error::InvalidConfig(format!(
                        "max_recommendations must be at least 1, got {}",
                        max
                    ))
                })?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every value is in its domain
    pub fn validate(&self) -> Result<()> {
        if self.window_months == 0 || self.window_months > MAX_WINDOW_MONTHS {
            return Err(Error::InvalidConfig(format!(
                "window_months must be between 1 and {}, got {}",
                MAX_WINDOW_MONTHS, self.window_months
            )));
        }
        if self.small_threshold.is_negative() {
            return Err(Error::InvalidConfig(format!(
                "small_threshold must be non-negative, got {}",
                self.small_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.reduction_factor) {
            return Err(Error::InvalidConfig(format!(
                "reduction_factor must be between 0 and 1, got {}",
                self.reduction_factor
            )));
        }
        if self.max_recommendations == 0 {
            return Err(Error::InvalidConfig(
                "max_recommendations must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Same config with a different window, validated
    pub fn with_window_months(mut self, months: u32) -> Result<Self> {
        self.window_months = months;
        self.validate()?;
        Ok(self)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("spendlens").join("analysis.toml"))
}

/// Raw config structure for TOML parsing. Integers are signed so negative
/// values reach validation instead of failing as type errors.
#[derive(Debug, Deserialize)]
struct RawConfig {
    analysis: Option<RawAnalysis>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    window_months: Option<i64>,
    small_threshold: Option<f64>,
    reduction_factor: Option<f64>,
    max_recommendations: Option<i64>,
}

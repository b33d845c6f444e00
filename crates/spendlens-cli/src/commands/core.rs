//! Shared command setup

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use spendlens_core::config::AnalysisConfig;
use spendlens_core::import::load_records;
use spendlens_core::normalize::{normalize, Normalized};
use spendlens_core::Analyzer;
use tracing::{info, warn};

/// Build the analyzer from config, applying a `--months` override
pub fn open_analyzer(config_path: Option<&Path>, months: Option<u32>) -> Result<Analyzer> {
    let mut config = AnalysisConfig::load(config_path).context("Failed to load analysis config")?;
    if let Some(months) = months {
        config = config
            .with_window_months(months)
            .context("Invalid --months value")?;
    }
    Ok(Analyzer::new(config)?)
}

/// Parse `--now`, defaulting to today (UTC)
pub fn resolve_now(now: Option<&str>) -> Result<NaiveDate> {
    match now {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .context("Invalid --now date format (use YYYY-MM-DD)"),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Load and normalize a transactions file
pub fn load_transactions(input: &Path, now: NaiveDate) -> Result<Normalized> {
    let records = load_records(input)
        .with_context(|| format!("Failed to read transactions from {}", input.display()))?;
    let normalized = normalize(&records, now)
        .with_context(|| format!("{} does not contain transaction records", input.display()))?;

    let stats = &normalized.stats;
    info!(
        "Loaded {} transactions from {}",
        stats.records,
        input.display()
    );
    if stats.defaulted_amounts > 0 || stats.unknown_dates > 0 || stats.non_object_records > 0 {
        warn!(
            "{} records without a usable amount, {} with unparseable dates, {} malformed",
            stats.defaulted_amounts, stats.unknown_dates, stats.non_object_records
        );
    }

    Ok(normalized)
}

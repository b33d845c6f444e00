//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared setup (config, reference date, loading input)
//! - `analyze` - Full report and expense insights
//! - `reports` - Trends, breakdowns, recurring expenses, savings
//! - `transactions` - Listing and search
//! - `config` - Effective configuration

pub mod analyze;
pub mod config;
pub mod core;
pub mod reports;
pub mod transactions;

// Re-export command functions for main.rs
pub use analyze::*;
pub use config::*;
pub use core::*;
pub use reports::*;
pub use transactions::*;

use anyhow::{Context, Result};
use serde::Serialize;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    println!("{}", json);
    Ok(())
}

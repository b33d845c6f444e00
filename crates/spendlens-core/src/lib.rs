//! Spendlens Core Library
//!
//! Transaction analytics for a personal finance dashboard:
//! - Normalization of loosely-typed backend records into canonical transactions
//! - Fixed-point money arithmetic
//! - Monthly income/expense series and percentage breakdowns
//! - Recurring expense detection and savings estimates
//! - Layered TOML configuration
//! - JSON and CSV record loading
//! - Transaction search and paging

pub mod analysis;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod money;
pub mod normalize;
pub mod search;

/// Transaction builders for unit tests
#[cfg(test)]
pub mod test_utils;

pub use analysis::{AnalysisReport, Analyzer, ExpenseInsights, GroupBy};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use import::{load_records, InputFormat};
pub use models::{Direction, Transaction, TransactionType};
pub use money::Money;
pub use normalize::{normalize, NormalizationStats, Normalized};

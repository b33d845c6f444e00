//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendlens - See where the money goes
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Transaction analytics for personal finance exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Analysis config file (defaults to the platform config dir, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Reference date (YYYY-MM-DD) for the time window and undated records; defaults to today
    #[arg(long, global = true)]
    pub now: Option<String>,

    /// Number of months in the time series (overrides config)
    #[arg(long, global = true)]
    pub months: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full analysis report
    Analyze {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Expense insights: top categories, recurring expenses, savings
    Insights {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Monthly income and expense totals
    Trends {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Percentage breakdown of one class of transactions
    Breakdown {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Group by: type, merchant, category
        #[arg(short, long, default_value = "type")]
        by: String,

        /// Transaction class: income, expense
        #[arg(short, long, default_value = "expense")]
        class: String,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Recurring expenses (same merchant and amount)
    Recurring {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Savings potential from small recurring expenses
    Savings {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// List transactions, optionally filtered by a search term
    Transactions {
        /// Transactions file (JSON, or CSV with a header row)
        #[arg(short, long)]
        input: PathBuf,

        /// Case-insensitive match on description, account name, or account type
        #[arg(short, long)]
        search: Option<String>,

        /// Rows per page
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: usize,

        /// Print machine-readable JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show the effective analysis configuration
    Config {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

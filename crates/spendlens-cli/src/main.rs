//! Spendlens CLI - Transaction analytics
//!
//! Usage:
//!   spendlens analyze --input tx.json      Full report
//!   spendlens insights --input tx.csv      Top categories, recurring, savings
//!   spendlens trends --input tx.json       Monthly income/expense
//!   spendlens breakdown --input tx.json --by merchant --class income
//!   spendlens transactions --input tx.json --search coffee
//!   spendlens config                       Effective configuration

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // stderr keeps --json output on stdout parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let analyzer = commands::open_analyzer(cli.config.as_deref(), cli.months)?;

    let now = commands::resolve_now(cli.now.as_deref())?;

    match cli.command {
        Commands::Analyze { input, json } => commands::cmd_analyze(&analyzer, &input, now, json),
        Commands::Insights { input, json } => commands::cmd_insights(&analyzer, &input, now, json),
        Commands::Trends { input, json } => commands::cmd_trends(&analyzer, &input, now, json),
        Commands::Breakdown {
            input,
            by,
            class,
            json,
        } => commands::cmd_breakdown(&input, now, &by, &class, json),
        Commands::Recurring { input, json } => {
            commands::cmd_recurring(&analyzer, &input, now, json)
        }
        Commands::Savings { input, json } => commands::cmd_savings(&analyzer, &input, now, json),
        Commands::Transactions {
            input,
            search,
            limit,
            page,
            json,
        } => commands::cmd_transactions(&input, now, search.as_deref(), limit, page, json),
        Commands::Config { json } => commands::cmd_config(&analyzer, json),
    }
}

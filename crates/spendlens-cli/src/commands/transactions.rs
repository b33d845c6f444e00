//! Transaction listing and search

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use spendlens_core::analysis::report::TransactionRow;
use spendlens_core::search::{page, page_count, search};

use super::{load_transactions, print_json, truncate};

/// One page of matching transactions
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListing {
    /// Matches across all pages
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub transactions: Vec<TransactionRow>,
}

/// Search the input and cut out one 1-based page of `limit` rows
pub fn list_transactions(
    input: &Path,
    now: NaiveDate,
    term: Option<&str>,
    limit: usize,
    page_number: usize,
) -> Result<TransactionListing> {
    let normalized = load_transactions(input, now)?;
    let matches = search(&normalized.transactions, term.unwrap_or(""));

    Ok(TransactionListing {
        total: matches.len(),
        page: page_number.max(1),
        page_count: page_count(matches.len(), limit),
        transactions: page(&matches, page_number, limit)
            .iter()
            .map(|tx| TransactionRow::from(*tx))
            .collect(),
    })
}

pub fn cmd_transactions(
    input: &Path,
    now: NaiveDate,
    term: Option<&str>,
    limit: usize,
    page_number: usize,
    json: bool,
) -> Result<()> {
    let listing = list_transactions(input, now, term, limit, page_number)?;

    if json {
        return print_json(&listing);
    }

    println!();
    match term {
        Some(t) if !t.trim().is_empty() => println!("📝 Transactions matching \"{}\"", t.trim()),
        _ => println!("📝 Transactions"),
    }
    println!("   ─────────────────────────────────────────────────────────────");

    if listing.transactions.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    for tx in &listing.transactions {
        let amount_str = if tx.amount < 0.0 {
            format!("\x1b[31m${:.2}\x1b[0m", tx.amount.abs()) // Red for expenses
        } else {
            format!("\x1b[32m+${:.2}\x1b[0m", tx.amount) // Green for income
        };

        println!(
            "   {:10} │ {:>10} │ {:20} │ {}",
            tx.date.as_deref().unwrap_or("unknown"),
            amount_str,
            truncate(&tx.account_name, 20),
            truncate(&tx.description, 40)
        );
    }

    println!();
    println!(
        "   Page {} of {} ({} matching)",
        listing.page, listing.page_count, listing.total
    );

    Ok(())
}

//! Report command implementations

use std::path::Path;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use spendlens_core::analysis::report::{
    breakdown_items, time_series, RecurringDetail, SavingsSummary,
};
use spendlens_core::analysis::{breakdown, GroupBy};
use spendlens_core::models::Direction;
use spendlens_core::Analyzer;

use super::analyze::print_series;
use super::{load_transactions, print_json, truncate};

pub fn cmd_trends(analyzer: &Analyzer, input: &Path, now: NaiveDate, json: bool) -> Result<()> {
    let normalized = load_transactions(input, now)?;
    let series = time_series(&analyzer.time_series(&normalized.transactions, now));

    if json {
        return print_json(&series);
    }

    println!();
    println!("📈 Income & Expense Trends");
    println!(
        "   Last {} months ending {}",
        analyzer.config().window_months,
        now
    );
    println!("   ─────────────────────────────────────────────────────────────");
    print_series(&series);

    let income: f64 = series.iter().map(|p| p.income).sum();
    let expense: f64 = series.iter().map(|p| p.expense).sum();
    println!("   ─────────┼──────────────┼──────────────");
    println!("   {:8} │ {:>12.2} │ {:>12.2}", "Total", income, expense);

    Ok(())
}

pub fn cmd_breakdown(
    input: &Path,
    now: NaiveDate,
    by: &str,
    class: &str,
    json: bool,
) -> Result<()> {
    let group_by: GroupBy = by.parse().map_err(|e: String| anyhow!(e))?;
    let direction: Direction = class.parse().map_err(|e: String| anyhow!(e))?;

    let normalized = load_transactions(input, now)?;
    let items = breakdown_items(&breakdown(&normalized.transactions, direction, group_by));

    if json {
        return print_json(&items);
    }

    println!();
    println!("🧮 {} by {}", capitalize(direction.as_str()), group_by);
    println!("   ─────────────────────────────────────────────────────────────");

    if items.is_empty() {
        println!("   No {} transactions found.", direction);
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Group", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");
    for item in &items {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&item.key, 25),
            item.amount,
            item.percentage,
            item.transaction_count
        );
    }

    Ok(())
}

/// Recurring clusters in report form, largest total first
pub fn recurring_report(
    analyzer: &Analyzer,
    input: &Path,
    now: NaiveDate,
) -> Result<Vec<RecurringDetail>> {
    let normalized = load_transactions(input, now)?;
    let clusters = analyzer.recurring(&normalized.transactions);
    Ok(clusters.iter().map(RecurringDetail::from).collect())
}

pub fn savings_report(analyzer: &Analyzer, input: &Path, now: NaiveDate) -> Result<SavingsSummary> {
    let normalized = load_transactions(input, now)?;
    let clusters = analyzer.recurring(&normalized.transactions);
    Ok(SavingsSummary::from(&analyzer.savings(&clusters)))
}

pub fn cmd_recurring(analyzer: &Analyzer, input: &Path, now: NaiveDate, json: bool) -> Result<()> {
    let details = recurring_report(analyzer, input, now)?;

    if json {
        return print_json(&details);
    }

    println!();
    println!("🔁 Recurring Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    if details.is_empty() {
        println!("   No recurring expenses found.");
        return Ok(());
    }

    println!(
        "   {:25} │ {:>10} │ {:>5} │ {:>10} │ {:8}",
        "Merchant", "Amount", "Times", "Total", "Cadence"
    );
    println!("   ──────────────────────────┼────────────┼───────┼────────────┼─────────");
    for d in &details {
        let cadence = d.cadence.map(|c| c.as_str()).unwrap_or("-");
        let marker = if d.expense.is_small { "•" } else { " " };
        println!(
            "  {}{:25} │ {:>10.2} │ {:>5} │ {:>10.2} │ {:8}",
            marker,
            truncate(&d.expense.merchant, 25),
            d.expense.amount,
            d.expense.frequency,
            d.expense.total_spent,
            cadence
        );
    }

    let small = details.iter().filter(|d| d.expense.is_small).count();
    println!();
    println!(
        "   • {} small (under {}), {} larger",
        small,
        analyzer.config().small_threshold,
        details.len() - small
    );

    Ok(())
}

pub fn cmd_savings(analyzer: &Analyzer, input: &Path, now: NaiveDate, json: bool) -> Result<()> {
    let summary = savings_report(analyzer, input, now)?;

    if json {
        return print_json(&summary);
    }

    println!();
    println!("💰 Savings Potential");
    println!("   ─────────────────────────────────────────────────────────────");

    if summary.small_recurring_count == 0 {
        println!("   No small recurring expenses found.");
        return Ok(());
    }

    println!(
        "   Cutting {:.0}% of {} small recurring expense(s) saves ${:.2}",
        analyzer.config().reduction_factor * 100.0,
        summary.small_recurring_count,
        summary.potential_savings
    );
    println!();
    for rec in &summary.recommendations {
        println!(
            "   {:25} ${:>8.2}/mo",
            truncate(&rec.merchant, 25),
            rec.monthly_savings
        );
        println!("      {}", rec.suggestion);
    }

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

//! Full report and insights commands

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use spendlens_core::analysis::report::{ExpenseInsights, TimeSeriesPoint};
use spendlens_core::Analyzer;

use super::{load_transactions, print_json, truncate};

pub fn cmd_analyze(analyzer: &Analyzer, input: &Path, now: NaiveDate, json: bool) -> Result<()> {
    let normalized = load_transactions(input, now)?;
    let report = analyzer.analyze_transactions(&normalized.transactions, normalized.stats, now);

    if json {
        return print_json(&report);
    }

    let flow = &report.cash_flow;
    println!();
    println!("📊 Spending Analysis");
    println!(
        "   Reference date: {}    Window: {} months",
        report.reference_date, report.window_months
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Income:   ${:>12.2}  ({} transactions)",
        flow.total_income, flow.income_count
    );
    println!(
        "   Expenses: ${:>12.2}  ({} transactions)",
        flow.total_expenses, flow.expense_count
    );
    println!("   Net:      ${:>12.2}", flow.net);

    print_series(&report.time_series);
    print_insights(&report.insights);

    let stats = &report.normalization;
    if stats.defaulted_amounts + stats.unknown_dates + stats.sign_conflicts > 0 {
        println!();
        println!(
            "   \x1b[2mData quality: {} defaulted amounts, {} unknown dates, {} sign conflicts\x1b[0m",
            stats.defaulted_amounts, stats.unknown_dates, stats.sign_conflicts
        );
    }

    Ok(())
}

pub fn cmd_insights(analyzer: &Analyzer, input: &Path, now: NaiveDate, json: bool) -> Result<()> {
    let normalized = load_transactions(input, now)?;
    let insights = analyzer.insights(&normalized.transactions);

    if json {
        return print_json(&insights);
    }

    println!();
    println!("💡 Expense Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    print_insights(&insights);

    Ok(())
}

pub(crate) fn print_series(series: &[TimeSeriesPoint]) {
    println!();
    println!("   {:8} │ {:>12} │ {:>12}", "Month", "Income", "Expense");
    println!("   ─────────┼──────────────┼──────────────");
    for point in series {
        println!(
            "   {:8} │ {:>12.2} │ {:>12.2}",
            point.month, point.income, point.expense
        );
    }
}

fn print_insights(insights: &ExpenseInsights) {
    println!();
    println!("   Total expenses: ${:.2}", insights.total_expenses);

    if insights.top_categories.is_empty() {
        println!("   No expenses found.");
        return;
    }

    println!();
    println!("   {:25} │ {:>10} │ {:>6}", "Category", "Amount", "%");
    println!("   ──────────────────────────┼────────────┼────────");
    for cat in &insights.top_categories {
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}%",
            truncate(&cat.category, 25),
            cat.amount,
            cat.percentage
        );
    }

    if !insights.recurring_expenses.is_empty() {
        println!();
        println!("   🔁 Recurring: {}", insights.recurring_expenses.len());
        for rec in &insights.recurring_expenses {
            let marker = if rec.is_small { "•" } else { " " };
            println!(
                "   {} {:25} ${:>9.2} x{:<3} = ${:.2}",
                marker,
                truncate(&rec.merchant, 25),
                rec.amount,
                rec.frequency,
                rec.total_spent
            );
        }
    }

    if !insights.recommendations.is_empty() {
        println!();
        println!(
            "   💰 Potential savings: ${:.2}",
            insights.potential_savings
        );
        for rec in &insights.recommendations {
            println!("      - {} (${:.2}/mo)", rec.suggestion, rec.monthly_savings);
        }
    }
}

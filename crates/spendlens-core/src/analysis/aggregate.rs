//! Aggregation engine
//!
//! Month-bucketed income/expense series, per-class breakdowns, and
//! headline cash-flow totals. Everything here sums `Money`; percentages are
//! the only floating-point values and are computed once per entry.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Direction, Transaction};
use crate::money::Money;

use super::grouping::OrderedGroups;

/// One month of the time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// `MM-YY`, e.g. `03-24`
    pub month_key: String,
    pub year: i32,
    pub month: u32,
    pub income: Money,
    pub expense: Money,
}

/// Format a month as `MM-YY`
pub fn month_key(year: i32, month: u32) -> String {
    format!("{:02}-{:02}", month, year.rem_euclid(100))
}

/// Months since year 0, so windows can cross year boundaries with plain
/// integer arithmetic
fn month_index(year: i32, month0: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month0)
}

/// Exactly `window_months` buckets, oldest first, ending at the month of
/// `now`. Transactions without a date or outside the window are skipped.
pub fn monthly_series(
    transactions: &[Transaction],
    window_months: u32,
    now: NaiveDate,
) -> Vec<MonthBucket> {
    let window = i64::from(window_months);
    let end = month_index(now.year(), now.month0());
    let start = end - window + 1;

    let mut buckets: Vec<MonthBucket> = (start..=end)
        .map(|idx| {
            let year = idx.div_euclid(12) as i32;
            let month = idx.rem_euclid(12) as u32 + 1;
            MonthBucket {
                month_key: month_key(year, month),
                year,
                month,
                income: Money::ZERO,
                expense: Money::ZERO,
            }
        })
        .collect();

    for tx in transactions {
        let Some(date) = tx.date else {
            continue;
        };
        let idx = month_index(date.year(), date.month0());
        if idx < start || idx > end {
            continue;
        }
        let bucket = &mut buckets[(idx - start) as usize];
        match tx.direction {
            Direction::Income => bucket.income += tx.amount,
            Direction::Expense => bucket.expense += tx.amount,
        }
    }

    buckets
}

/// What a breakdown groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// Transaction type (debit, deposit, ...), the dashboard's category proxy
    Type,
    Merchant,
    Category,
}

impl GroupBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Merchant => "merchant",
            Self::Category => "category",
        }
    }

    fn key_of<'a>(&self, tx: &'a Transaction) -> &'a str {
        match self {
            Self::Type => tx.kind.as_str(),
            Self::Merchant => &tx.merchant,
            Self::Category => &tx.category,
        }
    }
}

impl std::str::FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "type" | "source" => Ok(Self::Type),
            "merchant" => Ok(Self::Merchant),
            "category" => Ok(Self::Category),
            _ => Err(format!(
                "Unknown grouping: {} (valid: type, merchant, category)",
                s
            )),
        }
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One group of a breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of the class total, 0-100
    pub percentage: f64,
}

/// Group one class of transactions and compute each group's share.
///
/// Entries come back in first-seen order; callers sort if they need to.
/// An empty class yields an empty list.
pub fn breakdown(
    transactions: &[Transaction],
    direction: Direction,
    group_by: GroupBy,
) -> Vec<BreakdownEntry> {
    let mut groups: OrderedGroups<String, (Money, usize)> = OrderedGroups::new();

    for tx in transactions.iter().filter(|t| t.direction == direction) {
        let (total, count) =
            groups.entry_or_insert_with(group_by.key_of(tx).to_string(), || (Money::ZERO, 0));
        *total += tx.amount;
        *count += 1;
    }

    let class_total: Money = groups.iter().map(|(_, (total, _))| *total).sum();

    groups
        .into_iter()
        .map(|(key, (total, transaction_count))| BreakdownEntry {
            key,
            total,
            transaction_count,
            percentage: total.percentage_of(class_total),
        })
        .collect()
}

/// Headline totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    pub total_income: Money,
    pub total_expenses: Money,
    /// Income minus expenses
    pub net: Money,
    pub income_count: usize,
    pub expense_count: usize,
}

pub fn cash_flow(transactions: &[Transaction]) -> CashFlow {
    let mut flow = CashFlow::default();
    for tx in transactions {
        match tx.direction {
            Direction::Income => {
                flow.total_income += tx.amount;
                flow.income_count += 1;
            }
            Direction::Expense => {
                flow.total_expenses += tx.amount;
                flow.expense_count += 1;
            }
        }
    }
    flow.net = flow.total_income - flow.total_expenses;
    flow
}

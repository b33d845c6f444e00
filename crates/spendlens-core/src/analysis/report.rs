//! Report output types
//!
//! The dashboard-facing contract. Everything here serializes camelCase with
//! money as decimal major units; this is the only place `Money` becomes a
//! float.

use std::cmp::Reverse;

use serde::Serialize;

use crate::models::{Direction, Transaction};
use crate::normalize::NormalizationStats;

use super::aggregate::{breakdown, BreakdownEntry, CashFlow, GroupBy, MonthBucket};
use super::recurring::{Cadence, RecurringCluster};
use super::savings::{SavingsEstimate, SavingsRecommendation};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub merchant: String,
    /// Average charge
    pub amount: f64,
    pub frequency: usize,
    pub total_spent: f64,
    pub category: String,
    pub is_small: bool,
}

/// A recurring expense with its date span and billing cadence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringDetail {
    #[serde(flatten)]
    pub expense: RecurringExpense,
    /// `YYYY-MM-DD`, absent when no member is dated
    pub first_seen: Option<String>,
    pub last_seen: Option<String>,
    pub cadence: Option<Cadence>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub merchant: String,
    pub monthly_savings: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsSummary {
    pub potential_savings: f64,
    pub small_recurring_count: usize,
    pub recommendations: Vec<Recommendation>,
}

/// One row of the transaction listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRow {
    pub id: String,
    /// `YYYY-MM-DD`, absent when the date is unknown
    pub date: Option<String>,
    pub description: String,
    pub merchant: String,
    pub account_name: String,
    pub account_type: String,
    /// Expenses negative
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Expense insights as the dashboard consumes them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInsights {
    pub total_expenses: f64,
    /// Expenses by category, largest first
    pub top_categories: Vec<CategoryTotal>,
    pub recurring_expenses: Vec<RecurringExpense>,
    pub potential_savings: f64,
    pub recommendations: Vec<Recommendation>,
}

/// One point of the income/expense chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// `MM-YY`
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    pub key: String,
    pub amount: f64,
    pub transaction_count: usize,
    pub percentage: f64,
}

/// Unsorted type and merchant breakdowns for both classes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdowns {
    pub income_by_type: Vec<BreakdownItem>,
    pub expense_by_type: Vec<BreakdownItem>,
    pub income_by_merchant: Vec<BreakdownItem>,
    pub expense_by_merchant: Vec<BreakdownItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

/// Everything one pipeline run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// `YYYY-MM-DD`
    pub reference_date: String,
    pub window_months: u32,
    pub cash_flow: CashFlowSummary,
    pub time_series: Vec<TimeSeriesPoint>,
    pub breakdowns: Breakdowns,
    pub insights: ExpenseInsights,
    pub normalization: NormalizationStats,
}

impl From<&MonthBucket> for TimeSeriesPoint {
    fn from(bucket: &MonthBucket) -> Self {
        Self {
            month: bucket.month_key.clone(),
            income: bucket.income.to_major(),
            expense: bucket.expense.to_major(),
        }
    }
}

impl From<&BreakdownEntry> for BreakdownItem {
    fn from(entry: &BreakdownEntry) -> Self {
        Self {
            key: entry.key.clone(),
            amount: entry.total.to_major(),
            transaction_count: entry.transaction_count,
            percentage: entry.percentage,
        }
    }
}

impl From<&RecurringCluster> for RecurringExpense {
    fn from(cluster: &RecurringCluster) -> Self {
        Self {
            merchant: cluster.merchant.clone(),
            amount: cluster.average_amount.to_major(),
            frequency: cluster.frequency,
            total_spent: cluster.total_spent.to_major(),
            category: cluster.category.clone(),
            is_small: cluster.is_small,
        }
    }
}

impl From<&RecurringCluster> for RecurringDetail {
    fn from(cluster: &RecurringCluster) -> Self {
        Self {
            expense: RecurringExpense::from(cluster),
            first_seen: cluster.first_seen.map(|d| d.format("%Y-%m-%d").to_string()),
            last_seen: cluster.last_seen.map(|d| d.format("%Y-%m-%d").to_string()),
            cadence: cluster.cadence,
        }
    }
}

impl From<&SavingsEstimate> for SavingsSummary {
    fn from(estimate: &SavingsEstimate) -> Self {
        Self {
            potential_savings: estimate.potential_savings.to_major(),
            small_recurring_count: estimate.small_recurring.len(),
            recommendations: estimate
                .recommendations
                .iter()
                .map(Recommendation::from)
                .collect(),
        }
    }
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            date: tx.date.map(|d| d.format("%Y-%m-%d").to_string()),
            description: tx.description.clone(),
            merchant: tx.merchant.clone(),
            account_name: tx.account_name.clone(),
            account_type: tx.account_type.clone(),
            amount: tx.signed_amount().to_major(),
            kind: tx.kind.as_str().to_string(),
        }
    }
}

impl From<&SavingsRecommendation> for Recommendation {
    fn from(rec: &SavingsRecommendation) -> Self {
        Self {
            merchant: rec.merchant.clone(),
            monthly_savings: rec.monthly_savings.to_major(),
            suggestion: rec.suggestion.clone(),
        }
    }
}

impl From<&CashFlow> for CashFlowSummary {
    fn from(flow: &CashFlow) -> Self {
        Self {
            total_income: flow.total_income.to_major(),
            total_expenses: flow.total_expenses.to_major(),
            net: flow.net.to_major(),
            income_count: flow.income_count,
            expense_count: flow.expense_count,
        }
    }
}

pub fn time_series(buckets: &[MonthBucket]) -> Vec<TimeSeriesPoint> {
    buckets.iter().map(TimeSeriesPoint::from).collect()
}

pub fn breakdown_items(entries: &[BreakdownEntry]) -> Vec<BreakdownItem> {
    entries.iter().map(BreakdownItem::from).collect()
}

/// Expenses by category, largest amount first. The sort is stable, so equal
/// amounts stay in first-seen order.
pub fn top_categories(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut entries = breakdown(transactions, Direction::Expense, GroupBy::Category);
    entries.sort_by_key(|e| Reverse(e.total));
    entries
        .into_iter()
        .map(|e| CategoryTotal {
            category: e.key,
            amount: e.total.to_major(),
            percentage: e.percentage,
        })
        .collect()
}

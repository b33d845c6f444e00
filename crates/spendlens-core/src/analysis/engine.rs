//! Pipeline composition
//!
//! Normalizer -> {aggregation, recurrence} -> savings. An [`Analyzer`] holds
//! nothing but its config, so one instance can serve any number of runs
//! (and threads).

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{Direction, Transaction};
use crate::money::Money;
use crate::normalize::{normalize, NormalizationStats};

use super::aggregate::{breakdown, cash_flow, monthly_series, GroupBy, MonthBucket};
use super::recurring::{detect_recurring, RecurringCluster};
use super::report::{
    breakdown_items, time_series, top_categories, AnalysisReport, Breakdowns, CashFlowSummary,
    ExpenseInsights, Recommendation, RecurringExpense,
};
use super::savings::{estimate_savings, SavingsEstimate};

/// Runs the analytics pipeline with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer, rejecting out-of-domain configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Full report for a raw backend response. `now` is the reference date
    /// for the time-series window and for records without a date.
    pub fn analyze(&self, input: &Value, now: NaiveDate) -> Result<AnalysisReport> {
        let normalized = normalize(input, now)?;
        Ok(self.analyze_transactions(&normalized.transactions, normalized.stats, now))
    }

    /// Full report for already-normalized transactions
    pub fn analyze_transactions(
        &self,
        transactions: &[Transaction],
        stats: NormalizationStats,
        now: NaiveDate,
    ) -> AnalysisReport {
        let buckets = self.time_series(transactions, now);
        let flow = cash_flow(transactions);
        let insights = self.insights(transactions);

        info!(
            "Analyzed {} transactions: income {}, expenses {}, {} recurring clusters",
            transactions.len(),
            flow.total_income,
            flow.total_expenses,
            insights.recurring_expenses.len()
        );

        AnalysisReport {
            reference_date: now.format("%Y-%m-%d").to_string(),
            window_months: self.config.window_months,
            cash_flow: CashFlowSummary::from(&flow),
            time_series: time_series(&buckets),
            breakdowns: Breakdowns {
                income_by_type: breakdown_items(&breakdown(transactions, Direction::Income, GroupBy::Type)),
                expense_by_type: breakdown_items(&breakdown(transactions, Direction::Expense, GroupBy::Type)),
                income_by_merchant: breakdown_items(&breakdown(
                    transactions,
                    Direction::Income,
                    GroupBy::Merchant,
                )),
                expense_by_merchant: breakdown_items(&breakdown(
                    transactions,
                    Direction::Expense,
                    GroupBy::Merchant,
                )),
            },
            insights,
            normalization: stats,
        }
    }

    /// The expense insights contract
    pub fn insights(&self, transactions: &[Transaction]) -> ExpenseInsights {
        let total_expenses: Money = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();
        let clusters = self.recurring(transactions);
        let savings = self.savings(&clusters);

        ExpenseInsights {
            total_expenses: total_expenses.to_major(),
            top_categories: top_categories(transactions),
            recurring_expenses: clusters.iter().map(RecurringExpense::from).collect(),
            potential_savings: savings.potential_savings.to_major(),
            recommendations: savings
                .recommendations
                .iter()
                .map(Recommendation::from)
                .collect(),
        }
    }

    /// Month buckets over the configured window ending at `now`
    pub fn time_series(&self, transactions: &[Transaction], now: NaiveDate) -> Vec<MonthBucket> {
        monthly_series(transactions, self.config.window_months, now)
    }

    pub fn recurring(&self, transactions: &[Transaction]) -> Vec<RecurringCluster> {
        detect_recurring(transactions, self.config.small_threshold)
    }

    pub fn savings(&self, clusters: &[RecurringCluster]) -> SavingsEstimate {
        estimate_savings(
            clusters,
            self.config.reduction_factor,
            self.config.max_recommendations,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn sample() -> Value {
        json!([
            {"id": "1", "merchant": "Coffee", "amount": -5.00, "date": "2024-02-03", "category": "Food"},
            {"id": "2", "merchant": "Coffee", "amount": -5.00, "date": "2024-03-03", "category": "Food"},
            {"id": "3", "merchant": "Employer", "amount": 2500.00, "date": "2024-03-01", "type": "deposit"},
            {"id": "4", "merchant": "Landlord", "amount": -1200.00, "date": "2024-03-01", "category": "Housing"}
        ])
    }

    #[test]
    fn test_analyze_sample() {
        let report = Analyzer::default().analyze(&sample(), now()).unwrap();

        assert_eq!(report.reference_date, "2024-03-15");
        assert_eq!(report.time_series.len(), 6);
        assert_eq!(report.time_series[5].month, "03-24");
        assert_eq!(report.time_series[5].income, 2500.0);
        assert_eq!(report.time_series[5].expense, 1205.0);
        assert_eq!(report.cash_flow.net, 1290.0);

        let insights = &report.insights;
        assert_eq!(insights.total_expenses, 1210.0);
        assert_eq!(insights.top_categories[0].category, "Housing");
        assert_eq!(insights.recurring_expenses.len(), 1);
        assert_eq!(insights.potential_savings, 2.0);
        assert_eq!(insights.recommendations[0].monthly_savings, 1.0);
        assert_eq!(report.breakdowns.income_by_type[0].key, "deposit");
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig {
            reduction_factor: 2.0,
            ..Default::default()
        };
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_window_follows_config() {
        let analyzer = Analyzer::new(AnalysisConfig::default().with_window_months(12).unwrap()).unwrap();
        let report = analyzer.analyze(&sample(), now()).unwrap();
        assert_eq!(report.time_series.len(), 12);
        assert_eq!(report.window_months, 12);
    }

    #[test]
    fn test_structural_error() {
        assert!(Analyzer::default().analyze(&json!("nope"), now()).is_err());
    }

    #[test]
    fn test_analyzer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Analyzer>();
    }
}

//! Recurring expense detection
//!
//! Clusters expense transactions sharing a merchant and an exact amount.
//! Amounts must match to the cent; a subscription whose price changes
//! mid-history splits into two clusters (known limitation).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::models::Transaction;
use crate::money::Money;

use super::grouping::OrderedGroups;

/// Fewest occurrences that count as recurring
pub const MIN_OCCURRENCES: usize = 2;

/// Rough billing cadence inferred from the gaps between dated charges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Cadence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Expenses sharing a merchant and an exact amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringCluster {
    pub merchant: String,
    pub average_amount: Money,
    /// Always at least [`MIN_OCCURRENCES`]
    pub frequency: usize,
    pub total_spent: Money,
    /// Category of the first member
    pub category: String,
    pub is_small: bool,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
    pub cadence: Option<Cadence>,
}

/// Find recurring expense clusters.
///
/// Income is ignored. Clusters are ordered by total spent (highest first),
/// then merchant name ascending, then average amount descending, which is a
/// total order because each (merchant, amount) pair forms one cluster.
pub fn detect_recurring(transactions: &[Transaction], small_threshold: Money) -> Vec<RecurringCluster> {
    let mut groups: OrderedGroups<(String, Money), Vec<&Transaction>> = OrderedGroups::new();

    for tx in transactions.iter().filter(|t| t.is_expense()) {
        groups
            .entry_or_insert_with((tx.merchant.clone(), tx.amount), Vec::new)
            .push(tx);
    }

    let mut clusters: Vec<RecurringCluster> = groups
        .into_iter()
        .filter(|(_, members)| members.len() >= MIN_OCCURRENCES)
        .map(|((merchant, _), members)| build_cluster(merchant, &members, small_threshold))
        .collect();

    clusters.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then_with(|| a.merchant.cmp(&b.merchant))
            .then_with(|| b.average_amount.cmp(&a.average_amount))
    });

    debug!(
        "Found {} recurring clusters ({} small)",
        clusters.len(),
        clusters.iter().filter(|c| c.is_small).count()
    );

    clusters
}

fn build_cluster(merchant: String, members: &[&Transaction], small_threshold: Money) -> RecurringCluster {
    let frequency = members.len();
    let count = frequency as i64;
    let total_spent: Money = members.iter().map(|t| t.amount.abs()).sum();

    let mut dates: Vec<NaiveDate> = members.iter().filter_map(|t| t.date).collect();
    dates.sort();

    RecurringCluster {
        merchant,
        average_amount: total_spent.div_round(count),
        frequency,
        total_spent,
        category: members[0].category.clone(),
        // exact form of `total / count < threshold`
        is_small: total_spent < small_threshold * count,
        first_seen: dates.first().copied(),
        last_seen: dates.last().copied(),
        cadence: infer_cadence(&dates),
    }
}

/// Classify the average gap between sorted dates. Needs two dates; gaps
/// averaging under a day or over ~13 months have no cadence.
fn infer_cadence(sorted_dates: &[NaiveDate]) -> Option<Cadence> {
    if sorted_dates.len() < 2 {
        return None;
    }

    let intervals: Vec<i64> = sorted_dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect();
    let avg_interval = intervals.iter().sum::<i64>() as f64 / intervals.len() as f64;

    if avg_interval < 1.0 {
        None
    } else if avg_interval < 10.0 {
        Some(Cadence::Weekly)
    } else if avg_interval < 45.0 {
        Some(Cadence::Monthly)
    } else if avg_interval < 400.0 {
        Some(Cadence::Yearly)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, income};

    const THRESHOLD: Money = Money::from_cents(5000);

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_coffee_scenario() {
        let txs = vec![
            expense("Coffee", 500, Some(d(2024, 1, 3))),
            expense("Coffee", 500, Some(d(2024, 2, 3))),
        ];
        let clusters = detect_recurring(&txs, THRESHOLD);
        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert_eq!(c.merchant, "Coffee");
        assert_eq!(c.frequency, 2);
        assert_eq!(c.total_spent, Money::from_cents(1000));
        assert_eq!(c.average_amount, Money::from_cents(500));
        assert!(c.is_small);
        assert_eq!(c.first_seen, Some(d(2024, 1, 3)));
        assert_eq!(c.last_seen, Some(d(2024, 2, 3)));
        assert_eq!(c.cadence, Some(Cadence::Monthly));
    }

    #[test]
    fn test_single_occurrence_is_not_recurring() {
        let txs = vec![
            expense("Gym", 4000, None),
            expense("Gym", 4001, None),
            expense("Cinema", 1200, None),
        ];
        assert!(detect_recurring(&txs, THRESHOLD).is_empty());
    }

    #[test]
    fn test_income_is_excluded() {
        let txs = vec![
            income("Employer", 250_000, None),
            income("Employer", 250_000, None),
        ];
        assert!(detect_recurring(&txs, THRESHOLD).is_empty());
    }

    #[test]
    fn test_same_merchant_different_amounts_split() {
        let txs = vec![
            expense("Netflix", 1549, None),
            expense("Netflix", 1549, None),
            expense("Netflix", 1799, None),
            expense("Netflix", 1799, None),
        ];
        let clusters = detect_recurring(&txs, THRESHOLD);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].average_amount, Money::from_cents(1799));
        assert_eq!(clusters[1].average_amount, Money::from_cents(1549));
    }

    #[test]
    fn test_sorted_by_total_with_merchant_tie_break() {
        let txs = vec![
            expense("Zeta", 1000, None),
            expense("Zeta", 1000, None),
            expense("Alpha", 1000, None),
            expense("Alpha", 1000, None),
            expense("Rent", 150_000, None),
            expense("Rent", 150_000, None),
        ];
        let merchants: Vec<_> = detect_recurring(&txs, THRESHOLD)
            .into_iter()
            .map(|c| c.merchant)
            .collect();
        assert_eq!(merchants, vec!["Rent", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_equal_total_same_merchant_orders_by_average() {
        // 3 x 4.00 and 2 x 6.00 both total 12.00
        let txs = vec![
            expense("Deli", 400, None),
            expense("Deli", 400, None),
            expense("Deli", 400, None),
            expense("Deli", 600, None),
            expense("Deli", 600, None),
        ];
        let clusters = detect_recurring(&txs, THRESHOLD);
        assert_eq!(clusters[0].average_amount, Money::from_cents(600));
        assert_eq!(clusters[1].average_amount, Money::from_cents(400));
    }

    #[test]
    fn test_small_threshold_is_strict() {
        let txs = vec![
            expense("Exactly", 5000, None),
            expense("Exactly", 5000, None),
            expense("Under", 4999, None),
            expense("Under", 4999, None),
        ];
        let clusters = detect_recurring(&txs, THRESHOLD);
        let exactly = clusters.iter().find(|c| c.merchant == "Exactly").unwrap();
        let under = clusters.iter().find(|c| c.merchant == "Under").unwrap();
        assert!(!exactly.is_small);
        assert!(under.is_small);
    }

    #[test]
    fn test_category_from_first_member() {
        let mut first = expense("Shop", 700, None);
        first.category = "Food".into();
        let mut second = expense("Shop", 700, None);
        second.category = "Other".into();
        let clusters = detect_recurring(&[first, second], THRESHOLD);
        assert_eq!(clusters[0].category, "Food");
    }

    #[test]
    fn test_deterministic_across_runs() {
        let txs: Vec<_> = (0..50)
            .map(|i| expense(&format!("M{}", i % 7), 100 * (i % 3 + 1), None))
            .collect();
        assert_eq!(detect_recurring(&txs, THRESHOLD), detect_recurring(&txs, THRESHOLD));
        assert!(detect_recurring(&txs, THRESHOLD)
            .iter()
            .all(|c| c.frequency >= MIN_OCCURRENCES));
    }

    #[test]
    fn test_infer_cadence() {
        assert_eq!(infer_cadence(&[d(2024, 1, 1)]), None);
        assert_eq!(infer_cadence(&[d(2024, 1, 1), d(2024, 1, 1)]), None);
        assert_eq!(
            infer_cadence(&[d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)]),
            Some(Cadence::Weekly)
        );
        assert_eq!(
            infer_cadence(&[d(2023, 1, 1), d(2024, 1, 1)]),
            Some(Cadence::Yearly)
        );
        assert_eq!(infer_cadence(&[d(2020, 1, 1), d(2024, 1, 1)]), None);
    }

    #[test]
    fn test_undated_members_still_cluster() {
        let txs = vec![expense("Vending", 150, None), expense("Vending", 150, None)];
        let clusters = detect_recurring(&txs, THRESHOLD);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].first_seen, None);
        assert_eq!(clusters[0].cadence, None);
    }
}

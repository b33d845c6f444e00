//! Savings estimator
//!
//! Works from the recurrence detector's output only. Small recurring
//! charges are treated as the reducible part of spending.

use serde::Serialize;
use tracing::debug;

use crate::money::Money;

use super::recurring::RecurringCluster;

/// One suggested cutback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsRecommendation {
    pub merchant: String,
    /// Reduction of one average charge
    pub monthly_savings: Money,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SavingsEstimate {
    pub potential_savings: Money,
    /// Small clusters, in detector order
    pub small_recurring: Vec<RecurringCluster>,
    pub recommendations: Vec<SavingsRecommendation>,
}

/// Estimate savings from small recurring clusters.
///
/// `clusters` must already be in detector order; recommendations are taken
/// from the front of the small ones, at most `max_recommendations`.
pub fn estimate_savings(
    clusters: &[RecurringCluster],
    reduction_factor: f64,
    max_recommendations: usize,
) -> SavingsEstimate {
    let small_recurring: Vec<RecurringCluster> =
        clusters.iter().filter(|c| c.is_small).cloned().collect();

    let potential_savings: Money = small_recurring
        .iter()
        .map(|c| c.total_spent.scale(reduction_factor))
        .sum();

    let recommendations: Vec<SavingsRecommendation> = small_recurring
        .iter()
        .take(max_recommendations)
        .map(|c| SavingsRecommendation {
            merchant: c.merchant.clone(),
            monthly_savings: c.average_amount.scale(reduction_factor),
            suggestion: suggestion_for(&c.merchant),
        })
        .collect();

    debug!(
        "Savings: {} from {} small clusters, {} recommendations",
        potential_savings,
        small_recurring.len(),
        recommendations.len()
    );

    SavingsEstimate {
        potential_savings,
        small_recurring,
        recommendations,
    }
}

fn suggestion_for(merchant: &str) -> String {
    format!(
        "Consider reducing {} spending by finding cheaper alternatives or cutting back.",
        merchant
    )
}

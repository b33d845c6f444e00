//! Transaction search and paging
//!
//! Matching is a case-insensitive substring test over the description,
//! account name, and account type. Results keep input order.

use tracing::debug;

use crate::models::Transaction;

/// Rows per page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Transactions matching `term`. A blank term matches everything.
pub fn search<'a>(transactions: &'a [Transaction], term: &str) -> Vec<&'a Transaction> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return transactions.iter().collect();
    }

    let matches: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| {
            [&tx.description, &tx.account_name, &tx.account_type]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();

    debug!(
        "Search {:?} matched {} of {} transactions",
        term,
        matches.len(),
        transactions.len()
    );
    matches
}

/// One 1-based page of `items`. Page 0 is treated as page 1; a page past
/// the end is empty.
pub fn page<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(per_page).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` items
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::expense;

    fn sample() -> Vec<Transaction> {
        let mut rent = expense("Landlord", 150_000, None);
        rent.description = "June Rent".into();
        let mut card = expense("Grocer", 4_550, None);
        card.description = "Weekly groceries".into();
        card.account_name = "Travel Rewards".into();
        card.account_type = "Credit Card".into();
        let mut savings = expense("Bank", 100, None);
        savings.description = "Monthly fee".into();
        savings.account_name = "Rainy Day".into();
        savings.account_type = "Savings".into();
        vec![rent, card, savings]
    }

    fn descriptions(found: &[&Transaction]) -> Vec<String> {
        found.iter().map(|t| t.description.clone()).collect()
    }

    #[test]
    fn test_search_each_field_case_insensitive() {
        let txs = sample();
        assert_eq!(descriptions(&search(&txs, "RENT")), vec!["June Rent"]);
        assert_eq!(descriptions(&search(&txs, "rewards")), vec!["Weekly groceries"]);
        assert_eq!(descriptions(&search(&txs, "credit card")), vec!["Weekly groceries"]);
        assert_eq!(descriptions(&search(&txs, "savings")), vec!["Monthly fee"]);
    }

    #[test]
    fn test_search_keeps_input_order() {
        let txs = sample();
        assert_eq!(search(&txs, "e").len(), 3);
        assert_eq!(
            descriptions(&search(&txs, "e")),
            vec!["June Rent", "Weekly groceries", "Monthly fee"]
        );
    }

    #[test]
    fn test_blank_term_matches_all() {
        let txs = sample();
        assert_eq!(search(&txs, "").len(), 3);
        assert_eq!(search(&txs, "   ").len(), 3);
        assert!(search(&txs, "zzz").is_empty());
    }

    #[test]
    fn test_merchant_is_not_searched() {
        let txs = sample();
        assert!(search(&txs, "Landlord").is_empty());
    }

    #[test]
    fn test_page() {
        let items: Vec<u32> = (1..=45).collect();
        assert_eq!(page(&items, 1, 20).len(), 20);
        assert_eq!(page(&items, 3, 20), &[41, 42, 43, 44, 45]);
        assert!(page(&items, 4, 20).is_empty());
        assert_eq!(page(&items, 0, 20)[0], 1);
        assert!(page(&items, 1, 0).is_empty());
        assert_eq!(page_count(45, 20), 3);
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(5, 0), 0);
    }
}

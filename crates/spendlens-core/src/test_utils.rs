//! Builders for canonical transactions in unit tests

use chrono::NaiveDate;

use crate::models::{Direction, Transaction, TransactionType};
use crate::money::Money;

fn transaction(merchant: &str, cents: i64, date: Option<NaiveDate>, direction: Direction) -> Transaction {
    Transaction {
        id: format!("{}-{}-{:?}", merchant, cents, date),
        account_id: "acct-1".to_string(),
        account_name: "Checking".to_string(),
        account_type: "Checking".to_string(),
        merchant: merchant.to_string(),
        description: merchant.to_string(),
        category: "General".to_string(),
        subcategory: "unknown".to_string(),
        amount: Money::from_cents(cents),
        direction,
        date,
        kind: match direction {
            Direction::Income => TransactionType::Deposit,
            Direction::Expense => TransactionType::Debit,
        },
        sign_conflict: false,
    }
}

/// An expense of `cents` at `merchant`
pub fn expense(merchant: &str, cents: i64, date: Option<NaiveDate>) -> Transaction {
    transaction(merchant, cents, date, Direction::Expense)
}

/// Income of `cents` from `merchant`
pub fn income(merchant: &str, cents: i64, date: Option<NaiveDate>) -> Transaction {
    transaction(merchant, cents, date, Direction::Income)
}

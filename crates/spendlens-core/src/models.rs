//! Domain models for Spendlens

use chrono::NaiveDate;
use serde::Serialize;

use crate::money::Money;

/// Sentinel for a missing merchant, category, or type
pub const UNKNOWN: &str = "unknown";

/// Sentinel for a missing description or account name
pub const PLACEHOLDER: &str = "—";

/// Sentinel for a missing account id
pub const UNKNOWN_ACCOUNT: &str = "unknown_account";

/// Whether a transaction adds to or takes from the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" | "credit" | "in" => Ok(Self::Income),
            "expense" | "expenses" | "debit" | "out" => Ok(Self::Expense),
            _ => Err(format!("Unknown class: {} (valid: income, expense)", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction type as reported by the backend. The set is open: anything
/// unrecognized is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Debit,
    Credit,
    Deposit,
    Withdrawal,
    Purchase,
    Transfer,
    Loan,
    Unknown,
    Other(String),
}

impl TransactionType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Purchase => "purchase",
            Self::Transfer => "transfer",
            Self::Loan => "loan",
            Self::Unknown => UNKNOWN,
            Self::Other(s) => s,
        }
    }

    /// Parse a raw type string. Never fails; empty input is `Unknown`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "unknown" => Self::Unknown,
            "debit" => Self::Debit,
            "credit" => Self::Credit,
            "deposit" => Self::Deposit,
            "withdrawal" => Self::Withdrawal,
            "purchase" => Self::Purchase,
            "transfer" => Self::Transfer,
            "loan" => Self::Loan,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TransactionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A canonical, fully-defaulted transaction produced by the normalizer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub account_name: String,
    /// Checking, savings, credit card, ...
    pub account_type: String,
    pub merchant: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    /// Non-negative magnitude
    pub amount: Money,
    pub direction: Direction,
    /// `None` when the source date could not be parsed
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The explicit sign flag disagreed with the amount's sign
    pub sign_conflict: bool,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.direction == Direction::Income
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Direction::Expense
    }

    /// Amount with the direction applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            Direction::Income => self.amount,
            Direction::Expense => Money::ZERO - self.amount,
        }
    }
}

//! Transaction normalizer
//!
//! The only adapter between whatever the transaction backend returns and the
//! canonical [`Transaction`]. Every per-record defect is absorbed by a
//! default; the only error is input that is not a list of records at all.
//!
//! Field resolution takes the first alias that is present and non-null:
//!
//! | Field        | Aliases                                        |
//! |--------------|------------------------------------------------|
//! | id           | `id`, `_id`, `transaction_id`                  |
//! | account id   | `accountId`, `account_id`                      |
//! | account name | `account_name`, `nickname`                     |
//! | account type | `account_type`, `accountType`                  |
//! | merchant     | `merchant`, `merchant_name`, `payee`           |
//! | description  | `description`, `memo`                          |
//! | date         | `date`, `transaction_date`, `purchase_date`    |
//! | type         | `type`, `transaction_type`                     |
//! | sign flag    | `positive`, `isPositive`                       |
//! | amount       | `amount_cents`, `amountCents` (integer cents), then `amount` (decimal) |
//!
//! Magnitudes above [`MAX_AMOUNT`] are treated like malformed amounts, so a
//! single absurd value cannot saturate the totals it is summed into.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Direction, Transaction, TransactionType, PLACEHOLDER, UNKNOWN, UNKNOWN_ACCOUNT};
use crate::money::Money;

const ID_FIELDS: &[&str] = &["id", "_id", "transaction_id"];
const ACCOUNT_ID_FIELDS: &[&str] = &["accountId", "account_id"];
const ACCOUNT_NAME_FIELDS: &[&str] = &["account_name", "nickname"];
const ACCOUNT_TYPE_FIELDS: &[&str] = &["account_type", "accountType"];
const MERCHANT_FIELDS: &[&str] = &["merchant", "merchant_name", "payee"];
const DESCRIPTION_FIELDS: &[&str] = &["description", "memo"];
const CATEGORY_FIELDS: &[&str] = &["category"];
const SUBCATEGORY_FIELDS: &[&str] = &["subcategory"];
const DATE_FIELDS: &[&str] = &["date", "transaction_date", "purchase_date"];
const TYPE_FIELDS: &[&str] = &["type", "transaction_type"];
const SIGN_FIELDS: &[&str] = &["positive", "isPositive"];
const CENTS_FIELDS: &[&str] = &["amount_cents", "amountCents"];
const AMOUNT_FIELDS: &[&str] = &["amount"];

/// Largest accepted per-record magnitude ($10 billion). Millions of records
/// at this ceiling still sum within `i64` cents.
pub const MAX_AMOUNT: Money = Money::from_cents(1_000_000_000_000);

/// Counts of the defaults applied during normalization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationStats {
    pub records: usize,
    /// Records that were not JSON objects
    pub non_object_records: usize,
    /// Missing, uncoercible, or out-of-range amounts (contribute zero)
    pub defaulted_amounts: usize,
    /// Missing dates that fell back to the reference date
    pub defaulted_dates: usize,
    /// Present but unparseable dates (excluded from time series)
    pub unknown_dates: usize,
    /// Explicit sign flag disagreed with the amount's sign
    pub sign_conflicts: usize,
}

/// Normalizer output
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub transactions: Vec<Transaction>,
    pub stats: NormalizationStats,
}

/// Normalize a backend response into canonical transactions.
///
/// Accepts a JSON array of records or an object wrapping one under
/// `transactions`. `today` stands in for records with no date at all.
pub fn normalize(input: &Value, today: NaiveDate) -> Result<Normalized> {
    let records = record_list(input)?;
    Ok(normalize_records(records, today))
}

/// Normalize an already-extracted list of records. Output has the same
/// length and order as the input.
pub fn normalize_records(records: &[Value], today: NaiveDate) -> Normalized {
    let mut stats = NormalizationStats {
        records: records.len(),
        ..Default::default()
    };

    let transactions = records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record, today, &mut stats))
        .collect();

    debug!(
        "Normalized {} records ({} defaulted amounts, {} unknown dates, {} sign conflicts)",
        stats.records, stats.defaulted_amounts, stats.unknown_dates, stats.sign_conflicts
    );

    Normalized {
        transactions,
        stats,
    }
}

/// Pull the record list out of a backend response
fn record_list(input: &Value) -> Result<&[Value]> {
    match input {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("transactions") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(Error::InvalidInput(format!(
                "`transactions` must be an array, got {}",
                json_type(other)
            ))),
            None => Err(Error::InvalidInput(
                "expected an array of transaction records or an object with a `transactions` array"
                    .into(),
            )),
        },
        other => Err(Error::InvalidInput(format!(
            "expected an array of transaction records, got {}",
            json_type(other)
        ))),
    }
}

fn normalize_record(
    index: usize,
    record: &Value,
    today: NaiveDate,
    stats: &mut NormalizationStats,
) -> Transaction {
    let empty = Map::new();
    let obj = match record {
        Value::Object(map) => map,
        other => {
            warn!(
                "Record {} is {} rather than an object; using defaults",
                index,
                json_type(other)
            );
            stats.non_object_records += 1;
            &empty
        }
    };

    let signed = match resolve_amount(obj) {
        Some(amount) => amount,
        None => {
            debug!("Record {}: missing or malformed amount, using 0", index);
            stats.defaulted_amounts += 1;
            Money::ZERO
        }
    };

    let direction = match lookup(obj, SIGN_FIELDS).and_then(parse_flag) {
        Some(true) => Direction::Income,
        Some(false) => Direction::Expense,
        None if signed.is_negative() => Direction::Expense,
        None => Direction::Income,
    };
    let sign_conflict = !signed.is_zero() && (direction == Direction::Income) == signed.is_negative();
    if sign_conflict {
        debug!(
            "Record {}: sign flag says {} but amount is {}; keeping the flag",
            index, direction, signed
        );
        stats.sign_conflicts += 1;
    }

    // the sign still decides direction; only the magnitude is dropped
    let amount = if signed.abs() > MAX_AMOUNT {
        debug!("Record {}: amount {} exceeds {}, using 0", index, signed, MAX_AMOUNT);
        stats.defaulted_amounts += 1;
        Money::ZERO
    } else {
        signed.abs()
    };

    let date = match lookup(obj, DATE_FIELDS) {
        None => {
            stats.defaulted_dates += 1;
            Some(today)
        }
        Some(value) => {
            let parsed = parse_date_value(value);
            if parsed.is_none() {
                debug!("Record {}: unparseable date {}", index, value);
                stats.unknown_dates += 1;
            }
            parsed
        }
    };

    let description = text(obj, DESCRIPTION_FIELDS).unwrap_or_else(|| PLACEHOLDER.to_string());

    let id = text(obj, ID_FIELDS)
        .unwrap_or_else(|| synthetic_id(index, date, &description, signed));

    Transaction {
        id,
        account_id: text(obj, ACCOUNT_ID_FIELDS).unwrap_or_else(|| UNKNOWN_ACCOUNT.to_string()),
        account_name: text(obj, ACCOUNT_NAME_FIELDS).unwrap_or_else(|| PLACEHOLDER.to_string()),
        account_type: text(obj, ACCOUNT_TYPE_FIELDS).unwrap_or_else(|| UNKNOWN.to_string()),
        merchant: text(obj, MERCHANT_FIELDS).unwrap_or_else(|| UNKNOWN.to_string()),
        description,
        category: text(obj, CATEGORY_FIELDS).unwrap_or_else(|| UNKNOWN.to_string()),
        subcategory: text(obj, SUBCATEGORY_FIELDS).unwrap_or_else(|| UNKNOWN.to_string()),
        amount,
        direction,
        date,
        kind: text(obj, TYPE_FIELDS)
            .map(|t| TransactionType::parse(&t))
            .unwrap_or(TransactionType::Unknown),
        sign_conflict,
    }
}

/// First present, non-null value among the aliases
fn lookup<'a>(obj: &'a Map<String, Value>, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .filter_map(|f| obj.get(*f))
        .find(|v| !v.is_null())
}

/// Text field; empty strings count as absent
fn text(obj: &Map<String, Value>, fields: &[&str]) -> Option<String> {
    let s = match lookup(obj, fields)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Signed amount, or `None` if nothing usable is present
fn resolve_amount(obj: &Map<String, Value>) -> Option<Money> {
    if let Some(cents) = lookup(obj, CENTS_FIELDS).and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }) {
        return Some(Money::from_cents(cents));
    }

    let value = match lookup(obj, AMOUNT_FIELDS)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_amount(s)?,
        _ => return None,
    };
    value.is_finite().then(|| Money::from_major(value))
}

/// Parse an amount string, handling currency symbols, commas and
/// accounting-style parentheses
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        _ => None,
    }
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f", // 2024-01-15T08:30:00.000
        "%Y-%m-%d %H:%M:%S",    // 2024-01-15 08:30:00
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    // `%Y` also accepts two digits, so the short-year form goes first
    let date_formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
        "%m-%d-%Y", // 01-15-2024
    ];
    for fmt in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    None
}

/// Stable id for records the backend sent without one
fn synthetic_id(index: usize, date: Option<NaiveDate>, description: &str, amount: Money) -> String {
    let mut hasher = Sha256::new();
    hasher.update(index.to_be_bytes());
    hasher.update(date.map(|d| d.to_string()).unwrap_or_default().as_bytes());
    hasher.update(description.as_bytes());
    hasher.update(amount.cents().to_be_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("gen-{}", &digest[..16])
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn one(record: Value) -> (Transaction, NormalizationStats) {
        let out = normalize(&json!([record]), today()).unwrap();
        (out.transactions[0].clone(), out.stats)
    }

    #[test]
    fn test_rejects_non_sequence_input() {
        assert!(matches!(
            normalize(&json!("nope"), today()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            normalize(&json!({"accounts": []}), today()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            normalize(&json!({"transactions": 3}), today()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_accepts_envelope() {
        let out = normalize(&json!({"transactions": [{"amount": 1}]}), today()).unwrap();
        assert_eq!(out.transactions.len(), 1);
    }

    #[test]
    fn test_cardinality_preserved_for_garbage_records() {
        let out = normalize(&json!([null, 3, "x", {}, []]), today()).unwrap();
        assert_eq!(out.transactions.len(), 5);
        assert_eq!(out.stats.non_object_records, 4);
        assert!(out.transactions.iter().all(|t| t.amount == Money::ZERO));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let (tx, stats) = one(json!({}));
        assert_eq!(tx.merchant, "unknown");
        assert_eq!(tx.category, "unknown");
        assert_eq!(tx.description, "—");
        assert_eq!(tx.account_id, "unknown_account");
        assert_eq!(tx.account_type, "unknown");
        assert_eq!(tx.kind, TransactionType::Unknown);
        assert_eq!(tx.date, Some(today()));
        assert_eq!(tx.direction, Direction::Income);
        assert!(tx.id.starts_with("gen-"));
        assert_eq!(stats.defaulted_amounts, 1);
        assert_eq!(stats.defaulted_dates, 1);
    }

    #[test]
    fn test_empty_strings_become_sentinels() {
        let (tx, _) = one(json!({"merchant": "  ", "category": ""}));
        assert_eq!(tx.merchant, "unknown");
        assert_eq!(tx.category, "unknown");
    }

    #[test]
    fn test_malformed_amount_is_zero() {
        let (tx, stats) = one(json!({"amount": "abc", "positive": false}));
        assert_eq!(tx.amount, Money::ZERO);
        assert_eq!(tx.direction, Direction::Expense);
        assert_eq!(stats.defaulted_amounts, 1);
        assert!(!tx.sign_conflict);
    }

    #[test]
    fn test_amount_coercion() {
        let (tx, _) = one(json!({"amount": "$1,234.56"}));
        assert_eq!(tx.amount, Money::from_cents(123456));
        assert_eq!(tx.direction, Direction::Income);

        let (tx, _) = one(json!({"amount": "(15.99)"}));
        assert_eq!(tx.amount, Money::from_cents(1599));
        assert_eq!(tx.direction, Direction::Expense);

        let (tx, _) = one(json!({"amount": -42.1}));
        assert_eq!(tx.amount, Money::from_cents(4210));
        assert_eq!(tx.direction, Direction::Expense);
    }

    #[test]
    fn test_out_of_range_amount_is_defaulted() {
        let out = normalize(
            &json!([
                {"merchant": "A", "amount": -9.0e16},
                {"merchant": "B", "amount_cents": i64::MIN},
                {"merchant": "C", "amount": -10_000_000_000.00}
            ]),
            today(),
        )
        .unwrap();
        assert_eq!(out.transactions[0].amount, Money::ZERO);
        assert_eq!(out.transactions[1].amount, Money::ZERO);
        assert!(out.transactions[0].is_expense());
        // exactly at the ceiling is still accepted
        assert_eq!(out.transactions[2].amount, MAX_AMOUNT);
        assert_eq!(out.stats.defaulted_amounts, 2);
    }

    #[test]
    fn test_amount_cents_takes_precedence() {
        let (tx, _) = one(json!({"amount_cents": -500, "amount": -99.0}));
        assert_eq!(tx.amount, Money::from_cents(500));
        assert_eq!(tx.direction, Direction::Expense);
    }

    #[test]
    fn test_sign_flag_wins_over_amount() {
        let (tx, stats) = one(json!({"amount": 25.0, "positive": false}));
        assert_eq!(tx.direction, Direction::Expense);
        assert_eq!(tx.amount, Money::from_cents(2500));
        assert!(tx.sign_conflict);
        assert_eq!(stats.sign_conflicts, 1);

        let (tx, _) = one(json!({"amount": -25.0, "positive": "true"}));
        assert_eq!(tx.direction, Direction::Income);
        assert!(tx.sign_conflict);
    }

    #[test]
    fn test_zero_amount_is_income() {
        let (tx, _) = one(json!({"amount": 0}));
        assert_eq!(tx.direction, Direction::Income);
    }

    #[test]
    fn test_field_aliases() {
        let (tx, _) = one(json!({
            "_id": "abc123",
            "account_id": "acct-1",
            "nickname": "Checking",
            "accountType": "Credit Card",
            "payee": "Netflix",
            "memo": "monthly plan",
            "transaction_date": "2024-05-02",
            "transaction_type": "purchase",
            "amount": -15.49
        }));
        assert_eq!(tx.id, "abc123");
        assert_eq!(tx.account_id, "acct-1");
        assert_eq!(tx.account_name, "Checking");
        assert_eq!(tx.account_type, "Credit Card");
        assert_eq!(tx.merchant, "Netflix");
        assert_eq!(tx.description, "monthly plan");
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(tx.kind, TransactionType::Purchase);
    }

    #[test]
    fn test_null_alias_falls_through() {
        let (tx, _) = one(json!({"date": null, "transaction_date": "2024-01-31"}));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[test]
    fn test_malformed_date_is_unknown() {
        let (tx, stats) = one(json!({"date": "last tuesday"}));
        assert_eq!(tx.date, None);
        assert_eq!(stats.unknown_dates, 1);
        assert_eq!(stats.defaulted_dates, 0);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("2024-01-15"), expected);
        assert_eq!(parse_date("01/15/2024"), expected);
        assert_eq!(parse_date("01/15/24"), expected);
        assert_eq!(parse_date("2024-01-15T08:30:00Z"), expected);
        assert_eq!(parse_date("2024-01-15T08:30:00.123"), expected);
        assert_eq!(parse_date("2024-01-15 08:30:00"), expected);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_epoch_millis_date() {
        // 2024-01-15T00:00:00Z
        let (tx, _) = one(json!({"date": 1705276800000i64}));
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_synthetic_id_is_stable() {
        let input = json!([{"description": "coffee", "amount": -3.5, "date": "2024-01-02"}]);
        let a = normalize(&input, today()).unwrap();
        let b = normalize(&input, today()).unwrap();
        assert_eq!(a.transactions[0].id, b.transactions[0].id);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-123.45"), Some(-123.45));
        assert_eq!(parse_amount("(100.00)"), Some(-100.00));
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
    }
}

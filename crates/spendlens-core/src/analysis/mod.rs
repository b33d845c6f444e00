//! Analytics over normalized transactions
//!
//! - [`aggregate`]: monthly time series, breakdowns, cash flow
//! - [`recurring`]: merchant + amount recurrence clusters
//! - [`savings`]: savings potential from small recurring clusters
//! - [`report`]: the serialized output contract
//! - [`engine`]: the [`Analyzer`] that wires them together
//!
//! Aggregation and recurrence are independent of each other; savings only
//! consumes recurrence output.

pub mod aggregate;
pub mod engine;
pub mod grouping;
pub mod recurring;
pub mod report;
pub mod savings;

pub use aggregate::{breakdown, cash_flow, monthly_series, BreakdownEntry, CashFlow, GroupBy, MonthBucket};
pub use engine::Analyzer;
pub use recurring::{detect_recurring, Cadence, RecurringCluster};
pub use report::{AnalysisReport, ExpenseInsights, TimeSeriesPoint};
pub use savings::{estimate_savings, SavingsEstimate, SavingsRecommendation};

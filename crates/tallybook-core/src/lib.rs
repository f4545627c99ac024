//! Ledger aggregation and recurring-balance projection engine
//!
//! The engine is a read-side projection over three heterogeneous
//! transaction sources (incomes, plain expenses, receipt line items):
//! it expands recurring transactions into calendar occurrences,
//! projects day-by-day running balances across a month, and folds
//! signed category breakdowns over monthly, yearly, trailing-12-month
//! and all-time windows. It never writes to storage and holds no state
//! between requests.

pub mod error;
pub mod models;
pub mod projection;
pub mod range;
pub mod recurrence;
pub mod reports;
pub mod rollup;
pub mod rounding;
pub mod service;
pub mod storage;
pub mod summary;

pub use error::{EngineError, EngineResult, ErrorCode, ErrorSeverity};
pub use models::{
    CategoryRef, Expense, Income, MonthlyBalance, Receipt, ReceiptItem, Recurrence,
    TransactionLike, UserId,
};
pub use projection::project_month;
pub use range::{month_bounds, resolve, year_bounds, RangeRequest, ResolvedRange};
pub use recurrence::occurrences_within;
pub use reports::{BreakdownSide, CategoryNet, CategorySummary, DailyBalance, RangeMeta};
pub use rollup::rollup_year;
pub use rounding::round2;
pub use service::ReportService;
pub use storage::{LedgerStore, MemoryStore, UserLedger};
pub use summary::{aggregate, fold_summaries};

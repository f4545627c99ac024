//! Derived report structures for API responses
//!
//! These are pure values recomputed on every request; nothing here is
//! persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::range::ResolvedRange;

/// Resolved range metadata returned with every summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeMeta {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count, for per-day averaging
    pub total_days: i64,
    /// Inclusive month count, for per-month averaging
    pub total_months: u32,
}

impl From<ResolvedRange> for RangeMeta {
    fn from(range: ResolvedRange) -> Self {
        Self {
            start_date: range.start,
            end_date: range.end,
            total_days: range.total_days(),
            total_months: range.total_months(),
        }
    }
}

/// One calendar day of a month's balance projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    /// Balance at the start of the day
    pub starting_balance: f64,
    /// Inflows realized on this day (magnitude)
    pub income: f64,
    /// Outflows realized on this day (magnitude)
    pub expenses: f64,
    /// Balance at the end of the day
    pub remaining_balance: f64,
}

/// One side (income or expense) of a period summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BreakdownSide {
    /// Magnitude of the side's total
    pub total: f64,
    /// Label to signed amount; insertion order carries no meaning
    pub breakdown: HashMap<String, f64>,
}

/// Combined income/expense accumulator for one label
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CategoryNet {
    /// Positive contributions under this label
    pub income: f64,
    /// Negative contributions under this label (sign preserved)
    pub expense: f64,
    /// income + expense
    pub net: f64,
}

/// Signed per-source and per-category summary over a resolved range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub range: RangeMeta,
    pub incomes: BreakdownSide,
    pub expenses: BreakdownSide,
    /// Per-label net accumulators across both sides
    pub category_totals: HashMap<String, CategoryNet>,
    /// incomes.total - expenses.total
    pub balance: f64,
}

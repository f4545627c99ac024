//! Range resolution for report computations
//!
//! Translates a requested mode into concrete inclusive
//! `[start, end]` calendar bounds. All-time discovers the earliest
//! transaction date across the three sources with three concurrent
//! storage reads joined before taking the minimum.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::UserId;
use crate::recurrence::days_in_month;
use crate::storage::LedgerStore;

/// A fully specified range request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RangeRequest {
    /// One calendar month
    Monthly { year: i32, month: u32 },
    /// One calendar year
    Yearly { year: i32 },
    /// Trailing window with explicit caller-supplied bounds
    Last12Months { start: NaiveDate, end: NaiveDate },
    /// Everything since the earliest recorded transaction
    AllTime,
}

/// Resolved inclusive `[start, end]` calendar bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ResolvedRange {
    /// Inclusive day count of the range
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Inclusive count of calendar months touched by the range
    pub fn total_months(&self) -> u32 {
        let months = (self.end.year() - self.start.year()) * 12 + self.end.month() as i32
            - self.start.month() as i32
            + 1;
        months.max(1) as u32
    }

    /// Whether a date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl std::fmt::Display for ResolvedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// First and last calendar day of a month
pub fn month_bounds(year: i32, month: u32) -> EngineResult<ResolvedRange> {
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::InvalidRange {
            message: format!("No such month: {}-{:02}", year, month),
        }
    })?;
    let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)).ok_or_else(
        || EngineError::InvalidRange {
            message: format!("No such month: {}-{:02}", year, month),
        },
    )?;
    Ok(ResolvedRange { start, end })
}

/// Jan 1 through Dec 31 of a year
pub fn year_bounds(year: i32) -> EngineResult<ResolvedRange> {
    let start =
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| EngineError::InvalidRange {
            message: format!("No such year: {}", year),
        })?;
    let end =
        NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| EngineError::InvalidRange {
            message: format!("No such year: {}", year),
        })?;
    Ok(ResolvedRange { start, end })
}

/// Resolve a range request to concrete bounds.
///
/// Only `AllTime` touches storage: three independent minimum-date reads,
/// one per source, joined before taking the overall minimum. When all
/// three sources are empty the range degenerates to a single instant at
/// "today" rather than failing.
pub async fn resolve(
    request: RangeRequest,
    store: &dyn LedgerStore,
    user: UserId,
) -> EngineResult<ResolvedRange> {
    match request {
        RangeRequest::Monthly { year, month } => month_bounds(year, month),
        RangeRequest::Yearly { year } => year_bounds(year),
        RangeRequest::Last12Months { start, end } => {
            if start > end {
                return Err(EngineError::InvalidRange {
                    message: format!("Start {} is after end {}", start, end),
                });
            }
            Ok(ResolvedRange { start, end })
        }
        RangeRequest::AllTime => {
            let today = Utc::now().date_naive();
            let (incomes, expenses, items) = tokio::join!(
                store.earliest_income_date(user),
                store.earliest_expense_date(user),
                store.earliest_receipt_item_date(user),
            );
            let minima = [incomes?, expenses?, items?];
            let start = minima.into_iter().flatten().min().unwrap_or(today);
            Ok(ResolvedRange { start, end: today })
        }
    }
}

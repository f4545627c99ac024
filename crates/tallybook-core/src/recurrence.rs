//! Occurrence expansion for recurring transactions
//!
//! Expansion is a pure function over its inputs: the same transaction
//! and window always produce the same occurrence dates, walking
//! strictly forward from the transaction's anchor date.

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{Recurrence, TransactionLike};

/// Expand a transaction into its occurrence dates within `[window_start, window_end]`.
///
/// Non-recurring transactions yield their own date when it falls inside
/// the window. Recurring transactions fire on the anchor date and then
/// every interval step, clamped to `recurrence_end` when set. A
/// `recurrence_end` earlier than the anchor date is malformed input and
/// yields an empty sequence (logged, never an error).
pub fn occurrences_within<T: TransactionLike>(
    txn: &T,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Vec<NaiveDate> {
    let anchor = txn.date();

    if let Some(end) = txn.recurrence_end() {
        if end < anchor {
            log::warn!(
                "recurrence_end {} precedes transaction date {}; skipping expansion",
                end,
                anchor
            );
            return Vec::new();
        }
    }

    if txn.recurrence() == Recurrence::None {
        if anchor >= window_start && anchor <= window_end {
            return vec![anchor];
        }
        return Vec::new();
    }

    let limit = match txn.recurrence_end() {
        Some(end) => end.min(window_end),
        None => window_end,
    };

    let mut occurrences = Vec::new();
    let mut step = 0u32;
    loop {
        let date = advance(anchor, txn.recurrence(), step);
        if date > limit {
            break;
        }
        if date >= window_start {
            occurrences.push(date);
        }
        // Forward-progress guard: a zero-length step would loop forever.
        let next = advance(anchor, txn.recurrence(), step + 1);
        if next <= date {
            break;
        }
        step += 1;
    }

    occurrences
}

/// The `steps`-th occurrence date counted from the anchor.
///
/// Month-based intervals re-derive each occurrence from the anchor so a
/// day-of-month of 31 survives short months instead of decaying to 28.
fn advance(anchor: NaiveDate, interval: Recurrence, steps: u32) -> NaiveDate {
    match interval {
        Recurrence::None => anchor,
        Recurrence::Daily => anchor + Duration::days(steps as i64),
        Recurrence::Weekly => anchor + Duration::weeks(steps as i64),
        Recurrence::Monthly => shift_months(anchor, steps as i32),
        Recurrence::Quarterly => shift_months(anchor, steps as i32 * 3),
        Recurrence::Yearly => shift_months(anchor, steps as i32 * 12),
    }
}

/// Shift a date by whole calendar months, clamping the day to the
/// target month's length.
pub(crate) fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    let day = date.day().min(days_in_month(year, month as u32));
    // year/month/day are in range after the loops above
    NaiveDate::from_ymd_opt(year, month as u32, day)
        .unwrap_or(date)
}

/// Number of days in a calendar month
pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

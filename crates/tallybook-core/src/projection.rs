//! Day-by-day running balance projection for one month
//!
//! The projection is inherently sequential: each day's starting balance
//! is the previous day's remaining balance, so the day loop runs in
//! strict ascending date order and is never parallelized.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::EngineResult;
use crate::models::{Expense, Income, ReceiptItem, TransactionLike};
use crate::range::month_bounds;
use crate::recurrence::occurrences_within;
use crate::reports::DailyBalance;
use crate::rounding::round2;

/// Per-day inflow/outflow buckets accumulated in full precision
struct DayBuckets {
    start: NaiveDate,
    income: Vec<f64>,
    expense: Vec<f64>,
}

impl DayBuckets {
    fn new(start: NaiveDate, days: usize) -> Self {
        Self {
            start,
            income: vec![0.0; days],
            expense: vec![0.0; days],
        }
    }

    /// Drop a transaction's occurrences into their day slots,
    /// classified by the sign of the stored amount.
    fn add<T: TransactionLike>(&mut self, txn: &T, window_end: NaiveDate) {
        for occurrence in occurrences_within(txn, self.start, window_end) {
            let idx = (occurrence - self.start).num_days() as usize;
            let amount = txn.amount();
            if amount >= 0.0 {
                self.income[idx] += amount;
            } else {
                self.expense[idx] += -amount;
            }
        }
    }
}

/// Project a month's daily balances from a starting balance.
///
/// Returns one `DailyBalance` per calendar day of the month in date
/// order, never empty for a valid month. Recurring incomes and expenses
/// are expanded into the month; receipt items land on their stored date
/// only.
pub fn project_month(
    year: i32,
    month: u32,
    starting_balance: f64,
    incomes: &[Income],
    expenses: &[Expense],
    receipt_items: &[ReceiptItem],
) -> EngineResult<Vec<DailyBalance>> {
    let window = month_bounds(year, month)?;
    let days = window.total_days() as usize;

    let mut buckets = DayBuckets::new(window.start, days);
    for income in incomes {
        buckets.add(income, window.end);
    }
    for expense in expenses {
        buckets.add(expense, window.end);
    }
    for item in receipt_items {
        buckets.add(item, window.end);
    }

    let mut running = round2(starting_balance);
    let mut projection = Vec::with_capacity(days);
    for (idx, (income, expense)) in buckets
        .income
        .iter()
        .zip(buckets.expense.iter())
        .enumerate()
    {
        let date = window.start + Duration::days(idx as i64);
        let daily_income = round2(*income);
        let daily_expense = round2(*expense);
        let start_of_day = running;
        running = round2(running + daily_income - daily_expense);
        projection.push(DailyBalance {
            date,
            starting_balance: start_of_day,
            income: daily_income,
            expenses: daily_expense,
            remaining_balance: running,
        });
    }

    debug_assert_eq!(projection.len(), days);
    debug_assert!(projection.first().map(|d| d.date.day()) == Some(1));
    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, Recurrence};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn income(amount: f64, date: NaiveDate, recurrence: Recurrence) -> Income {
        Income {
            id: 0,
            amount,
            date,
            source: "Salary".to_string(),
            recurrence,
            recurrence_end: None,
        }
    }

    fn expense(amount: f64, date: NaiveDate, recurrence: Recurrence) -> Expense {
        Expense {
            id: 0,
            amount,
            date,
            category: CategoryRef {
                id: 0,
                name: "Rent".to_string(),
            },
            recurrence,
            recurrence_end: None,
        }
    }

    fn item(amount: f64, date: NaiveDate) -> ReceiptItem {
        ReceiptItem {
            id: 0,
            total_price: amount,
            date,
            category: CategoryRef {
                id: 0,
                name: "Groceries".to_string(),
            },
        }
    }

    #[test]
    fn test_single_income_on_day_one_carries_through_month() {
        let incomes = vec![income(1000.0, ymd(2024, 4, 1), Recurrence::None)];
        let projection = project_month(2024, 4, 0.0, &incomes, &[], &[]).unwrap();

        assert_eq!(projection.len(), 30);
        assert_eq!(projection[0].income, 1000.0);
        assert_eq!(projection[0].remaining_balance, 1000.0);
        assert_eq!(projection[29].remaining_balance, 1000.0);
        assert_eq!(projection[29].income, 0.0);
    }

    #[test]
    fn test_projection_continuity() {
        let incomes = vec![
            income(1500.0, ymd(2024, 1, 1), Recurrence::None),
            income(25.0, ymd(2024, 1, 8), Recurrence::Weekly),
        ];
        let expenses = vec![expense(-40.0, ymd(2024, 1, 3), Recurrence::Daily)];
        let items = vec![item(-12.5, ymd(2024, 1, 15))];

        let projection = project_month(2024, 1, 100.0, &incomes, &expenses, &items).unwrap();

        assert_eq!(projection.len(), 31);
        for day in &projection {
            assert_eq!(
                round2(day.remaining_balance - day.income + day.expenses),
                day.starting_balance
            );
        }
        for pair in projection.windows(2) {
            assert_eq!(pair[1].starting_balance, pair[0].remaining_balance);
        }
    }

    #[test]
    fn test_recurring_expense_fires_within_month() {
        let expenses = vec![expense(-200.0, ymd(2024, 1, 5), Recurrence::Monthly)];
        let projection = project_month(2024, 3, 1000.0, &[], &expenses, &[]).unwrap();

        // Anchored in January, the monthly expense recurs into March.
        assert_eq!(projection[4].expenses, 200.0);
        assert_eq!(projection[4].remaining_balance, 800.0);
        assert_eq!(projection[30].remaining_balance, 800.0);
    }

    #[test]
    fn test_receipt_items_do_not_recur() {
        let items = vec![item(-50.0, ymd(2024, 2, 10))];
        let february = project_month(2024, 2, 0.0, &[], &[], &items).unwrap();
        assert_eq!(february[9].expenses, 50.0);

        let march = project_month(2024, 3, 0.0, &[], &[], &items).unwrap();
        assert!(march.iter().all(|d| d.expenses == 0.0));
    }

    #[test]
    fn test_positive_and_negative_amounts_split_by_sign() {
        // A signed-negative income row lands on the expense side.
        let incomes = vec![income(-75.0, ymd(2024, 5, 2), Recurrence::None)];
        let projection = project_month(2024, 5, 100.0, &incomes, &[], &[]).unwrap();
        assert_eq!(projection[1].income, 0.0);
        assert_eq!(projection[1].expenses, 75.0);
        assert_eq!(projection[1].remaining_balance, 25.0);
    }

    #[test]
    fn test_rounding_keeps_running_balance_stable() {
        let expenses: Vec<Expense> = (1..=10)
            .map(|d| expense(-0.1, ymd(2024, 6, d), Recurrence::None))
            .collect();
        let projection = project_month(2024, 6, 1.0, &[], &expenses, &[]).unwrap();
        assert_eq!(projection[9].remaining_balance, 0.0);
        assert_eq!(projection[29].remaining_balance, 0.0);
    }

    #[test]
    fn test_invalid_month_is_rejected() {
        assert!(project_month(2024, 13, 0.0, &[], &[], &[]).is_err());
        assert!(project_month(2024, 0, 0.0, &[], &[], &[]).is_err());
    }

    #[test]
    fn test_missing_balance_defaults_to_zero_upstream() {
        // Callers pass 0.0 when no starting balance exists for the month.
        let projection = project_month(2024, 7, 0.0, &[], &[], &[]).unwrap();
        assert_eq!(projection.len(), 31);
        assert!(projection.iter().all(|d| d.remaining_balance == 0.0));
    }
}

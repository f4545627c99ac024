//! Category aggregation over an arbitrary date range
//!
//! Aggregation operates on realized rows only: recurring expansion is
//! never applied here, so a summary can not double-count occurrences
//! the daily projection also produces. Classification is by sign of
//! the stored amount, not by which collection a row came from.

use std::collections::HashMap;

use crate::models::{Expense, Income, ReceiptItem, TransactionLike};
use crate::range::ResolvedRange;
use crate::reports::{BreakdownSide, CategoryNet, CategorySummary, RangeMeta};
use crate::rounding::round2;

/// Full-precision accumulator used during the single pass
#[derive(Default)]
struct Accumulator {
    income_by_label: HashMap<String, f64>,
    expense_by_label: HashMap<String, f64>,
    net_by_label: HashMap<String, (f64, f64)>,
    total_income: f64,
    total_expense: f64,
}

impl Accumulator {
    fn classify<T: TransactionLike>(&mut self, txn: &T, range: ResolvedRange) {
        if !range.contains(txn.date()) {
            return;
        }
        let amount = txn.amount();
        let label = txn.label();
        let net = self.net_by_label.entry(label.to_string()).or_default();
        if amount > 0.0 {
            *self.income_by_label.entry(label.to_string()).or_default() += amount;
            net.0 += amount;
            self.total_income += amount;
        } else if amount < 0.0 {
            // Stored sign preserved in the breakdown map.
            *self.expense_by_label.entry(label.to_string()).or_default() += amount;
            net.1 += amount;
            self.total_expense += amount;
        }
    }
}

/// Aggregate the three sources into a signed category summary.
///
/// Rows outside the range are skipped; empty inputs produce a summary
/// with zero totals and empty breakdown maps so callers can iterate
/// unconditionally.
pub fn aggregate(
    range: ResolvedRange,
    incomes: &[Income],
    expenses: &[Expense],
    receipt_items: &[ReceiptItem],
) -> CategorySummary {
    let mut acc = Accumulator::default();

    for income in incomes {
        acc.classify(income, range);
    }
    for expense in expenses {
        acc.classify(expense, range);
    }
    for item in receipt_items {
        acc.classify(item, range);
    }

    let category_totals = acc
        .net_by_label
        .into_iter()
        .map(|(label, (income, expense))| {
            (
                label,
                CategoryNet {
                    income: round2(income),
                    expense: round2(expense),
                    net: round2(income + expense),
                },
            )
        })
        .collect();

    CategorySummary {
        range: RangeMeta::from(range),
        incomes: BreakdownSide {
            total: round2(acc.total_income),
            breakdown: rounded(acc.income_by_label),
        },
        expenses: BreakdownSide {
            // Reported as a magnitude; the sign lives in the breakdown.
            total: round2(-acc.total_expense),
            breakdown: rounded(acc.expense_by_label),
        },
        category_totals,
        balance: round2(acc.total_income + acc.total_expense),
    }
}

/// Fold partial summaries into one over a wider range.
///
/// Folding is pointwise addition under matching labels, so it is
/// commutative and associative: partials may arrive in any order.
pub fn fold_summaries(
    range: ResolvedRange,
    parts: impl IntoIterator<Item = CategorySummary>,
) -> CategorySummary {
    let mut income_by_label: HashMap<String, f64> = HashMap::new();
    let mut expense_by_label: HashMap<String, f64> = HashMap::new();
    let mut net_by_label: HashMap<String, (f64, f64)> = HashMap::new();
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;

    for part in parts {
        total_income += part.incomes.total;
        total_expenses += part.expenses.total;
        for (label, amount) in part.incomes.breakdown {
            *income_by_label.entry(label).or_default() += amount;
        }
        for (label, amount) in part.expenses.breakdown {
            *expense_by_label.entry(label).or_default() += amount;
        }
        for (label, net) in part.category_totals {
            let entry = net_by_label.entry(label).or_default();
            entry.0 += net.income;
            entry.1 += net.expense;
        }
    }

    let category_totals = net_by_label
        .into_iter()
        .map(|(label, (income, expense))| {
            (
                label,
                CategoryNet {
                    income: round2(income),
                    expense: round2(expense),
                    net: round2(income + expense),
                },
            )
        })
        .collect();

    let total_income = round2(total_income);
    let total_expenses = round2(total_expenses);

    CategorySummary {
        range: RangeMeta::from(range),
        incomes: BreakdownSide {
            total: total_income,
            breakdown: rounded(income_by_label),
        },
        expenses: BreakdownSide {
            total: total_expenses,
            breakdown: rounded(expense_by_label),
        },
        category_totals,
        balance: round2(total_income - total_expenses),
    }
}

fn rounded(map: HashMap<String, f64>) -> HashMap<String, f64> {
    map.into_iter().map(|(k, v)| (k, round2(v))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryRef, Recurrence};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> ResolvedRange {
        ResolvedRange { start, end }
    }

    fn income(amount: f64, date: NaiveDate, source: &str) -> Income {
        Income {
            id: 0,
            amount,
            date,
            source: source.to_string(),
            recurrence: Recurrence::None,
            recurrence_end: None,
        }
    }

    fn expense(amount: f64, date: NaiveDate, category: &str) -> Expense {
        Expense {
            id: 0,
            amount,
            date,
            category: CategoryRef {
                id: 0,
                name: category.to_string(),
            },
            recurrence: Recurrence::None,
            recurrence_end: None,
        }
    }

    fn item(amount: f64, date: NaiveDate, category: &str) -> ReceiptItem {
        ReceiptItem {
            id: 0,
            total_price: amount,
            date,
            category: CategoryRef {
                id: 0,
                name: category.to_string(),
            },
        }
    }

    #[test]
    fn test_empty_inputs_yield_zeroed_summary() {
        let r = range(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let summary = aggregate(r, &[], &[], &[]);
        assert_eq!(summary.incomes.total, 0.0);
        assert_eq!(summary.expenses.total, 0.0);
        assert!(summary.incomes.breakdown.is_empty());
        assert!(summary.expenses.breakdown.is_empty());
        assert!(summary.category_totals.is_empty());
        assert_eq!(summary.balance, 0.0);
    }

    #[test]
    fn test_sign_classification_across_sources() {
        let r = range(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let incomes = vec![income(1000.0, ymd(2024, 1, 5), "Salary")];
        let expenses = vec![expense(-250.0, ymd(2024, 1, 10), "Rent")];
        let items = vec![
            item(-30.5, ymd(2024, 1, 12), "Groceries"),
            item(-19.5, ymd(2024, 1, 20), "Groceries"),
        ];

        let summary = aggregate(r, &incomes, &expenses, &items);

        assert_eq!(summary.incomes.total, 1000.0);
        assert_eq!(summary.incomes.breakdown["Salary"], 1000.0);
        assert_eq!(summary.expenses.total, 300.0);
        assert_eq!(summary.expenses.breakdown["Rent"], -250.0);
        assert_eq!(summary.expenses.breakdown["Groceries"], -50.0);
        assert_eq!(summary.balance, 700.0);

        let groceries = &summary.category_totals["Groceries"];
        assert_eq!(groceries.income, 0.0);
        assert_eq!(groceries.expense, -50.0);
        assert_eq!(groceries.net, -50.0);
    }

    #[test]
    fn test_positive_expense_counts_as_income_side() {
        // A refund stored as a positive expense row lands on the income
        // side under its category label.
        let r = range(ymd(2024, 3, 1), ymd(2024, 3, 31));
        let expenses = vec![expense(40.0, ymd(2024, 3, 15), "Electronics")];
        let summary = aggregate(r, &[], &expenses, &[]);
        assert_eq!(summary.incomes.total, 40.0);
        assert_eq!(summary.incomes.breakdown["Electronics"], 40.0);
        assert_eq!(summary.expenses.total, 0.0);
        assert_eq!(summary.balance, 40.0);
    }

    #[test]
    fn test_rows_outside_range_are_skipped() {
        let r = range(ymd(2024, 2, 1), ymd(2024, 2, 29));
        let incomes = vec![
            income(100.0, ymd(2024, 1, 31), "Salary"),
            income(200.0, ymd(2024, 2, 1), "Salary"),
            income(300.0, ymd(2024, 3, 1), "Salary"),
        ];
        let summary = aggregate(r, &incomes, &[], &[]);
        assert_eq!(summary.incomes.total, 200.0);
    }

    #[test]
    fn test_recurring_rows_count_once() {
        // Aggregation never expands recurrence; the realized row counts
        // once under its stored date.
        let r = range(ymd(2024, 1, 1), ymd(2024, 12, 31));
        let mut rent = expense(-500.0, ymd(2024, 1, 3), "Rent");
        rent.recurrence = Recurrence::Monthly;
        let summary = aggregate(r, &[], &[rent], &[]);
        assert_eq!(summary.expenses.total, 500.0);
    }

    #[test]
    fn test_sign_conservation() {
        let r = range(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let incomes = vec![income(123.45, ymd(2024, 1, 2), "Salary")];
        let expenses = vec![expense(-67.89, ymd(2024, 1, 3), "Food")];
        let summary = aggregate(r, &incomes, &expenses, &[]);
        assert!(summary.incomes.total >= 0.0);
        assert!(summary.expenses.total >= 0.0);
        assert_eq!(
            summary.balance,
            round2(summary.incomes.total - summary.expenses.total)
        );
    }

    #[test]
    fn test_aggregation_additivity_over_split_range() {
        let incomes = vec![
            income(100.0, ymd(2024, 1, 10), "Salary"),
            income(250.0, ymd(2024, 2, 10), "Bonus"),
        ];
        let expenses = vec![
            expense(-75.0, ymd(2024, 1, 20), "Food"),
            expense(-125.0, ymd(2024, 2, 20), "Food"),
        ];
        let items = vec![item(-10.0, ymd(2024, 2, 5), "Snacks")];

        let whole = aggregate(
            range(ymd(2024, 1, 1), ymd(2024, 2, 29)),
            &incomes,
            &expenses,
            &items,
        );
        let left = aggregate(
            range(ymd(2024, 1, 1), ymd(2024, 1, 31)),
            &incomes,
            &expenses,
            &items,
        );
        let right = aggregate(
            range(ymd(2024, 2, 1), ymd(2024, 2, 29)),
            &incomes,
            &expenses,
            &items,
        );

        let folded = fold_summaries(
            ResolvedRange {
                start: ymd(2024, 1, 1),
                end: ymd(2024, 2, 29),
            },
            [left, right],
        );

        assert_eq!(folded.incomes.total, whole.incomes.total);
        assert_eq!(folded.expenses.total, whole.expenses.total);
        assert_eq!(folded.balance, whole.balance);
        assert_eq!(folded.incomes.breakdown, whole.incomes.breakdown);
        assert_eq!(folded.expenses.breakdown, whole.expenses.breakdown);
        assert_eq!(folded.category_totals, whole.category_totals);
    }

    #[test]
    fn test_fold_is_order_insensitive() {
        let a = aggregate(
            range(ymd(2024, 1, 1), ymd(2024, 1, 31)),
            &[income(10.0, ymd(2024, 1, 5), "A")],
            &[],
            &[],
        );
        let b = aggregate(
            range(ymd(2024, 2, 1), ymd(2024, 2, 29)),
            &[income(20.0, ymd(2024, 2, 5), "B")],
            &[],
            &[],
        );
        let r = ResolvedRange {
            start: ymd(2024, 1, 1),
            end: ymd(2024, 2, 29),
        };
        let ab = fold_summaries(r, [a.clone(), b.clone()]);
        let ba = fold_summaries(r, [b, a]);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_totals_are_rounded() {
        let r = range(ymd(2024, 1, 1), ymd(2024, 1, 31));
        let incomes = vec![
            income(0.1, ymd(2024, 1, 1), "A"),
            income(0.2, ymd(2024, 1, 2), "A"),
        ];
        let summary = aggregate(r, &incomes, &[], &[]);
        assert_eq!(summary.incomes.total, 0.3);
        assert_eq!(summary.incomes.breakdown["A"], 0.3);
        assert_eq!(summary.balance, 0.3);
    }
}

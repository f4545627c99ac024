//! Storage collaborator interface and in-memory implementation
//!
//! The engine only reads: three list operations scoped by user and
//! range, one balance lookup, and three minimum-date lookups used by
//! all-time range resolution. Every method takes the user scope
//! explicitly; nothing is resolved from ambient context.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{Expense, Income, MonthlyBalance, Receipt, ReceiptItem, TransactionLike, UserId};
use crate::range::ResolvedRange;

/// Read-only storage contract consumed by the engine.
///
/// List operations return every row OVERLAPPING the range: a
/// non-recurring row overlaps when its date falls inside the range; a
/// recurring row overlaps when it anchors on or before the range end
/// and its recurrence end (if any) is not before the range start.
/// Components that operate on realized rows only re-filter by date.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn list_incomes(&self, user: UserId, range: ResolvedRange)
        -> EngineResult<Vec<Income>>;

    async fn list_expenses(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<Vec<Expense>>;

    async fn list_receipt_items(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<Vec<ReceiptItem>>;

    /// Starting balance for a (month, year), if one has been seeded
    async fn get_balance(
        &self,
        user: UserId,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<MonthlyBalance>>;

    async fn earliest_income_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>>;

    async fn earliest_expense_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>>;

    async fn earliest_receipt_item_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>>;
}

/// Whether a transaction can contribute anything to a window
fn overlaps_window<T: TransactionLike>(txn: &T, range: ResolvedRange) -> bool {
    if txn.recurrence() == crate::models::Recurrence::None {
        return range.contains(txn.date());
    }
    if txn.date() > range.end {
        return false;
    }
    match txn.recurrence_end() {
        Some(end) => end >= range.start,
        None => true,
    }
}

/// One user's persisted ledger rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserLedger {
    pub user: i64,
    #[serde(default)]
    pub incomes: Vec<Income>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    #[serde(default)]
    pub balances: Vec<MonthlyBalance>,
}

/// On-disk data file shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(default)]
    users: Vec<UserLedger>,
}

fn check_recurrence_bounds(
    kind: &str,
    id: i64,
    date: NaiveDate,
    end: Option<NaiveDate>,
) -> EngineResult<()> {
    if let Some(end) = end {
        if end < date {
            return Err(EngineError::RecurrenceConfig {
                id: format!("{}:{}", kind, id),
                message: format!("recurrence_end {} precedes date {}", end, date),
            });
        }
    }
    Ok(())
}

/// Reject a ledger carrying a recurrence end earlier than its anchor
/// date before it reaches the expander.
fn validate_ledger(ledger: &UserLedger) -> EngineResult<()> {
    for income in &ledger.incomes {
        check_recurrence_bounds("income", income.id, income.date, income.recurrence_end)?;
    }
    for expense in &ledger.expenses {
        check_recurrence_bounds("expense", expense.id, expense.date, expense.recurrence_end)?;
    }
    Ok(())
}

/// In-memory ledger store, loadable from a JSON data file
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<UserId, UserLedger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load user ledgers from a JSON data file, replacing any existing
    /// data for the users it names. Returns the number of user ledgers
    /// loaded.
    pub async fn load_file(&self, path: &Path) -> EngineResult<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::upstream("memory_store", path.display(), e)
        })?;
        self.load_str(&content).await
    }

    /// Load user ledgers from JSON data file content
    pub async fn load_str(&self, content: &str) -> EngineResult<usize> {
        let file: DataFile = serde_json::from_str(content).map_err(|e| {
            EngineError::upstream("memory_store", "data file", e)
        })?;
        for ledger in &file.users {
            validate_ledger(ledger)?;
        }

        let count = file.users.len();
        let mut data = self.data.write().await;
        for ledger in file.users {
            data.insert(UserId(ledger.user), ledger);
        }
        Ok(count)
    }

    /// Replace one user's ledger wholesale
    pub async fn insert_user(&self, ledger: UserLedger) {
        let mut data = self.data.write().await;
        data.insert(UserId(ledger.user), ledger);
    }

    pub async fn add_income(&self, user: UserId, income: Income) {
        let mut data = self.data.write().await;
        data.entry(user)
            .or_insert_with(|| UserLedger {
                user: user.0,
                ..UserLedger::default()
            })
            .incomes
            .push(income);
    }

    pub async fn add_expense(&self, user: UserId, expense: Expense) {
        let mut data = self.data.write().await;
        data.entry(user)
            .or_insert_with(|| UserLedger {
                user: user.0,
                ..UserLedger::default()
            })
            .expenses
            .push(expense);
    }

    pub async fn add_receipt_item(&self, user: UserId, item: ReceiptItem) {
        let mut data = self.data.write().await;
        let ledger = data.entry(user).or_insert_with(|| UserLedger {
            user: user.0,
            ..UserLedger::default()
        });
        // Standalone items ride on a synthetic receipt.
        let date = item.date;
        match ledger.receipts.first_mut() {
            Some(receipt) => receipt.items.push(item),
            None => ledger.receipts.push(Receipt {
                id: 0,
                store: String::new(),
                date,
                items: vec![item],
            }),
        }
    }

    pub async fn set_balance(&self, user: UserId, balance: MonthlyBalance) {
        let mut data = self.data.write().await;
        let ledger = data.entry(user).or_insert_with(|| UserLedger {
            user: user.0,
            ..UserLedger::default()
        });
        ledger
            .balances
            .retain(|b| !(b.month == balance.month && b.year == balance.year));
        ledger.balances.push(balance);
    }

    async fn with_user<R>(&self, user: UserId, f: impl FnOnce(&UserLedger) -> R) -> R
    where
        R: Default,
    {
        let data = self.data.read().await;
        data.get(&user).map(f).unwrap_or_default()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_incomes(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<Vec<Income>> {
        Ok(self.with_user(user, |ledger| {
            ledger
                .incomes
                .iter()
                .filter(|i| overlaps_window(*i, range))
                .cloned()
                .collect()
        })
        .await)
    }

    async fn list_expenses(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<Vec<Expense>> {
        Ok(self.with_user(user, |ledger| {
            ledger
                .expenses
                .iter()
                .filter(|e| overlaps_window(*e, range))
                .cloned()
                .collect()
        })
        .await)
    }

    async fn list_receipt_items(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<Vec<ReceiptItem>> {
        Ok(self.with_user(user, |ledger| {
            ledger
                .receipts
                .iter()
                .flat_map(|r| r.items.iter())
                .filter(|i| range.contains(i.date))
                .cloned()
                .collect()
        })
        .await)
    }

    async fn get_balance(
        &self,
        user: UserId,
        year: i32,
        month: u32,
    ) -> EngineResult<Option<MonthlyBalance>> {
        Ok(self.with_user(user, |ledger| {
            ledger
                .balances
                .iter()
                .find(|b| b.year == year && b.month == month)
                .copied()
        })
        .await)
    }

    async fn earliest_income_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>> {
        Ok(self
            .with_user(user, |ledger| ledger.incomes.iter().map(|i| i.date).min())
            .await)
    }

    async fn earliest_expense_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>> {
        Ok(self
            .with_user(user, |ledger| ledger.expenses.iter().map(|e| e.date).min())
            .await)
    }

    async fn earliest_receipt_item_date(&self, user: UserId) -> EngineResult<Option<NaiveDate>> {
        Ok(self.with_user(user, |ledger| {
            ledger
                .receipts
                .iter()
                .flat_map(|r| r.items.iter())
                .map(|i| i.date)
                .min()
        })
        .await)
    }
}

//! Report service facade consumed by the HTTP layer
//!
//! Stateless between requests: every call resolves its range, reads
//! from storage, and computes a fresh derived value.

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::UserId;
use crate::projection::project_month;
use crate::range::{month_bounds, resolve, RangeRequest, ResolvedRange};
use crate::reports::{CategorySummary, DailyBalance};
use crate::rollup::rollup_year;
use crate::storage::LedgerStore;
use crate::summary::aggregate;

/// Facade wiring storage reads into the projection and aggregation
/// components
pub struct ReportService {
    store: Arc<dyn LedgerStore>,
    max_concurrent_months: usize,
}

impl ReportService {
    pub fn new(store: Arc<dyn LedgerStore>, max_concurrent_months: usize) -> Self {
        Self {
            store,
            max_concurrent_months,
        }
    }

    /// Project one calendar month of daily balances for a user.
    ///
    /// A month without a seeded starting balance projects from zero;
    /// balance initialization is an upstream concern.
    pub async fn daily_balance(
        &self,
        user: UserId,
        year: i32,
        month: u32,
    ) -> EngineResult<Vec<DailyBalance>> {
        let range = month_bounds(year, month)?;

        let incomes = self.store.list_incomes(user, range).await?;
        let expenses = self.store.list_expenses(user, range).await?;
        let items = self.store.list_receipt_items(user, range).await?;

        let starting_balance = match self.store.get_balance(user, year, month).await? {
            Some(balance) => balance.starting_balance,
            None => {
                log::warn!(
                    "No starting balance for {} {}-{:02}; projecting from 0",
                    user,
                    year,
                    month
                );
                0.0
            }
        };

        project_month(year, month, starting_balance, &incomes, &expenses, &items)
    }

    /// Compute a category summary for a requested range.
    ///
    /// Yearly requests fan out across the twelve months; every other
    /// mode aggregates its resolved range in a single pass.
    pub async fn category_summary(
        &self,
        user: UserId,
        request: RangeRequest,
    ) -> EngineResult<CategorySummary> {
        if let RangeRequest::Yearly { year } = request {
            return rollup_year(
                Arc::clone(&self.store),
                user,
                year,
                self.max_concurrent_months,
            )
            .await;
        }

        let range = resolve(request, self.store.as_ref(), user).await?;
        self.summarize_range(user, range).await
    }

    async fn summarize_range(
        &self,
        user: UserId,
        range: ResolvedRange,
    ) -> EngineResult<CategorySummary> {
        let incomes = self.store.list_incomes(user, range).await?;
        let expenses = self.store.list_expenses(user, range).await?;
        let items = self.store.list_receipt_items(user, range).await?;
        Ok(aggregate(range, &incomes, &expenses, &items))
    }
}

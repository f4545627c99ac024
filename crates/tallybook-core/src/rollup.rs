//! Yearly rollup: scatter/gather over twelve month aggregations
//!
//! The twelve per-month aggregations are independent and run
//! concurrently behind a semaphore so a yearly report can not flood
//! the storage layer; partial summaries are folded after all twelve
//! complete, in whatever order they finish.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{EngineError, EngineResult};
use crate::models::UserId;
use crate::range::{month_bounds, year_bounds};
use crate::reports::CategorySummary;
use crate::storage::LedgerStore;
use crate::summary::{aggregate, fold_summaries};

/// Aggregate one calendar month from storage
async fn month_summary(
    store: Arc<dyn LedgerStore>,
    user: UserId,
    year: i32,
    month: u32,
) -> EngineResult<CategorySummary> {
    let range = month_bounds(year, month)?;
    let incomes = store.list_incomes(user, range).await?;
    let expenses = store.list_expenses(user, range).await?;
    let items = store.list_receipt_items(user, range).await?;
    Ok(aggregate(range, &incomes, &expenses, &items))
}

/// Aggregate a calendar year as the fold of its twelve months.
///
/// `max_concurrent` bounds the number of month aggregations in flight
/// at once; it must be at least 1.
pub async fn rollup_year(
    store: Arc<dyn LedgerStore>,
    user: UserId,
    year: i32,
    max_concurrent: usize,
) -> EngineResult<CategorySummary> {
    let year_range = year_bounds(year)?;
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));

    let mut tasks: JoinSet<EngineResult<CategorySummary>> = JoinSet::new();
    for month in 1..=12u32 {
        let store = Arc::clone(&store);
        let semaphore = Arc::clone(&semaphore);
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.map_err(|e| {
                EngineError::InternalError {
                    message: format!("month fan-out semaphore closed: {}", e),
                }
            })?;
            month_summary(store, user, year, month).await
        });
    }

    let mut parts = Vec::with_capacity(12);
    while let Some(joined) = tasks.join_next().await {
        let summary = joined.map_err(|e| EngineError::InternalError {
            message: format!("month aggregation task failed: {}", e),
        })??;
        parts.push(summary);
    }

    log::debug!("Folded {} month summaries for {} year {}", parts.len(), user, year);
    Ok(fold_summaries(year_range, parts))
}

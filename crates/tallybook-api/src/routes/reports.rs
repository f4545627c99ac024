//! Report API endpoints - JSON responses over the report engine

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tallybook_config::RangeMode;
use tallybook_core::{round2, CategorySummary, DailyBalance, RangeRequest, UserId};

use crate::error::ApiError;
use crate::AppState;

/// Query parameters for the daily balance projection
#[derive(Debug, Deserialize)]
pub struct DailyBalanceParams {
    pub user: Option<i64>,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Daily balance response for one month
#[derive(Debug, Serialize)]
pub struct DailyBalanceResponse {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DailyBalance>,
}

/// Query parameters for the category summary
#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub user: Option<i64>,
    pub mode: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Per-day and per-month averages derived from the summary totals
#[derive(Debug, Serialize)]
pub struct SummaryAverages {
    pub income_per_day: f64,
    pub expenses_per_day: f64,
    pub income_per_month: f64,
    pub expenses_per_month: f64,
}

/// Category summary response with resolved range metadata
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub mode: String,
    #[serde(flatten)]
    pub summary: CategorySummary,
    pub averages: SummaryAverages,
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::BadRequest {
        message: format!("Missing required parameter: {}", name),
    })
}

/// GET /api/reports/daily-balance
pub async fn api_daily_balance(
    State(state): State<AppState>,
    Query(params): Query<DailyBalanceParams>,
) -> Result<Json<DailyBalanceResponse>, ApiError> {
    let user = UserId(required(params.user, "user")?);
    let year = required(params.year, "year")?;
    let month = required(params.month, "month")?;

    let days = state.service.daily_balance(user, year, month).await?;
    Ok(Json(DailyBalanceResponse { year, month, days }))
}

/// GET /api/reports/summary
pub async fn api_summary_report(
    State(state): State<AppState>,
    Query(params): Query<SummaryParams>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let user = UserId(required(params.user, "user")?);
    let mode = match &params.mode {
        Some(raw) => RangeMode::from_str(raw).map_err(|e| ApiError::BadRequest { message: e })?,
        None => state.config.reports.default_range,
    };

    let request = match mode {
        RangeMode::Monthly => RangeRequest::Monthly {
            year: required(params.year, "year")?,
            month: required(params.month, "month")?,
        },
        RangeMode::Yearly => RangeRequest::Yearly {
            year: required(params.year, "year")?,
        },
        RangeMode::Last12Months => RangeRequest::Last12Months {
            start: required(params.start_date, "start_date")?,
            end: required(params.end_date, "end_date")?,
        },
        RangeMode::AllTime => RangeRequest::AllTime,
    };

    let summary = state.service.category_summary(user, request).await?;
    let averages = compute_averages(&summary);

    Ok(Json(SummaryResponse {
        mode: mode.to_string(),
        summary,
        averages,
    }))
}

fn compute_averages(summary: &CategorySummary) -> SummaryAverages {
    let days = summary.range.total_days.max(1) as f64;
    let months = summary.range.total_months.max(1) as f64;
    SummaryAverages {
        income_per_day: round2(summary.incomes.total / days),
        expenses_per_day: round2(summary.expenses.total / days),
        income_per_month: round2(summary.incomes.total / months),
        expenses_per_month: round2(summary.expenses.total / months),
    }
}

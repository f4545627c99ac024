//! HTTP surface for tallybook report endpoints
//!
//! Exposes the report engine over a small JSON API backed by axum.
//! All routes are read-only; mutations happen through the ledger data
//! file loaded at startup.

pub mod error;
pub mod routes;

use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tallybook_config::Config;
use tallybook_core::ReportService;
use tower_http::cors::CorsLayer;

use routes::reports::{api_daily_balance, api_summary_report};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ReportService>,
    pub config: Config,
}

/// Build the application router with all API routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/reports/daily-balance", get(api_daily_balance))
        .route("/api/reports/summary", get(api_summary_report))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Bind the configured address and serve the API until shutdown
pub async fn start_server(config: Config, service: ReportService) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        service: Arc::new(service),
        config,
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    log::info!("  GET /api/health");
    log::info!("  GET /api/reports/daily-balance?user=&year=&month=");
    log::info!("  GET /api/reports/summary?user=&mode=&year=&month=&start_date=&end_date=");

    axum::serve(listener, app).await?;
    Ok(())
}

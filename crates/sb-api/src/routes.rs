//! Route definitions
//!
//! Defines all HTTP API endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{
    ask, create_workbook, download_workbook, health, index, mcp, tools, upload_workbook,
};
use crate::server::AppState;

/// Create the API router
pub fn routes() -> Router<AppState> {
    Router::new()
        // Companion page
        .route("/", get(index))
        // Health check
        .route("/health", get(health))
        // Tool dispatch
        .route("/mcp", post(mcp))
        .route("/ask", post(ask))
        .route("/tools", get(tools))
        // Workbook file
        .route(
            "/workbook",
            post(create_workbook)
                .get(download_workbook)
                .put(upload_workbook),
        )
}

//! sb-api: HTTP API for SheetBridge
//!
//! Exposes tool dispatch (`/mcp`), prompt relay (`/ask`), workbook file
//! transfer and the companion page. Built with axum.

pub mod error;
pub mod handlers;
mod page;
pub mod routes;
pub mod server;

pub use error::{ApiError, Result};
pub use server::{build_router, start_server, AppState};

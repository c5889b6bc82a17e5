//! Error types for sb-core

use thiserror::Error;

/// Main error type for sb-core
#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Tool-call arguments are not a mapping, or do not fit the tool's parameters
    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("No tool found for {0}")]
    ToolNotFound(String),

    #[error("Workbook not found: {0}")]
    WorkbookNotFound(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid cell reference: {0}")]
    InvalidCell(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for sb-core
pub type Result<T> = std::result::Result<T, Error>;

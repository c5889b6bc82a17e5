//! エラー型定義 (sb-api)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// sb-api のエラー型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Core(#[from] sb_core::Error),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        use sb_core::Error as Core;

        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Core(e) => match e {
                Core::InvalidArguments(_) | Core::InvalidCell(_) => StatusCode::BAD_REQUEST,
                Core::ToolNotFound(_) | Core::SheetNotFound(_) | Core::WorkbookNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                Core::LlmApi(_) | Core::Http(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status, "Request failed: {}", self);
        } else {
            tracing::debug!(status = %status, "Request rejected: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (sb_core::Error::InvalidArguments("x".into()), StatusCode::BAD_REQUEST),
            (sb_core::Error::InvalidCell("x".into()), StatusCode::BAD_REQUEST),
            (sb_core::Error::ToolNotFound("x".into()), StatusCode::NOT_FOUND),
            (sb_core::Error::SheetNotFound("x".into()), StatusCode::NOT_FOUND),
            (sb_core::Error::WorkbookNotFound("x".into()), StatusCode::NOT_FOUND),
            (sb_core::Error::LlmApi("x".into()), StatusCode::BAD_GATEWAY),
            (sb_core::Error::Spreadsheet("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(
            ApiError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_message_passes_through() {
        let err = ApiError::from(sb_core::Error::ToolNotFound("nope".into()));
        assert_eq!(err.to_string(), "No tool found for nope");
    }
}

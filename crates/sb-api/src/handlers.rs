//! HTTP API handlers
//!
//! Request handlers for tool dispatch, prompt relay and workbook transfer.

use std::path::Path;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use sb_core::{AskOutcome, ToolCallEnvelope, ToolDefinition, ToolOutput};
use sb_tools::workbook;

use crate::error::{ApiError, Result};
use crate::page::INDEX_HTML;
use crate::server::AppState;

/// Content type of `.xlsx` downloads
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name offered for workbook downloads
pub const DOWNLOAD_FILENAME: &str = "updated_excel.xlsx";

// ============================================================================
// Request/Response types
// ============================================================================

/// Prompt request payload
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Prompt response payload
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AskResponse {
    /// One result per model tool call, in order
    Results { results: Vec<ToolOutput> },
    /// The model did not request any tool
    NoToolCalls { error: String },
}

// ============================================================================
// Handler functions
// ============================================================================

/// Companion page
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Tool declarations as sent to the model
pub async fn tools(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.registry.definitions())
}

/// Dispatch a tool-call envelope and return the tool's result as-is
pub async fn mcp(
    State(state): State<AppState>,
    Json(envelope): Json<ToolCallEnvelope>,
) -> Result<Json<ToolOutput>> {
    debug!("MCP request: {:?}", envelope);
    let output = state.registry.acall(&envelope).await?;
    Ok(Json(output))
}

/// Relay a prompt to the model and run the tool calls it asks for
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let prompt = req
        .prompt
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidRequest("prompt is required".to_string()))?;

    info!(len = prompt.len(), "Ask request");

    let response = match state.bridge.ask(&prompt).await? {
        AskOutcome::Results(results) => AskResponse::Results { results },
        AskOutcome::NoToolCalls { text } => {
            debug!(text = ?text, "Model answered without tool calls");
            AskResponse::NoToolCalls {
                error: "No MCP tool call detected from model.".to_string(),
            }
        }
    };

    Ok(Json(response))
}

/// Create a blank workbook at the default path, replacing any existing file
pub async fn create_workbook(State(state): State<AppState>) -> Result<Json<ToolOutput>> {
    let path = state.workbook_path().to_string();
    let target = path.clone();
    workbook::run_blocking(move || workbook::create_blank_workbook(Path::new(&target))).await?;

    info!(path = %path, "Blank workbook created");
    Ok(Json(ToolOutput::message(format!(
        "Blank workbook created at '{}'.",
        path
    ))))
}

/// Download the current workbook
pub async fn download_workbook(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let path = state.workbook_path();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(sb_core::Error::WorkbookNotFound(path.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = format!("attachment; filename=\"{}\"", DOWNLOAD_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// Replace the default workbook with the uploaded bytes
pub async fn upload_workbook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ToolOutput>> {
    if body.is_empty() {
        return Err(ApiError::InvalidRequest("workbook body is empty".to_string()));
    }

    let path = state.workbook_path();
    tokio::fs::write(path, &body).await?;

    info!(path = %path, bytes = body.len(), "Workbook uploaded");
    Ok(Json(ToolOutput::message(format!(
        "Workbook saved to '{}'.",
        path
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use sb_core::{Config, ToolRegistry};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app(llm_base_url: &str, workbook_path: &Path) -> Router {
        let mut config = Config::default();
        config.llm.api_key = "test-key".to_string();
        config.llm.base_url = llm_base_url.to_string();
        config.workbook.default_path = workbook_path.to_string_lossy().into_owned();

        let mut registry = ToolRegistry::new();
        sb_tools::register_default_tools(&mut registry);

        build_router(AppState::new(config, registry).unwrap())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn envelope(name: &str, arguments: Value) -> Value {
        json!({"tool_calls": [{"function": {"name": name, "arguments": arguments}}]})
    }

    fn completion(tool_calls: Value) -> Value {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "created": 1,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null, "tool_calls": tool_calls},
                "finish_reason": "tool_calls"
            }]
        })
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = app("http://127.0.0.1:9", &dir.path().join("book.xlsx"));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_index_page() {
        let dir = TempDir::new().unwrap();
        let app = app("http://127.0.0.1:9", &dir.path().join("book.xlsx"));

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/ask"));
    }

    #[tokio::test]
    async fn test_tools_lists_declarations() {
        let dir = TempDir::new().unwrap();
        let app = app("http://127.0.0.1:9", &dir.path().join("book.xlsx"));

        let (status, body) = send(app, Request::get("/tools").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);

        let tools = body.as_array().unwrap();
        assert_eq!(tools.len(), 7);
        assert_eq!(tools[0]["type"], "function");
        assert_eq!(tools[0]["function"]["name"], "list_sheets");
    }

    #[tokio::test]
    async fn test_mcp_create_sheet_then_list() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book.xlsx");
        let filepath = book.to_string_lossy().into_owned();

        let (status, body) = send(
            app("http://127.0.0.1:9", &book),
            post_json(
                "/mcp",
                envelope("create_sheet", json!({"filepath": filepath, "sheet_name": "Finance"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"message": format!("Sheet 'Finance' created in '{}'.", filepath)})
        );

        let (status, body) = send(
            app("http://127.0.0.1:9", &book),
            post_json(
                "/mcp",
                envelope("list_sheets", json!(json!({"filepath": filepath}).to_string())),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"sheets": ["Finance"]}));
    }

    #[tokio::test]
    async fn test_mcp_structured_error_is_ok() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book.xlsx");
        let filepath = book.to_string_lossy().into_owned();
        workbook::create_blank_workbook(&book).unwrap();

        let (status, body) = send(
            app("http://127.0.0.1:9", &book),
            post_json(
                "/mcp",
                envelope("delete_sheet", json!({"filepath": filepath, "sheet_name": "Nope"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "Sheet 'Nope' not found."}));
    }

    #[tokio::test]
    async fn test_mcp_unknown_tool() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app("http://127.0.0.1:9", &dir.path().join("book.xlsx")),
            post_json("/mcp", envelope("format_disk", json!({}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "No tool found for format_disk"}));
    }

    #[tokio::test]
    async fn test_mcp_non_mapping_arguments() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app("http://127.0.0.1:9", &dir.path().join("book.xlsx")),
            post_json("/mcp", envelope("list_sheets", json!("not json"))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("must be an object"));
    }

    #[tokio::test]
    async fn test_mcp_missing_workbook() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("missing.xlsx");
        let filepath = book.to_string_lossy().into_owned();

        let (status, _) = send(
            app("http://127.0.0.1:9", &book),
            post_json("/mcp", envelope("list_sheets", json!({"filepath": filepath}))),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_ask_requires_prompt() {
        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app("http://127.0.0.1:9", &dir.path().join("book.xlsx")),
            post_json("/ask", json!({"prompt": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "prompt is required"}));
    }

    #[tokio::test]
    async fn test_ask_runs_every_tool_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!([
                {
                    "id": "call_1",
                    "type": "function",
                    "function": {
                        "name": "create_sheet",
                        "arguments": "{\"sheet_name\": \"Finance\"}"
                    }
                },
                {
                    "id": "call_2",
                    "type": "function",
                    "function": {
                        "name": "write_cell",
                        "arguments": "{\"sheet_name\": \"Finance\", \"cell\": \"A1\", \"value\": \"Revenue\"}"
                    }
                }
            ]))))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book.xlsx");
        let filepath = book.to_string_lossy().into_owned();

        let (status, body) = send(
            app(&server.uri(), &book),
            post_json("/ask", json!({"prompt": "Create Finance and put Revenue in A1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"results": [
                {"message": format!("Sheet 'Finance' created in '{}'.", filepath)},
                {"message": "Value 'Revenue' written to Finance:A1"}
            ]})
        );

        let (_, body) = send(
            app(&server.uri(), &book),
            post_json(
                "/mcp",
                envelope(
                    "read_cell",
                    json!({"filepath": filepath, "sheet_name": "Finance", "cell": "A1"}),
                ),
            ),
        )
        .await;
        assert_eq!(body, json!({"value": "Revenue"}));
    }

    #[tokio::test]
    async fn test_ask_without_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(Value::Null)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&server.uri(), &dir.path().join("book.xlsx")),
            post_json("/ask", json!({"prompt": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"error": "No MCP tool call detected from model."}));
    }

    #[tokio::test]
    async fn test_ask_model_failure_is_bad_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let (status, body) = send(
            app(&server.uri(), &dir.path().join("book.xlsx")),
            post_json("/ask", json!({"prompt": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_workbook_create_download_upload() {
        let dir = TempDir::new().unwrap();
        let book = dir.path().join("book.xlsx");

        let response = app("http://127.0.0.1:9", &book)
            .oneshot(Request::get("/workbook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let (status, _) = send(
            app("http://127.0.0.1:9", &book),
            Request::post("/workbook").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let response = app("http://127.0.0.1:9", &book)
            .oneshot(Request::get("/workbook").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains(DOWNLOAD_FILENAME));
        let downloaded = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&downloaded[..], &std::fs::read(&book).unwrap()[..]);

        let other = dir.path().join("other.xlsx");
        let (status, _) = send(
            app("http://127.0.0.1:9", &other),
            Request::put("/workbook").body(Body::from(downloaded)).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(std::fs::read(&other).unwrap(), std::fs::read(&book).unwrap());
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_body() {
        let dir = TempDir::new().unwrap();
        let (status, _) = send(
            app("http://127.0.0.1:9", &dir.path().join("book.xlsx")),
            Request::put("/workbook").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

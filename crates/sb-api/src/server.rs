//! HTTP API Server
//!
//! Builds the shared application state and serves the axum router until the
//! shutdown signal resolves.

use std::future::Future;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use sb_core::{ChatClient, Config, PromptBridge, ToolRegistry};

use crate::routes::routes;

/// Shared application state
///
/// Built once at startup and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<ChatClient>,
    pub registry: Arc<ToolRegistry>,
    pub bridge: Arc<PromptBridge>,
}

impl AppState {
    pub fn new(config: Config, registry: ToolRegistry) -> sb_core::Result<Self> {
        let client = Arc::new(ChatClient::new(&config.llm)?);
        let registry = Arc::new(registry);
        let bridge = Arc::new(PromptBridge::new(
            Arc::clone(&client),
            Arc::clone(&registry),
            config.workbook.default_path.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            client,
            registry,
            bridge,
        })
    }

    /// Workbook path used by `/ask` and the `/workbook` endpoints
    pub fn workbook_path(&self) -> &str {
        &self.config.workbook.default_path
    }
}

fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = allowed_origins else {
        return CorsLayer::permissive();
    };

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the application router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.api.allowed_origins.as_deref());

    Router::new()
        .merge(routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP API server
///
/// Returns once `shutdown` resolves and in-flight requests have finished.
pub async fn start_server<F>(state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.bind_addr();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP API stopped");
    Ok(())
}

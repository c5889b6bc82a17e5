//! sheetbridge: Spreadsheet tool bridge
//!
//! Main entry point for the SheetBridge server.
//!
//! Usage:
//!   sheetbridge                    - Start the HTTP server
//!   sheetbridge --config <path>    - Start with an explicit config file
//!   sheetbridge --help             - Show help

use sb_api::AppState;
use sb_core::{Config, ToolRegistry};
use sb_tools::register_default_tools;
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Serve the HTTP API, optionally with an explicit config file
    Serve { config_path: Option<String> },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mode = parse_args(std::env::args().skip(1))?;

    let config_path = match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("sheetbridge {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Serve { config_path } => config_path,
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = match &config_path {
        Some(path) => Config::from_toml_file(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting sheetbridge...");
    tracing::info!("Model: {}", config.llm.model);
    tracing::info!("Workbook: {}", config.workbook.default_path);

    run_server(config).await
}

/// Parse command line arguments
fn parse_args<I>(args: I) -> anyhow::Result<RunMode>
where
    I: IntoIterator<Item = String>,
{
    let mut config_path = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(RunMode::Help),
            "--version" | "-v" => return Ok(RunMode::Version),
            "--config" | "-c" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
                config_path = Some(path);
            }
            "serve" => {}
            other => anyhow::bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(RunMode::Serve { config_path })
}

/// Print help message
fn print_help() {
    println!("sheetbridge - Spreadsheet tool bridge for chat-completion models");
    println!();
    println!("Usage:");
    println!("  sheetbridge [serve]            Start the HTTP server");
    println!("  sheetbridge --config <path>    Load configuration from <path>");
    println!("  sheetbridge --help             Show this help message");
    println!("  sheetbridge --version          Show version");
    println!();
    println!("Configuration is read from ./sheetbridge.toml when present.");
    println!();
    println!("Environment Variables:");
    println!("  OPENAI_API_KEY       API key (required; LLM_API_KEY also accepted)");
    println!("  LLM_MODEL            Model name (default: gpt-4o)");
    println!("  LLM_BASE_URL         API endpoint (default: https://api.openai.com/v1)");
    println!("  API_HOST             Bind address (default: 0.0.0.0)");
    println!("  API_PORT             HTTP API port (default: 8000)");
    println!("  API_ALLOWED_ORIGINS  Comma-separated CORS origins (default: any)");
    println!("  WORKBOOK_PATH        Default workbook (default: uploaded_file.xlsx)");
}

/// Run the HTTP server until Ctrl+C
async fn run_server(config: Config) -> anyhow::Result<()> {
    let mut registry = ToolRegistry::new();
    register_default_tools(&mut registry);
    tracing::info!(
        "Registered {} tools: {:?}",
        registry.len(),
        registry.tool_names()
    );

    let state = AppState::new(config, registry)
        .map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;

    tracing::info!("Press Ctrl+C to exit");

    sb_api::start_server(state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutting down...");
    })
    .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

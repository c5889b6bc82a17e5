//! Prompt bridge
//!
//! Sends a natural-language prompt to the chat model together with every
//! registered tool, then dispatches each tool call the model returns, one
//! after another, in the order the model listed them.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::llm::ChatClient;
use crate::tool::{ToolOutput, ToolRegistry};
use crate::Result;

/// Argument every workbook tool takes; injected when the model omits it
pub const FILEPATH_ARG: &str = "filepath";

/// Outcome of one prompt round-trip
#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    /// Per-call results, in model order
    Results(Vec<ToolOutput>),
    /// The model answered without requesting any tool call
    NoToolCalls { text: Option<String> },
}

/// Relays prompts to the model and executes the tool calls it requests
pub struct PromptBridge {
    client: Arc<ChatClient>,
    registry: Arc<ToolRegistry>,
    default_filepath: String,
}

impl PromptBridge {
    pub fn new(
        client: Arc<ChatClient>,
        registry: Arc<ToolRegistry>,
        default_filepath: impl Into<String>,
    ) -> Self {
        Self {
            client,
            registry,
            default_filepath: default_filepath.into(),
        }
    }

    /// Fixed system instruction sent with every prompt
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an Excel control agent. \
             Use MCP tools only. Respond ONLY in structured MCP tool calls. \
             You are allowed to plan and generate multiple tool calls if required to fulfill user requests fully. \
             If a tool requires a '{}' argument, always use '{}'.",
            FILEPATH_ARG, self.default_filepath
        )
    }

    pub fn default_filepath(&self) -> &str {
        &self.default_filepath
    }

    /// Send `prompt` to the model and run every requested tool call
    ///
    /// Calls run strictly sequentially; the first failing call aborts the
    /// rest and its error is returned.
    pub async fn ask(&self, prompt: &str) -> Result<AskOutcome> {
        let request = self
            .client
            .request_builder()
            .system(self.system_prompt())
            .user(prompt)
            .tools(self.registry.definitions())
            .tool_choice("auto")
            .build();

        let response = self.client.complete(request).await?;
        let calls = response.tool_calls();

        if calls.is_empty() {
            info!("Model issued no tool calls");
            return Ok(AskOutcome::NoToolCalls {
                text: response.text().map(str::to_string),
            });
        }

        info!(count = calls.len(), "Executing model tool calls");

        let default_path = JsonValue::String(self.default_filepath.clone());
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let call = call.with_default_argument(FILEPATH_ARG, default_path.clone())?;
            debug!(tool = %call.name(), "Dispatching model tool call");
            results.push(self.registry.dispatch(&call).await?);
        }

        Ok(AskOutcome::Results(results))
    }
}

//! Tool registry and dispatcher
//!
//! Tools are kept in registration order. Dispatch resolves a tool call's
//! arguments, finds the tool by exact name, checks the arguments against the
//! tool's declared parameters, and runs it.

use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info};

use crate::llm::{json_kind, ToolCall, ToolCallEnvelope};
use crate::tool::{ParamSpec, Tool, ToolDefinition, ToolOutput};
use crate::{Error, Result};

/// Registry of model-callable tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool
    ///
    /// If a tool with the same name already exists, it is replaced in place
    /// and keeps its position.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(slot) => *slot = tool,
            None => self.tools.push(tool),
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Descriptors of every registered tool, in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition::from_tool(t.as_ref()))
            .collect()
    }

    /// Dispatch the first call of an envelope
    ///
    /// # Errors
    /// `InvalidArguments` if the envelope is empty or the arguments do not
    /// fit the tool, `ToolNotFound` if no tool has the requested name, or
    /// whatever the tool itself returns.
    pub async fn acall(&self, envelope: &ToolCallEnvelope) -> Result<ToolOutput> {
        let call = envelope.tool_calls.first().ok_or_else(|| {
            Error::InvalidArguments("tool call envelope contains no tool calls".to_string())
        })?;

        if envelope.tool_calls.len() > 1 {
            debug!(
                ignored = envelope.tool_calls.len() - 1,
                "Envelope carries more than one tool call; dispatching the first"
            );
        }

        self.dispatch(call).await
    }

    /// Dispatch a single tool call
    pub async fn dispatch(&self, call: &ToolCall) -> Result<ToolOutput> {
        let name = call.name();
        let args = call.function.resolve_arguments()?;

        let tool = self
            .get(name)
            .ok_or_else(|| Error::ToolNotFound(name.to_string()))?;

        validate_arguments(name, &tool.parameters(), &args)?;

        info!(tool = %name, "Dispatching tool call");
        debug!(tool = %name, args = ?args, "Tool arguments");

        let output = tool.execute(args).await?;
        if output.is_error() {
            debug!(tool = %name, output = ?output, "Tool returned a structured error");
        }
        Ok(output)
    }

    /// Check if a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all registered tool names, in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }
}

/// Check an argument map against declared parameters: every parameter must
/// be present with an acceptable kind, and nothing undeclared may appear.
fn validate_arguments(
    tool: &str,
    params: &[ParamSpec],
    args: &Map<String, JsonValue>,
) -> Result<()> {
    for param in params {
        let value = args.get(param.name).ok_or_else(|| {
            Error::InvalidArguments(format!("{}: missing parameter '{}'", tool, param.name))
        })?;

        if !param.kind.accepts(value) {
            return Err(Error::InvalidArguments(format!(
                "{}: parameter '{}' expects {:?}, got {}",
                tool,
                param.name,
                param.kind,
                json_kind(value)
            )));
        }
    }

    if let Some(extra) = args.keys().find(|k| !params.iter().any(|p| p.name == k.as_str())) {
        return Err(Error::InvalidArguments(format!(
            "{}: unexpected parameter '{}'",
            tool, extra
        )));
    }

    Ok(())
}

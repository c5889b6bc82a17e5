//! Tool definition helpers
//!
//! Renders registered tools into the chat-completion tool declaration shape:
//! `{"type": "function", "function": {name, description, parameters}}`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::tool::{ParamSpec, Tool};

/// Tool declaration sent to the chat-completion API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonValue,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }

    /// Render a tool's name, description and parameter schema
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self::new(
            tool.name(),
            tool.description(),
            SchemaBuilder::object_schema(&tool.parameters()),
        )
    }
}

/// Helper functions for creating tool schemas
pub struct SchemaBuilder;

impl SchemaBuilder {
    /// Create an object schema where every parameter is required
    ///
    /// # Example
    /// ```ignore
    /// let schema = SchemaBuilder::object_schema(&[
    ///     ParamSpec::string("filepath", "Workbook path"),
    ///     ParamSpec::integer("start_value", ""),
    /// ]);
    /// ```
    pub fn object_schema(params: &[ParamSpec]) -> JsonValue {
        let props: Map<String, JsonValue> = params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({"type": p.kind.schema_type(), "description": p.description}),
                )
            })
            .collect();

        let required: Vec<&str> = params.iter().map(|p| p.name).collect();

        json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }
}

//! Tool trait definition
//!
//! Defines the core trait for implementing tools that a chat model can
//! invoke through tool calls, together with their parameter schema and
//! result shape.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value as JsonValue};

use crate::{Error, Result};

/// JSON kind a tool parameter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A JSON string
    String,
    /// A JSON integer, or a string the tool parses into one
    Integer,
    /// Any JSON string, number or boolean
    Scalar,
}

impl ParamKind {
    /// JSON schema `type` value for this kind
    pub fn schema_type(&self) -> JsonValue {
        match self {
            ParamKind::String => json!("string"),
            ParamKind::Integer => json!("integer"),
            ParamKind::Scalar => json!(["string", "number", "boolean"]),
        }
    }

    /// Whether `value` is acceptable for this kind
    pub fn accepts(&self, value: &JsonValue) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Integer => value.is_number() || value.is_string(),
            ParamKind::Scalar => value.is_string() || value.is_number() || value.is_boolean(),
        }
    }
}

/// A declared tool parameter. Every parameter is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
        }
    }

    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, description)
    }

    pub const fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Integer, description)
    }

    pub const fn scalar(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Scalar, description)
    }
}

/// Tool execution result
///
/// Serializes to exactly one of `{"message"}`, `{"error"}`, `{"value"}` or
/// `{"sheets"}`. `Error` is a recoverable, structured failure returned to
/// the caller as a normal result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Message { message: String },
    Error { error: String },
    Value { value: JsonValue },
    Sheets { sheets: Vec<String> },
}

impl ToolOutput {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self::Error {
            error: error.into(),
        }
    }

    pub fn value(value: JsonValue) -> Self {
        Self::Value { value }
    }

    pub fn sheets(sheets: Vec<String>) -> Self {
        Self::Sheets { sheets }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Tool trait for chat-completion tool calling
///
/// Implement this trait to expose an operation to the model. Arguments are
/// checked against [`Tool::parameters`] before [`Tool::execute`] runs.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name (the function name the model calls)
    fn name(&self) -> &str;

    /// Get the tool description (shown to the model when selecting tools)
    fn description(&self) -> &str;

    /// Declared parameters, in order
    fn parameters(&self) -> Vec<ParamSpec>;

    /// Execute the tool with validated arguments
    async fn execute(&self, args: Map<String, JsonValue>) -> Result<ToolOutput>;
}

/// Decode a validated argument map into a tool's typed request struct
pub fn decode_args<T: DeserializeOwned>(tool: &str, args: Map<String, JsonValue>) -> Result<T> {
    serde_json::from_value(JsonValue::Object(args))
        .map_err(|e| Error::InvalidArguments(format!("{}: {}", tool, e)))
}

//! Chat-completion wire types (OpenAI-compatible)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::tool::ToolDefinition;

/// Chat message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: text.into(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: text.into(),
        }
    }
}

// ============================================================================
// Tool calls
// ============================================================================

/// One requested function invocation.
///
/// `arguments` is kept as raw JSON: models send a JSON-encoded string, while
/// direct callers of `/mcp` usually send an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: JsonValue,
}

impl FunctionCall {
    /// Resolve the raw arguments into a key-value mapping.
    ///
    /// A string is parsed as JSON; if parsing fails the raw string is kept,
    /// which then fails the mapping check.
    pub fn resolve_arguments(&self) -> Result<Map<String, JsonValue>> {
        let resolved = match &self.arguments {
            JsonValue::String(raw) => {
                serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.clone()))
            }
            other => other.clone(),
        };

        match resolved {
            JsonValue::Object(map) => Ok(map),
            other => Err(Error::InvalidArguments(format!(
                "tool arguments must be an object, got {}: {}",
                json_kind(&other),
                other
            ))),
        }
    }
}

/// A tool call as it appears in a chat-completion response or a `/mcp` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: JsonValue) -> Self {
        Self {
            id: None,
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Return a copy whose arguments are a decoded object containing `key`,
    /// inserting `value` only when the model left it out.
    pub fn with_default_argument(&self, key: &str, value: JsonValue) -> Result<Self> {
        let mut args = self.function.resolve_arguments()?;
        args.entry(key.to_string()).or_insert(value);

        let mut call = self.clone();
        call.function.arguments = JsonValue::Object(args);
        Ok(call)
    }
}

/// Tool-call envelope: `{"tool_calls": [{"function": {"name", "arguments"}}]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEnvelope {
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

impl ToolCallEnvelope {
    pub fn single(call: ToolCall) -> Self {
        Self {
            tool_calls: vec![call],
        }
    }
}

/// Human-readable JSON kind, used in argument error messages
pub fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ============================================================================
// Requests / responses
// ============================================================================

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<ChatChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessageResponse,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageResponse {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl ChatCompletionResponse {
    /// Tool calls requested in the first choice, in model order
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.choices
            .first()
            .and_then(|c| c.message.tool_calls.as_deref())
            .unwrap_or(&[])
    }

    /// Text content of the first choice, if any
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Builder for creating chat completion requests
pub struct ChatRequestBuilder {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<ToolDefinition>,
    tool_choice: Option<String>,
}

impl ChatRequestBuilder {
    pub fn new(model: String) -> Self {
        Self {
            model,
            messages: vec![],
            tools: vec![],
            tool_choice: None,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::system(system));
        self
    }

    pub fn user(mut self, text: impl Into<String>) -> Self {
        self.messages.push(ChatMessage::user(text));
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools.extend(tools);
        self
    }

    pub fn tool_choice(mut self, choice: impl Into<String>) -> Self {
        self.tool_choice = Some(choice.into());
        self
    }

    pub fn build(self) -> ChatCompletionRequest {
        let has_tools = !self.tools.is_empty();
        ChatCompletionRequest {
            model: self.model,
            messages: self.messages,
            tools: has_tools.then_some(self.tools),
            tool_choice: if has_tools { self.tool_choice } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_arguments_from_string() {
        let call = ToolCall::new("read_cell", json!("{\"cell\":\"A1\"}"));
        let args = call.function.resolve_arguments().unwrap();
        assert_eq!(args.get("cell"), Some(&json!("A1")));
    }

    #[test]
    fn test_resolve_arguments_from_object() {
        let call = ToolCall::new("read_cell", json!({"cell": "A1"}));
        let args = call.function.resolve_arguments().unwrap();
        assert_eq!(args.get("cell"), Some(&json!("A1")));
    }

    #[test]
    fn test_resolve_arguments_unparsable_string() {
        let call = ToolCall::new("read_cell", json!("cell=A1"));
        let err = call.function.resolve_arguments().unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_resolve_arguments_non_object_json() {
        let call = ToolCall::new("read_cell", json!("[1, 2]"));
        assert!(matches!(
            call.function.resolve_arguments(),
            Err(Error::InvalidArguments(_))
        ));

        let call = ToolCall::new("read_cell", JsonValue::Null);
        assert!(matches!(
            call.function.resolve_arguments(),
            Err(Error::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_with_default_argument_injects_when_missing() {
        let call = ToolCall::new("list_sheets", json!("{}"));
        let call = call
            .with_default_argument("filepath", json!("book.xlsx"))
            .unwrap();
        assert_eq!(call.function.arguments, json!({"filepath": "book.xlsx"}));
    }

    #[test]
    fn test_with_default_argument_keeps_existing() {
        let call = ToolCall::new("list_sheets", json!("{\"filepath\":\"other.xlsx\"}"));
        let call = call
            .with_default_argument("filepath", json!("book.xlsx"))
            .unwrap();
        assert_eq!(call.function.arguments, json!({"filepath": "other.xlsx"}));
    }

    #[test]
    fn test_envelope_deserialization() {
        let body = json!({
            "tool_calls": [
                {"function": {"name": "save_file", "arguments": {"filepath": "f.xlsx"}}}
            ]
        });
        let envelope: ToolCallEnvelope = serde_json::from_value(body).unwrap();
        assert_eq!(envelope.tool_calls.len(), 1);
        assert_eq!(envelope.tool_calls[0].name(), "save_file");
        assert_eq!(envelope.tool_calls[0].call_type, "function");
        assert!(envelope.tool_calls[0].id.is_none());
    }

    #[test]
    fn test_response_with_tool_calls() {
        let body = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "create_sheet", "arguments": "{\"sheet_name\":\"Finance\"}"}
                        },
                        {
                            "id": "call_2",
                            "type": "function",
                            "function": {"name": "write_cell", "arguments": "{\"sheet_name\":\"Finance\",\"cell\":\"A1\",\"value\":\"x\"}"}
                        }
                    ]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
        });

        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].name(), "create_sheet");
        assert_eq!(calls[1].id.as_deref(), Some("call_2"));
        assert!(response.text().is_none());
    }

    #[test]
    fn test_response_without_tool_calls() {
        let body = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hello"},
                "finish_reason": "stop"
            }]
        });
        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.text(), Some("Hello"));
    }

    #[test]
    fn test_builder_omits_tool_fields_without_tools() {
        let request = ChatRequestBuilder::new("gpt-4o".to_string())
            .system("sys")
            .user("hi")
            .tool_choice("auto")
            .build();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"].as_array().unwrap().len(), 2);
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }
}

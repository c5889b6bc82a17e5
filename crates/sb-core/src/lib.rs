//! sb-core: SheetBridge Core Library
//!
//! Chat-completion client, the tool registry and dispatcher, and the
//! prompt bridge that lets a model drive registered tools.

pub mod bridge;
pub mod config;
pub mod error;
pub mod llm;
pub mod tool;

pub use bridge::{AskOutcome, PromptBridge};
pub use config::{ApiConfig, Config, LlmConfig, WorkbookConfig};
pub use error::{Error, Result};
pub use llm::{ChatClient, ChatMessage, ToolCall, ToolCallEnvelope};
pub use tool::{ParamKind, ParamSpec, Tool, ToolDefinition, ToolOutput, ToolRegistry};

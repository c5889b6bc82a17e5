//! Tool system for chat-completion tool calling
//!
//! This module provides the registry that describes tools to the model and
//! the dispatcher that executes the tool calls it sends back.

pub mod definition;
pub mod registry;
pub mod traits;

pub use definition::{FunctionDefinition, SchemaBuilder, ToolDefinition};
pub use registry::ToolRegistry;
pub use traits::{decode_args, ParamKind, ParamSpec, Tool, ToolOutput};

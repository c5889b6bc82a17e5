//! Chat-completion client and wire types
//!
//! Speaks the OpenAI-compatible `/chat/completions` API with tool calling.

mod client;
mod types;

pub use client::ChatClient;
pub use types::*;

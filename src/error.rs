// ABOUTME: Defines all error types for the llm-testgen library using thiserror.
// ABOUTME: Each submodule has its own error enum, unified under TestgenError.

use std::time::Duration;

/// Top-level error type for the llm-testgen library.
#[derive(Debug, thiserror::Error)]
pub enum TestgenError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),
}

/// Errors from LLM backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Capability not supported by this backend: {0}")]
    Unsupported(&'static str),
}

/// Errors from the MCP correlation channel.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("MCP timeout after {0:?}")]
    Timeout(Duration),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

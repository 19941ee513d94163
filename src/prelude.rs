// ABOUTME: Prelude module - convenient imports for common use cases.
// ABOUTME: Use `use llm_testgen::prelude::*;` to get started quickly.

pub use crate::config::{ClientConfig, LmStudioConfig, McpConfig, OllamaConfig};
pub use crate::error::{LlmError, McpError, TestgenError};
pub use crate::llm::{
    Capabilities, ChatBackend, ChatMessage, LmStudioClient, OllamaClient, Provider,
    ProviderHealth, Role, UnifiedClient, check_providers, create_client, create_default_client,
    create_lm_studio_client, create_ollama_client, parse_step_list, render_test_code,
};
pub use crate::mcp::McpChannel;

// ABOUTME: Defines the ChatBackend trait - the abstraction layer that lets
// ABOUTME: test generation run against any local LLM server (Ollama, LM Studio).

use async_trait::async_trait;

use super::{Capabilities, ChatMessage};
use crate::error::LlmError;

/// Trait for chat backend implementations.
///
/// `chat`, `generate_test_steps` and `analyze_page_structure` are required.
/// The rest are optional; a backend advertises which ones it really
/// implements through [`ChatBackend::capabilities`], and callers should
/// consult the flags rather than rely on the default bodies.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Optional operations this backend implements.
    fn capabilities(&self) -> Capabilities {
        Capabilities::none()
    }

    /// Send a conversation and return the assistant reply text.
    /// Returns an empty string when the reply carries no message.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Ask for automation steps for `test_objective` on the given page.
    async fn generate_test_steps(
        &self,
        page_content: &str,
        test_objective: &str,
    ) -> Result<Vec<String>, LlmError>;

    /// Ask for a free-text structural and testability analysis of the page.
    async fn analyze_page_structure(&self, page_content: &str) -> Result<String, LlmError>;

    /// Ask for complete, runnable test source. The reply is returned verbatim.
    async fn generate_test_code(
        &self,
        _page_content: &str,
        _test_objective: &str,
        _page_name: &str,
    ) -> Result<String, LlmError> {
        Err(LlmError::Unsupported("generate_test_code"))
    }

    /// Cheap reachability probe. Never fails; unreachable means `false`.
    async fn is_available(&self) -> bool {
        true
    }

    /// Installed model identifiers. Never fails; errors yield an empty list.
    async fn list_models(&self) -> Vec<String> {
        Vec::new()
    }
}

// ABOUTME: UnifiedClient - one capability-complete client over any ChatBackend.
// ABOUTME: Fills in missing optional capabilities from the core chat operations.

use std::sync::Arc;

use async_trait::async_trait;

use super::{Capabilities, ChatBackend, ChatMessage, Provider};
use crate::error::LlmError;

/// Wraps a backend and the provider tag it was built for.
#[derive(Clone)]
pub struct UnifiedClient {
    backend: Arc<dyn ChatBackend>,
    provider: Provider,
}

impl std::fmt::Debug for UnifiedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedClient")
            .field("provider", &self.provider)
            .field("capabilities", &self.backend.capabilities())
            .finish()
    }
}

impl UnifiedClient {
    pub fn new(backend: impl ChatBackend + 'static, provider: Provider) -> Self {
        Self::from_arc(Arc::new(backend), provider)
    }

    pub fn from_arc(backend: Arc<dyn ChatBackend>, provider: Provider) -> Self {
        Self { backend, provider }
    }

    /// The provider tag given at construction.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Capabilities of the wrapped backend (not of this client, which has all).
    pub fn backend_capabilities(&self) -> Capabilities {
        self.backend.capabilities()
    }
}

#[async_trait]
impl ChatBackend for UnifiedClient {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.backend.chat(messages).await
    }

    async fn generate_test_steps(
        &self,
        page_content: &str,
        test_objective: &str,
    ) -> Result<Vec<String>, LlmError> {
        self.backend
            .generate_test_steps(page_content, test_objective)
            .await
    }

    async fn analyze_page_structure(&self, page_content: &str) -> Result<String, LlmError> {
        self.backend.analyze_page_structure(page_content).await
    }

    async fn generate_test_code(
        &self,
        page_content: &str,
        test_objective: &str,
        page_name: &str,
    ) -> Result<String, LlmError> {
        if self.backend.capabilities().test_code {
            return self
                .backend
                .generate_test_code(page_content, test_objective, page_name)
                .await;
        }

        tracing::debug!(provider = %self.provider, "rendering test code from generated steps");
        let steps = self
            .backend
            .generate_test_steps(page_content, test_objective)
            .await?;
        Ok(render_test_code(&steps, page_name, test_objective))
    }

    async fn is_available(&self) -> bool {
        if self.backend.capabilities().availability_probe {
            self.backend.is_available().await
        } else {
            true
        }
    }

    async fn list_models(&self) -> Vec<String> {
        if self.backend.capabilities().model_listing {
            self.backend.list_models().await
        } else {
            Vec::new()
        }
    }
}

/// Wrap steps in a Playwright `test.describe` / `test` scaffold that first
/// navigates to `/`. Each step becomes one indented line.
pub fn render_test_code(steps: &[String], page_name: &str, test_objective: &str) -> String {
    let body = steps
        .iter()
        .map(|step| format!("    {step}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "import {{ test, expect }} from '@playwright/test';\n\
         \n\
         test.describe('{page} Tests', () => {{\n  \
           test('{objective}', async ({{ page }}) => {{\n    \
             // Navigate to the page\n    \
             await page.goto('/');\n\
         \n    \
             // Generated test steps\n\
         {body}\n  \
           }});\n\
         }});",
        page = escape_single_quoted(page_name),
        objective = escape_single_quoted(test_objective),
    )
}

fn escape_single_quoted(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

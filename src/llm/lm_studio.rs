// ABOUTME: LM Studio client using its OpenAI-compatible `/v1/chat/completions` API.
// ABOUTME: Implements only the core ChatBackend operations; no probe or model listing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parse::parse_step_list;
use super::{ChatBackend, ChatMessage, prompts};
use crate::config::LmStudioConfig;
use crate::error::LlmError;

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 1000;

/// OpenAI-style chat completions request.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

/// OpenAI-style chat completions response. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, or empty.
    pub fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

/// OpenAI-style error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Client for a local LM Studio server.
#[derive(Debug, Clone)]
pub struct LmStudioClient {
    config: LmStudioConfig,
    http: reqwest::Client,
}

impl LmStudioClient {
    /// Create a client from an explicit config.
    pub fn new(config: LmStudioConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from the `LM_STUDIO_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(LmStudioConfig::from_env())
    }

    pub fn config(&self) -> &LmStudioConfig {
        &self.config
    }

    fn endpoint(&self) -> Result<String, LlmError> {
        let base = self.config.url.trim_end_matches('/');
        if base.is_empty() {
            return Err(LlmError::Configuration("LM Studio URL is empty".to_string()));
        }
        Ok(format!("{base}/v1/chat/completions"))
    }

    async fn send_chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stream: false,
        };

        let mut request = self
            .http
            .post(self.endpoint()?)
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await?;
        Ok(completion.into_text())
    }
}

impl Default for LmStudioClient {
    fn default() -> Self {
        Self::new(LmStudioConfig::default())
    }
}

#[async_trait]
impl ChatBackend for LmStudioClient {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.send_chat(messages).await.inspect_err(|e| {
            tracing::error!(error = %e, model = %self.config.model, "LM Studio chat request failed");
        })
    }

    async fn generate_test_steps(
        &self,
        page_content: &str,
        test_objective: &str,
    ) -> Result<Vec<String>, LlmError> {
        let reply = self
            .chat(&prompts::concise_steps(page_content, test_objective))
            .await?;
        Ok(parse_step_list(&reply))
    }

    async fn analyze_page_structure(&self, page_content: &str) -> Result<String, LlmError> {
        self.chat(&prompts::concise_analysis(page_content)).await
    }
}

// ABOUTME: Ollama native chat API client (`/api/chat`, `/api/tags`).
// ABOUTME: Implements every ChatBackend capability, including probing and model listing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::parse::parse_step_list;
use super::{Capabilities, ChatBackend, ChatMessage, prompts};
use crate::config::OllamaConfig;
use crate::error::LlmError;

/// Sampling options sent with every chat request.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OllamaOptions {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
}

impl Default for OllamaOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

/// Ollama `/api/chat` request body.
#[derive(Debug, Serialize)]
pub struct OllamaChatRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub stream: bool,
    pub options: OllamaOptions,
}

/// Ollama `/api/chat` response body. Only the fields we read.
#[derive(Debug, Deserialize)]
pub struct OllamaChatResponse {
    pub message: Option<OllamaResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaResponseMessage {
    pub content: Option<String>,
}

/// Ollama `/api/tags` response body.
#[derive(Debug, Deserialize)]
pub struct OllamaTagsResponse {
    #[serde(default)]
    pub models: Option<Vec<OllamaModel>>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaModel {
    pub name: String,
}

/// Ollama error body, `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    http: reqwest::Client,
}

impl OllamaClient {
    /// Create a client from an explicit config.
    pub fn new(config: OllamaConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Create a client from `OLLAMA_URL` / `OLLAMA_MODEL`.
    pub fn from_env() -> Self {
        Self::new(OllamaConfig::from_env())
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> Result<String, LlmError> {
        let base = self.config.url.trim_end_matches('/');
        if base.is_empty() {
            return Err(LlmError::Configuration("Ollama URL is empty".to_string()));
        }
        Ok(format!("{base}{path}"))
    }

    async fn fetch_tags(&self) -> Result<OllamaTagsResponse, LlmError> {
        let response = self.http.get(self.endpoint("/api/tags")?).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        Ok(response.json().await?)
    }

    async fn send_chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let body = OllamaChatRequest {
            model: &self.config.model,
            messages,
            stream: false,
            options: OllamaOptions::default(),
        };

        let response = self
            .http
            .post(self.endpoint("/api/chat")?)
            .header("Content-Type", "application/json")
            .timeout(self.config.chat_timeout)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(status.as_u16(), response.text().await.unwrap_or_default()));
        }

        let chat: OllamaChatResponse = response.json().await?;
        Ok(chat
            .message
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(OllamaConfig::default())
    }
}

fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<OllamaError>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.send_chat(messages).await.inspect_err(|e| {
            tracing::error!(error = %e, model = %self.config.model, "Ollama chat request failed");
        })
    }

    async fn generate_test_steps(
        &self,
        page_content: &str,
        test_objective: &str,
    ) -> Result<Vec<String>, LlmError> {
        let reply = self
            .chat(&prompts::detailed_steps(page_content, test_objective))
            .await?;
        Ok(parse_step_list(&reply))
    }

    async fn analyze_page_structure(&self, page_content: &str) -> Result<String, LlmError> {
        self.chat(&prompts::detailed_analysis(page_content)).await
    }

    async fn generate_test_code(
        &self,
        page_content: &str,
        test_objective: &str,
        page_name: &str,
    ) -> Result<String, LlmError> {
        self.chat(&prompts::test_code(page_content, test_objective, page_name))
            .await
    }

    async fn is_available(&self) -> bool {
        let url = match self.endpoint("/api/tags") {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, "Ollama probe skipped");
                return false;
            }
        };

        let result = self
            .http
            .get(url)
            .timeout(self.config.probe_timeout)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                tracing::debug!(error = %e, url = %self.config.url, "Ollama probe failed");
                false
            }
        }
    }

    async fn list_models(&self) -> Vec<String> {
        match self.fetch_tags().await {
            Ok(tags) => tags
                .models
                .unwrap_or_default()
                .into_iter()
                .map(|m| m.name)
                .collect(),
            Err(e) => {
                tracing::error!(error = %e, "Error listing Ollama models");
                Vec::new()
            }
        }
    }
}

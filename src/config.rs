// ABOUTME: Explicit configuration structs for the LLM backends and the MCP channel.
// ABOUTME: Each has documented defaults and a from_env loader; nothing is mutated after build.

use std::time::Duration;

use crate::llm::Provider;

/// Default Ollama server address.
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// Default Ollama model.
pub const OLLAMA_DEFAULT_MODEL: &str = "llama3.2:latest";

/// Default LM Studio server address.
pub const LM_STUDIO_DEFAULT_URL: &str = "http://localhost:1234";

/// Default LM Studio model.
pub const LM_STUDIO_DEFAULT_MODEL: &str = "llama-3.2-3b-instruct";

/// LM Studio ignores the key, but the OpenAI-style API expects one.
pub const LM_STUDIO_DEFAULT_API_KEY: &str = "lm-studio";

/// Default deadline for a correlated MCP reply.
pub const MCP_DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Settings for the native Ollama chat API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    /// Timeout for `/api/chat`. Local generation can be slow.
    pub chat_timeout: Duration,
    /// Timeout for the `/api/tags` availability probe.
    pub probe_timeout: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            url: OLLAMA_DEFAULT_URL.to_string(),
            model: OLLAMA_DEFAULT_MODEL.to_string(),
            chat_timeout: Duration::from_secs(120),
            probe_timeout: Duration::from_secs(5),
        }
    }
}

impl OllamaConfig {
    /// Create a config for the given server and model with default timeouts.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Load from `OLLAMA_URL` and `OLLAMA_MODEL`.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("OLLAMA_URL").unwrap_or(defaults.url),
            model: lookup("OLLAMA_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }
}

/// Settings for LM Studio's OpenAI-compatible chat completions API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmStudioConfig {
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// No timeout unless set.
    pub timeout: Option<Duration>,
}

impl Default for LmStudioConfig {
    fn default() -> Self {
        Self {
            url: LM_STUDIO_DEFAULT_URL.to_string(),
            model: LM_STUDIO_DEFAULT_MODEL.to_string(),
            api_key: Some(LM_STUDIO_DEFAULT_API_KEY.to_string()),
            timeout: None,
        }
    }
}

impl LmStudioConfig {
    /// Create a config for the given server and model with the default key.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    /// Load from `LM_STUDIO_URL`, `LM_STUDIO_MODEL`, `LM_STUDIO_API_KEY`
    /// and `LM_STUDIO_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("LM_STUDIO_URL").unwrap_or(defaults.url),
            model: lookup("LM_STUDIO_MODEL").unwrap_or(defaults.model),
            api_key: lookup("LM_STUDIO_API_KEY").or(defaults.api_key),
            timeout: parse_millis(lookup("LM_STUDIO_TIMEOUT_MS")).or(defaults.timeout),
        }
    }
}

/// Settings for the MCP correlation channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout: MCP_DEFAULT_TIMEOUT,
        }
    }
}

impl McpConfig {
    /// Create a config for the given WebSocket URL with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the per-request reply deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from `MCP_SERVER_URL` and `MCP_TIMEOUT` (milliseconds).
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            url: lookup("MCP_SERVER_URL").unwrap_or(defaults.url),
            timeout: parse_millis(lookup("MCP_TIMEOUT")).unwrap_or(defaults.timeout),
        }
    }
}

/// Everything the client factory needs to build and choose a backend.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    pub ollama: OllamaConfig,
    pub lm_studio: LmStudioConfig,
    /// Used when the caller passes no explicit preference.
    pub preferred_provider: Provider,
}

impl ClientConfig {
    /// Load both backend configs plus `AI_PROVIDER`.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// Any `AI_PROVIDER` other than `ollama` selects LM Studio.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let preferred_provider = match lookup("AI_PROVIDER") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "unknown AI_PROVIDER, using LM Studio");
                Provider::LmStudio
            }),
            None => Provider::default(),
        };

        Self {
            ollama: OllamaConfig::from_lookup(&lookup),
            lm_studio: LmStudioConfig::from_lookup(&lookup),
            preferred_provider,
        }
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_millis(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}

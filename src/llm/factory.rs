// ABOUTME: Client factory - picks the backend behind a UnifiedClient.
// ABOUTME: Probes Ollama and falls back to LM Studio; also reports provider health.

use super::{ChatBackend, LmStudioClient, OllamaClient, Provider, UnifiedClient};
use crate::config::ClientConfig;

/// Reachability of each provider, as reported by [`check_providers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderHealth {
    pub ollama: bool,
    pub lm_studio: bool,
}

/// Build a client for `preferred`, or `config.preferred_provider` when `None`.
///
/// Ollama is probed first; if the probe fails the client is built on
/// LM Studio instead. LM Studio is never probed and never falls back.
pub async fn create_client(config: &ClientConfig, preferred: Option<Provider>) -> UnifiedClient {
    let provider = preferred.unwrap_or(config.preferred_provider);
    tracing::info!(%provider, "creating AI client");

    match provider {
        Provider::Ollama => {
            let ollama = OllamaClient::new(config.ollama.clone());
            if ollama.is_available().await {
                tracing::info!(url = %config.ollama.url, "Ollama is available");
                UnifiedClient::new(ollama, Provider::Ollama)
            } else {
                tracing::warn!(
                    url = %config.ollama.url,
                    "Ollama is not available, falling back to LM Studio"
                );
                lm_studio_client(config)
            }
        }
        Provider::LmStudio => {
            tracing::info!("using LM Studio as specified");
            lm_studio_client(config)
        }
    }
}

fn lm_studio_client(config: &ClientConfig) -> UnifiedClient {
    UnifiedClient::new(
        LmStudioClient::new(config.lm_studio.clone()),
        Provider::LmStudio,
    )
}

/// Build a client preferring Ollama.
pub async fn create_default_client(config: &ClientConfig) -> UnifiedClient {
    create_client(config, Some(Provider::Ollama)).await
}

/// Same as [`create_default_client`]; still falls back when Ollama is down.
pub async fn create_ollama_client(config: &ClientConfig) -> UnifiedClient {
    create_client(config, Some(Provider::Ollama)).await
}

/// Build a client on LM Studio without probing.
pub async fn create_lm_studio_client(config: &ClientConfig) -> UnifiedClient {
    create_client(config, Some(Provider::LmStudio)).await
}

/// Probe both providers concurrently. LM Studio has no probe, so it is
/// always reported available.
pub async fn check_providers(config: &ClientConfig) -> ProviderHealth {
    let ollama = UnifiedClient::new(OllamaClient::new(config.ollama.clone()), Provider::Ollama);
    let lm_studio = lm_studio_client(config);

    let (ollama, lm_studio) = futures::join!(ollama.is_available(), lm_studio.is_available());
    ProviderHealth { ollama, lm_studio }
}

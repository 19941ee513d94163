// ABOUTME: Command-line front end for llm-testgen.
// ABOUTME: Checks provider health, lists models, generates steps/code, talks to MCP.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use llm_testgen::prelude::*;

const USAGE: &str = "\
Usage: testgen-cli <command> [args]

Commands:
  health                                   Probe Ollama and LM Studio
  models                                   List models of the selected provider
  steps <html-file> <objective>            Generate test steps
  code <html-file> <objective> <page-name> Generate Playwright test code
  analyze <html-file>                      Analyze page structure
  mcp <json>                               Send one message to the MCP server

Environment: AI_PROVIDER, OLLAMA_URL, OLLAMA_MODEL, LM_STUDIO_URL, LM_STUDIO_MODEL,
LM_STUDIO_API_KEY, LM_STUDIO_TIMEOUT_MS, MCP_SERVER_URL, MCP_TIMEOUT, RUST_LOG";

fn read_page(path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = ClientConfig::from_env();

    match (command.as_str(), &args[1..]) {
        ("health", []) => {
            let health = check_providers(&config).await;
            println!("ollama:   {}", status_label(health.ollama));
            println!("lmstudio: {}", status_label(health.lm_studio));
        }
        ("models", []) => {
            let client = ready_client(&config).await;
            let models = client.list_models().await;
            if models.is_empty() {
                println!("No models reported by {}", client.provider());
            }
            for model in models {
                println!("{model}");
            }
        }
        ("steps", [file, objective]) => {
            let client = ready_client(&config).await;
            let steps = client
                .generate_test_steps(&read_page(file)?, objective)
                .await?;
            for (i, step) in steps.iter().enumerate() {
                println!("{:>3}. {step}", i + 1);
            }
        }
        ("code", [file, objective, page_name]) => {
            let client = ready_client(&config).await;
            let code = client
                .generate_test_code(&read_page(file)?, objective, page_name)
                .await?;
            println!("{code}");
        }
        ("analyze", [file]) => {
            let client = ready_client(&config).await;
            println!("{}", client.analyze_page_structure(&read_page(file)?).await?);
        }
        ("mcp", [message]) => {
            let message: serde_json::Value =
                serde_json::from_str(message).context("message must be JSON")?;
            let mcp_config = McpConfig::from_env();
            tracing::debug!(
                url = %mcp_config.url,
                timeout = ?mcp_config.timeout,
                "connecting to MCP server"
            );
            let channel = McpChannel::connect(&mcp_config).await?;
            let reply = channel.send(message).await;
            channel.shutdown().await?;
            println!("{}", serde_json::to_string_pretty(&reply?)?);
        }
        _ => bail!("invalid arguments\n\n{USAGE}"),
    }

    Ok(())
}

/// Build the client for the configured provider and log which one was picked.
async fn ready_client(config: &ClientConfig) -> UnifiedClient {
    let client = create_client(config, None).await;
    tracing::info!(
        provider = %client.provider(),
        capabilities = ?client.backend_capabilities(),
        "client ready"
    );
    client
}

fn status_label(available: bool) -> &'static str {
    if available { "available" } else { "unavailable" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ready_client_honors_lm_studio_preference() {
        let config = ClientConfig {
            preferred_provider: Provider::LmStudio,
            ..Default::default()
        };
        let client = ready_client(&config).await;
        assert_eq!(client.provider(), Provider::LmStudio);
        assert_eq!(client.backend_capabilities(), Capabilities::none());
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(true), "available");
        assert_eq!(status_label(false), "unavailable");
    }
}

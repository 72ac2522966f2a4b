// Standalone MCP server binary

use anyhow::{Context, Result};
use std::path::PathBuf;
use stock_research_core::config::{ResearchConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use stock_research_mcp::{research_tools, McpServer};
use stock_research_sdk::{ResearchService, StockResearchClient};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::info!("Stock research MCP server starting...");

    let config_path = std::env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = ResearchConfig::load(&config_path)?;

    let client = StockResearchClient::builder()
        .http_settings(&config.http)
        .build()
        .context("Failed to build HTTP client")?;
    let service = ResearchService::new(client, config.dcf);

    let registry = research_tools(&service);
    tracing::info!("Registered {} tools", registry.len());

    let server = McpServer::new(registry);
    server.start().await?;

    Ok(())
}

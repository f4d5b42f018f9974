use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wealthtech_job_search::{
    anthropic::AnthropicClient,
    api::start_server,
    config::{port_from_env, AgentConfig},
    SearchOrchestrator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Loads .env as well
    let config = AgentConfig::from_env();
    if config.api_key.is_empty() {
        warn!("ANTHROPIC_API_KEY not set; searches will fail until it is configured");
    }

    let api_port = port_from_env()?;

    info!("WealthTech Job Search - API Server");
    info!("Port: {}", api_port);
    info!(model = %config.model, max_searches = config.max_searches, "Agent configured");

    let transport = Arc::new(AnthropicClient::new(&config)?);
    let orchestrator = Arc::new(SearchOrchestrator::new(transport, config));

    start_server(orchestrator, api_port).await?;

    Ok(())
}

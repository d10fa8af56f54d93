mod completion;
mod config;
mod errors;
mod models;
mod pipeline;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::completion::{AnthropicClient, CompletionClient, GatewayClient};
use crate::config::Config;
use crate::pipeline::architect::PromptArchitect;
use crate::pipeline::prompts::default_system_instructions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shotwright API v{}", env!("CARGO_PKG_VERSION"));

    // Completion client: direct Anthropic by default, gateway when configured
    let client: Arc<dyn CompletionClient> = match &config.completion_gateway_url {
        Some(endpoint) => {
            info!("Completion via internal gateway at {endpoint}");
            Arc::new(GatewayClient::new(endpoint.clone()))
        }
        None => {
            let api_key = config.anthropic_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("ANTHROPIC_API_KEY must be set when no gateway is configured")
            })?;
            info!("Completion via Anthropic (model: {})", completion::MODEL);
            Arc::new(AnthropicClient::new(api_key))
        }
    };

    // System instructions: operator override wins, otherwise the built-in
    // default rendered from the film-grammar tables
    let system_instructions = config
        .system_instructions_override
        .clone()
        .unwrap_or_else(default_system_instructions);
    info!(
        "System instructions loaded ({} chars, {})",
        system_instructions.len(),
        if config.system_instructions_override.is_some() {
            "operator override"
        } else {
            "built-in default"
        }
    );

    let architect = PromptArchitect::new(client, system_instructions, config.max_output_tokens);

    let state = AppState { architect };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast when neither a provider credential nor a gateway
/// endpoint is configured.
#[derive(Debug, Clone)]
pub struct Config {
    /// Required unless `completion_gateway_url` is set.
    pub anthropic_api_key: Option<String>,
    /// When set, completions go through the internal gateway instead of
    /// calling the provider directly.
    pub completion_gateway_url: Option<String>,
    pub max_output_tokens: u32,
    /// Operator override for the built-in system instructions.
    pub system_instructions_override: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let anthropic_api_key = optional_env("ANTHROPIC_API_KEY");
        let completion_gateway_url = optional_env("COMPLETION_GATEWAY_URL");

        if anthropic_api_key.is_none() && completion_gateway_url.is_none() {
            bail!("Either ANTHROPIC_API_KEY or COMPLETION_GATEWAY_URL must be set");
        }

        Ok(Config {
            anthropic_api_key,
            completion_gateway_url,
            max_output_tokens: std::env::var("MAX_OUTPUT_TOKENS")
                .unwrap_or_else(|_| "8192".to_string())
                .parse::<u32>()
                .context("MAX_OUTPUT_TOKENS must be a positive integer")?,
            system_instructions_override: optional_env("SYSTEM_INSTRUCTIONS"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an environment variable, treating unset and blank as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

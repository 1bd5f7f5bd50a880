//! Bedside application binary - composition root.
//!
//! Ties together the Bedside crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Load the record dataset (configured file or bundled default)
//! 3. Build the completion provider from config (Gemini or OpenAI-style)
//! 4. Start the axum REST API server

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use bedside_api::{create_router, AppState};
use bedside_chat::ChatOrchestrator;
use bedside_core::config::ProviderConfig;
use bedside_core::{BedsideConfig, BedsideError};
use bedside_directory::Directory;
use bedside_provider::{CompletionProvider, GeminiProvider, OpenAiProvider};

mod cli;
use cli::CliArgs;

/// Build the configured completion provider.
///
/// Fails fast when the API key environment variable is unset.
fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn CompletionProvider>, BedsideError> {
    let api_key = std::env::var(&config.api_key_env).map_err(|_| {
        BedsideError::Config(format!(
            "environment variable {} is not set (required for the '{}' provider)",
            config.api_key_env, config.vendor
        ))
    })?;
    let timeout = Duration::from_secs(config.timeout_secs);

    let provider: Arc<dyn CompletionProvider> = match config.vendor.as_str() {
        "gemini" => Arc::new(GeminiProvider::new(
            &config.endpoint,
            &config.model,
            api_key,
            timeout,
        )?),
        "openai" => Arc::new(OpenAiProvider::new(
            &config.endpoint,
            &config.model,
            api_key,
            timeout,
        )?),
        other => {
            return Err(BedsideError::Config(format!(
                "unknown provider vendor '{}' (expected \"gemini\" or \"openai\")",
                other
            )))
        }
    };
    Ok(provider)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Bedside v{}", env!("CARGO_PKG_VERSION"));

    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = BedsideConfig::load_or_default(&config_file);
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    config.server.port = args.resolve_port(config.server.port);
    if let Some(records) = args.resolve_records_file() {
        config.general.records_file = Some(records);
    }

    // Record dataset.
    let directory = Arc::new(match &config.general.records_file {
        Some(path) => Directory::load(Path::new(path))?,
        None => {
            tracing::info!("No records file configured — using the bundled dataset");
            Directory::bundled()
        }
    });

    // Completion provider.
    let provider = build_provider(&config.provider)?;
    tracing::info!(
        vendor = %config.provider.vendor,
        model = %config.provider.model,
        "Completion provider configured"
    );

    // Orchestrator + API state.
    let orchestrator = Arc::new(ChatOrchestrator::new(
        Arc::clone(&directory),
        provider,
        config.chat.clone(),
    ));
    let state = AppState::new(orchestrator, directory, config.server.origins());
    let router = create_router(state);

    // === API server ===

    let addr = format!("127.0.0.1:{}", config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind — is another instance running?");
            tracing::error!("Try: bedside --port {}", config.server.port + 1);
            return Err(e.into());
        }
    };

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router).await?;

    Ok(())
}

//! Visita application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Build the assistant client and the technician directory
//! 3. Rehydrate the remembered user name from the data directory
//! 4. Start the axum REST API server

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use visita_api::state::AppState;
use visita_api::routes;
use visita_chat::{ChatOrchestrator, HttpAssistant, ProfileStore};
use visita_core::config::DirectoryConfig;
use visita_core::VisitaConfig;
use visita_schedule::{HttpDirectory, StaticDirectory, TechnicianDirectory};

use cli::CliArgs;

fn build_directory(config: &DirectoryConfig) -> Arc<dyn TechnicianDirectory> {
    match config.base_url {
        Some(ref base_url) => {
            tracing::info!(base_url = %base_url, "Using HTTP technician directory");
            Arc::new(HttpDirectory::new(base_url.clone()))
        }
        None => {
            tracing::info!(
                count = config.technicians.len(),
                "Using static technician directory"
            );
            Arc::new(StaticDirectory::new(config.technicians.clone()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = VisitaConfig::load_or_default(&config_file);

    // Tracing.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting Visita v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Profile.
    let data_dir = args.resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }
    let profile = ProfileStore::in_dir(&data_dir);

    // Collaborators.
    let assistant = HttpAssistant::new(
        config.assistant.base_url.clone(),
        Duration::from_secs(config.assistant.timeout_secs),
    )?;
    tracing::info!(base_url = %config.assistant.base_url, "Assistant client ready");
    let directory = build_directory(&config.directory);

    let chat = ChatOrchestrator::new(Arc::new(assistant), directory, profile, &config.chat);

    // === API server ===

    let port = args.resolve_port(config.general.port);
    config.general.port = port;
    let state = AppState::new(config, chat);

    if let Err(e) = routes::start_server(port, state).await {
        tracing::error!(port, error = %e, "API server failed");
        tracing::error!("Try: VISITA_PORT={} visita", port.saturating_add(1));
        return Err(e.into());
    }

    Ok(())
}

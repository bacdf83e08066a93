//! Application state shared across all route handlers.

use std::sync::Arc;
use std::time::Instant;

use visita_chat::ChatOrchestrator;
use visita_core::VisitaConfig;

/// Shared application state.
///
/// All fields use `Arc` for cheap cloning across handler tasks. Mutable
/// session state lives inside the orchestrator.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<VisitaConfig>,
    /// Session controller.
    pub chat: Arc<ChatOrchestrator>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: VisitaConfig, chat: ChatOrchestrator) -> Self {
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            start_time: Instant::now(),
        }
    }
}

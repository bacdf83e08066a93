//! Technician directory sources.
//!
//! The directory is read-only and consulted only when the technician list is
//! requested. Any failure is reported as
//! [`SchedulingError::DirectoryUnavailable`].

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use visita_core::Technician;

use crate::error::SchedulingError;

/// Source of the technician list.
#[async_trait]
pub trait TechnicianDirectory: Send + Sync {
    /// Fetch every known technician.
    async fn list(&self) -> Result<Vec<Technician>, SchedulingError>;
}

// =============================================================================
// HTTP directory
// =============================================================================

/// Directory served over HTTP at `GET {base_url}/tecnicos`.
pub struct HttpDirectory {
    http: Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self) -> String {
        format!("{}/tecnicos", self.base_url)
    }
}

#[async_trait]
impl TechnicianDirectory for HttpDirectory {
    async fn list(&self) -> Result<Vec<Technician>, SchedulingError> {
        let url = self.url();
        let unavailable = |e: reqwest::Error| {
            warn!(url = %url, error = %e, "Technician directory request failed");
            SchedulingError::DirectoryUnavailable(e.to_string())
        };

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(&unavailable)?
            .error_for_status()
            .map_err(&unavailable)?;

        let technicians: Vec<Technician> = response.json().await.map_err(&unavailable)?;
        debug!(count = technicians.len(), "Fetched technicians");
        Ok(technicians)
    }
}

// =============================================================================
// Static directory
// =============================================================================

/// Directory backed by a fixed list, typically from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    technicians: Vec<Technician>,
}

impl StaticDirectory {
    pub fn new(technicians: Vec<Technician>) -> Self {
        Self { technicians }
    }
}

#[async_trait]
impl TechnicianDirectory for StaticDirectory {
    async fn list(&self) -> Result<Vec<Technician>, SchedulingError> {
        Ok(self.technicians.clone())
    }
}

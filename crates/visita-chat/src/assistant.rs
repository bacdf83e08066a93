//! Remote assistant client.
//!
//! The assistant receives the new message, the prior messages of the session
//! as `{role, content}` pairs, and the known user name. A usable answer is a
//! JSON object with a string `response` field and optional `sources`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use visita_core::{Citation, Message};

use crate::error::ChatError;

/// Answering service consulted for every submitted message.
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn ask(&self, query: AssistantQuery) -> Result<AssistantReply, ChatError>;
}

/// One prior message sent as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ContextEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.sender.role().to_string(),
            content: message.text.clone(),
        }
    }
}

/// Request body posted to the assistant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantQuery {
    pub message: String,
    pub context: Vec<ContextEntry>,
    pub user_name: Option<String>,
}

/// A usable assistant answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantReply {
    pub text: String,
    pub citations: Vec<Citation>,
}

impl AssistantReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            citations: Vec::new(),
        }
    }

    /// Interpret a response body.
    ///
    /// Returns `None` when `response` is missing or not a string. Malformed
    /// `sources` are dropped rather than failing the whole reply.
    pub fn from_body(body: &Value) -> Option<Self> {
        let text = body.get("response")?.as_str()?.to_string();
        let citations = body
            .get("sources")
            .cloned()
            .and_then(|sources| serde_json::from_value(sources).ok())
            .unwrap_or_default();
        Some(Self { text, citations })
    }
}

// =============================================================================
// HTTP assistant
// =============================================================================

/// Assistant reached with `POST {base_url}/chat`.
pub struct HttpAssistant {
    http: Client,
    base_url: String,
}

impl HttpAssistant {
    /// Build a client whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::AssistantUnavailable(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    fn url(&self) -> String {
        format!("{}/chat", self.base_url)
    }
}

#[async_trait]
impl Assistant for HttpAssistant {
    async fn ask(&self, query: AssistantQuery) -> Result<AssistantReply, ChatError> {
        let url = self.url();
        let unavailable = |e: reqwest::Error| {
            warn!(url = %url, error = %e, "Assistant request failed");
            ChatError::AssistantUnavailable(e.to_string())
        };

        let body: Value = self
            .http
            .post(&url)
            .json(&query)
            .send()
            .await
            .map_err(&unavailable)?
            .error_for_status()
            .map_err(&unavailable)?
            .json()
            .await
            .map_err(&unavailable)?;

        match AssistantReply::from_body(&body) {
            Some(reply) => {
                debug!(citations = reply.citations.len(), "Assistant replied");
                Ok(reply)
            }
            None => {
                warn!(url = %url, "Assistant reply has no response text");
                Err(ChatError::AssistantUnavailable(
                    "response field missing".to_string(),
                ))
            }
        }
    }
}

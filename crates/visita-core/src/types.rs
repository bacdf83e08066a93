use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Identifiers
// =============================================================================

/// Generate a new session or message identifier.
///
/// UUIDv7 strings: time-ordered, and still distinct and increasing when
/// several are created within the same millisecond.
pub fn next_id() -> String {
    Uuid::now_v7().to_string()
}

// =============================================================================
// Messages
// =============================================================================

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Role name sent to the remote assistant as conversation context.
    pub fn role(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "ai",
        }
    }
}

/// A source excerpt attached to an assistant answer. Passed through untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub content: String,
    pub source: String,
}

/// A single chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: next_id(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            citations: Vec::new(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }
}

// =============================================================================
// Technicians
// =============================================================================

/// A technician as listed by the directory.
///
/// Working hours are fixed-width `HH:MM:SS` strings and are compared
/// lexically. The Portuguese field names used by the upstream directory are
/// accepted as aliases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    pub id: u32,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "horario_inicio")]
    pub work_start: String,
    #[serde(alias = "horario_fim")]
    pub work_end: String,
}

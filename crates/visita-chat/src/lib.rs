//! Conversational interface for Visita.
//!
//! Routes user messages to the remote assistant, detects self-introductions,
//! and drives visit scheduling from inside the conversation.

pub mod assistant;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod profile;

pub use assistant::{Assistant, AssistantQuery, AssistantReply, ContextEntry, HttpAssistant};
pub use error::{ChatError, ASSISTANT_APOLOGY, DIRECTORY_APOLOGY};
pub use identity::IdentityExtractor;
pub use orchestrator::ChatOrchestrator;
pub use profile::ProfileStore;

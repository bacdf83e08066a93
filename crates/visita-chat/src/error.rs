//! Error types for the conversational interface.

use visita_core::VisitaError;
use visita_schedule::SchedulingError;

/// Apology shown when the remote assistant cannot be reached.
pub const ASSISTANT_APOLOGY: &str = "Desculpe, houve um erro ao conectar com o servidor.";

/// Apology shown when the technician list cannot be loaded.
pub const DIRECTORY_APOLOGY: &str =
    "Desculpe, não foi possível carregar a lista de técnicos. Tente novamente mais tarde.";

/// Errors from the chat engine.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("another message is still being answered")]
    Busy,
    #[error("assistant unavailable: {0}")]
    AssistantUnavailable(String),
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
    #[error(transparent)]
    Core(#[from] VisitaError),
    #[error("state lock poisoned: {0}")]
    StatePoisoned(String),
}

impl ChatError {
    /// Render the error as assistant-authored chat text.
    ///
    /// Validation outcomes are shown verbatim; collaborator failures become
    /// a generic apology.
    pub fn chat_text(&self) -> String {
        match self {
            ChatError::AssistantUnavailable(_) | ChatError::StatePoisoned(_) => {
                ASSISTANT_APOLOGY.to_string()
            }
            ChatError::Scheduling(SchedulingError::DirectoryUnavailable(_)) => {
                DIRECTORY_APOLOGY.to_string()
            }
            ChatError::Scheduling(e) => e.to_string(),
            ChatError::EmptyMessage => "Digite uma mensagem antes de enviar.".to_string(),
            ChatError::MessageTooLong(max) => {
                format!("A mensagem excede o limite de {} caracteres.", max)
            }
            ChatError::Busy => "Aguarde a resposta anterior antes de enviar outra mensagem.".to_string(),
            ChatError::Core(VisitaError::SessionNotFound(_)) => "Conversa não encontrada.".to_string(),
            ChatError::Core(_) => ASSISTANT_APOLOGY.to_string(),
        }
    }
}

use thiserror::Error;

/// Top-level error type for the Visita system.
///
/// Subsystem crates define their own error types and convert from
/// `VisitaError` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VisitaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session is active and cannot be deleted: {0}")]
    ActiveSession(String),
}

impl From<toml::de::Error> for VisitaError {
    fn from(err: toml::de::Error) -> Self {
        VisitaError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for VisitaError {
    fn from(err: toml::ser::Error) -> Self {
        VisitaError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for VisitaError {
    fn from(err: serde_json::Error) -> Self {
        VisitaError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Visita operations.
pub type Result<T> = std::result::Result<T, VisitaError>;

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::VisitaConfig;
pub use error::{Result, VisitaError};
pub use session::{Session, SessionStore, PLACEHOLDER_LABEL};
pub use types::*;

//! Visita API crate - axum HTTP server and route handlers.
//!
//! Exposes sessions, chat, technician listing and visit scheduling as a
//! JSON API for the front end.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;

//! API error types and JSON error response formatting.
//!
//! ApiError provides a consistent JSON error response format across all
//! endpoints, mapping chat and scheduling errors to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use visita_chat::ChatError;
use visita_core::VisitaError;
use visita_schedule::SchedulingError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code (e.g., "bad_request", "not_found").
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type that maps to HTTP status codes and JSON responses.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request - missing or invalid input.
    BadRequest(String),
    /// 404 Not Found - session does not exist.
    NotFound(String),
    /// 409 Conflict - busy, double booking, or deleting the active session.
    Conflict(String),
    /// 422 Unprocessable Entity - proposal failed validation.
    UnprocessableEntity(String),
    /// 500 Internal Server Error - unexpected server error.
    Internal(String),
    /// 503 Service Unavailable - a remote collaborator failed.
    ServiceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            ApiError::UnprocessableEntity(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "unprocessable_entity", msg)
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
            ApiError::ServiceUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        let message = err.to_string();
        match err {
            ChatError::EmptyMessage | ChatError::MessageTooLong(_) => ApiError::BadRequest(message),
            ChatError::Busy => ApiError::Conflict(message),
            ChatError::AssistantUnavailable(_) => ApiError::ServiceUnavailable(message),
            ChatError::Scheduling(e) => match e {
                SchedulingError::IncompleteRequest
                | SchedulingError::InvalidDate(_)
                | SchedulingError::PastDate(_) => ApiError::UnprocessableEntity(message),
                SchedulingError::DoubleBooking { .. } => ApiError::Conflict(message),
                SchedulingError::DirectoryUnavailable(_) => ApiError::ServiceUnavailable(message),
            },
            ChatError::Core(VisitaError::SessionNotFound(_)) => ApiError::NotFound(message),
            ChatError::Core(VisitaError::ActiveSession(_)) => ApiError::Conflict(message),
            ChatError::Core(_) | ChatError::StatePoisoned(_) => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ChatError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_chat_error_status_mapping() {
        assert_eq!(status_of(ChatError::EmptyMessage), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ChatError::Busy), StatusCode::CONFLICT);
        assert_eq!(
            status_of(SchedulingError::PastDate(String::new()).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(
                SchedulingError::DoubleBooking {
                    technician_id: 7,
                    scheduled_at: String::new()
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(SchedulingError::DirectoryUnavailable(String::new()).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(VisitaError::SessionNotFound("x".to_string()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(VisitaError::ActiveSession("x".to_string()).into()),
            StatusCode::CONFLICT
        );
    }
}

//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path parameters via axum extractors, calls
//! the chat orchestrator, and returns JSON responses.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use visita_core::{Message, Session};
use visita_schedule::{AppointmentRecord, TechnicianAvailability};

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TechniciansParams {
    /// Proposed local date-time; blank or absent lists everyone as available.
    pub at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppointmentRequest {
    #[serde(default)]
    pub technician_id: Option<u32>,
    #[serde(default)]
    pub date: String,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub busy: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
    pub owner_name: Option<String>,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentView {
    pub technician_id: u32,
    pub technician_name: String,
    pub scheduled_at: NaiveDateTime,
    pub formatted_date: String,
    pub confirmation_code: u16,
    pub ledger_text: String,
}

impl From<AppointmentRecord> for AppointmentView {
    fn from(record: AppointmentRecord) -> Self {
        Self {
            technician_id: record.technician_id,
            technician_name: record.technician_name(),
            scheduled_at: record.scheduled_at,
            formatted_date: record.formatted_date(),
            confirmation_code: record.confirmation_code,
            ledger_text: record.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentsResponse {
    pub appointments: Vec<AppointmentView>,
}

#[derive(Debug, Serialize)]
pub struct TechniciansResponse {
    pub technicians: Vec<TechnicianAvailability>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user_name: Option<String>,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        busy: state.chat.is_busy(),
    })
}

// =============================================================================
// Sessions
// =============================================================================

/// GET /sessions - all sessions, active first.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<SessionsResponse>, ApiError> {
    let sessions = state
        .chat
        .sessions()?
        .into_iter()
        .enumerate()
        .map(|(i, s)| SessionSummary {
            message_count: s.messages.len(),
            id: s.id,
            label: s.label,
            created_at: s.created_at,
            owner_name: s.owner_name,
            active: i == 0,
        })
        .collect();
    Ok(Json(SessionsResponse { sessions }))
}

/// POST /sessions - start a new conversation.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Session>), ApiError> {
    let session = state.chat.create_session()?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /sessions/active - the active session with its messages.
pub async fn active_session(State(state): State<AppState>) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.chat.active_session()?))
}

/// POST /sessions/{id}/activate - switch to an archived session.
pub async fn activate_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    Ok(Json(state.chat.switch_to(&id)?))
}

/// DELETE /sessions/{id} - delete an archived session.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.chat.delete_archived(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat - submit a message and wait for the assistant's reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<Message>, ApiError> {
    Ok(Json(state.chat.submit(&body.message).await?))
}

/// GET /profile - the remembered user name.
pub async fn profile(State(state): State<AppState>) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileResponse {
        user_name: state.chat.known_name()?,
    }))
}

// =============================================================================
// Scheduling
// =============================================================================

/// GET /technicians?at= - technicians with availability at the proposed time.
pub async fn technicians(
    State(state): State<AppState>,
    Query(params): Query<TechniciansParams>,
) -> Result<Json<TechniciansResponse>, ApiError> {
    let at = params.at.unwrap_or_default();
    let technicians = state.chat.technicians(&at).await?;
    Ok(Json(TechniciansResponse { technicians }))
}

/// POST /appointments - propose and confirm a visit.
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(body): Json<AppointmentRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), ApiError> {
    let record = state.chat.schedule(body.technician_id, &body.date)?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// GET /appointments - every visit recorded in the transcript.
pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<AppointmentsResponse>, ApiError> {
    let appointments = state
        .chat
        .appointments()?
        .into_iter()
        .map(AppointmentView::from)
        .collect();
    Ok(Json(AppointmentsResponse { appointments }))
}

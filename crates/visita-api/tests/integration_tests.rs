//! Integration tests for the Visita API.
//!
//! Each test builds its own router over a stub assistant, a static or
//! failing directory, and a profile file in a temporary directory.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use visita_api::create_router;
use visita_api::handlers::{
    AppointmentView, AppointmentsResponse, HealthResponse, ProfileResponse, SessionsResponse,
};
use visita_api::state::AppState;
use visita_chat::{
    Assistant, AssistantQuery, AssistantReply, ChatError, ChatOrchestrator, ProfileStore,
    ASSISTANT_APOLOGY, DIRECTORY_APOLOGY,
};
use visita_core::{Session, Technician, VisitaConfig};
use visita_schedule::{SchedulingError, StaticDirectory, TechnicianDirectory};

// =============================================================================
// Helpers
// =============================================================================

struct EchoAssistant;

#[async_trait]
impl Assistant for EchoAssistant {
    async fn ask(&self, query: AssistantQuery) -> Result<AssistantReply, ChatError> {
        let greeting = match query.user_name {
            Some(name) => format!("Olá, {}! ", name),
            None => String::new(),
        };
        Ok(AssistantReply::new(format!("{}Recebi: {}", greeting, query.message)))
    }
}

struct DownAssistant;

#[async_trait]
impl Assistant for DownAssistant {
    async fn ask(&self, _query: AssistantQuery) -> Result<AssistantReply, ChatError> {
        Err(ChatError::AssistantUnavailable("connection refused".to_string()))
    }
}

struct DownDirectory;

#[async_trait]
impl TechnicianDirectory for DownDirectory {
    async fn list(&self) -> Result<Vec<Technician>, SchedulingError> {
        Err(SchedulingError::DirectoryUnavailable("503".to_string()))
    }
}

fn technicians() -> Vec<Technician> {
    vec![
        Technician {
            id: 7,
            name: "Carla".to_string(),
            work_start: "08:00:00".to_string(),
            work_end: "17:00:00".to_string(),
        },
        Technician {
            id: 9,
            name: "Diego".to_string(),
            work_start: "18:00:00".to_string(),
            work_end: "23:00:00".to_string(),
        },
    ]
}

fn make_app_with(
    assistant: Arc<dyn Assistant>,
    directory: Arc<dyn TechnicianDirectory>,
) -> (axum::Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = VisitaConfig::default();
    let chat = ChatOrchestrator::new(
        assistant,
        directory,
        ProfileStore::in_dir(dir.path()),
        &config.chat,
    );
    (create_router(AppState::new(config, chat)), dir)
}

fn make_app() -> (axum::Router, TempDir) {
    make_app_with(
        Arc::new(EchoAssistant),
        Arc::new(StaticDirectory::new(technicians())),
    )
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, json: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(json.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::delete(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return (status, Value::Null);
    }
    (status, body_json(response).await)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _dir) = make_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(health.status, "healthy");
    assert!(!health.busy);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_appends_reply_to_active_session() {
    let (app, _dir) = make_app();
    let (status, reply) = send(&app, post_json("/chat", r#"{"message":"Olá"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["text"], "Recebi: Olá");
    assert_eq!(reply["sender"], "assistant");

    let (_, active) = send(&app, get("/sessions/active")).await;
    let active: Session = serde_json::from_value(active).unwrap();
    assert_eq!(active.messages.len(), 2);
    assert_eq!(active.label, "Olá");
}

#[tokio::test]
async fn test_chat_detects_identity() {
    let (app, _dir) = make_app();
    let (_, reply) = send(&app, post_json("/chat", r#"{"message":"Me chamo Ana"}"#)).await;
    assert_eq!(reply["text"], "Olá, Ana! Recebi: Me chamo Ana");

    let (status, body) = send(&app, get("/profile")).await;
    assert_eq!(status, StatusCode::OK);
    let profile: ProfileResponse = serde_json::from_value(body).unwrap();
    assert_eq!(profile.user_name.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_chat_empty_message() {
    let (app, _dir) = make_app();
    let (status, body) = send(&app, post_json("/chat", r#"{"message":"  "}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_chat_assistant_down_returns_apology() {
    let (app, _dir) = make_app_with(
        Arc::new(DownAssistant),
        Arc::new(StaticDirectory::default()),
    );
    let (status, reply) = send(&app, post_json("/chat", r#"{"message":"Olá"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["text"], ASSISTANT_APOLOGY);
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_session_lifecycle() {
    let (app, _dir) = make_app();
    send(&app, post_json("/chat", r#"{"message":"primeira conversa"}"#)).await;
    let (_, first) = send(&app, get("/sessions/active")).await;
    let first_id = first["id"].as_str().unwrap().to_string();

    let (status, created) = send(&app, post_empty("/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    let second_id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["label"], "Novo Chat");

    let (_, listed) = send(&app, get("/sessions")).await;
    let listed: SessionsResponse = serde_json::from_value(listed).unwrap();
    assert_eq!(listed.sessions.len(), 2);
    assert_eq!(listed.sessions[0].id, second_id);
    assert!(listed.sessions[0].active);
    assert_eq!(listed.sessions[1].id, first_id);
    assert_eq!(listed.sessions[1].label, "primeira conversa");
    assert!(!listed.sessions[1].active);

    let uri = format!("/sessions/{}/activate", first_id);
    let (status, active) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["id"], first_id.as_str());

    // The empty session was discarded on switch.
    let (_, listed) = send(&app, get("/sessions")).await;
    let listed: SessionsResponse = serde_json::from_value(listed).unwrap();
    assert_eq!(listed.sessions.len(), 1);
}

#[tokio::test]
async fn test_activate_unknown_session() {
    let (app, _dir) = make_app();
    let (status, body) = send(&app, post_empty("/sessions/missing/activate")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_delete_session_rules() {
    let (app, _dir) = make_app();
    send(&app, post_json("/chat", r#"{"message":"antiga"}"#)).await;
    let (_, old) = send(&app, get("/sessions/active")).await;
    let old_id = old["id"].as_str().unwrap().to_string();
    let (_, fresh) = send(&app, post_empty("/sessions")).await;
    let fresh_id = fresh["id"].as_str().unwrap().to_string();

    let (status, _) = send(&app, delete(&format!("/sessions/{}", fresh_id))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, delete(&format!("/sessions/{}", old_id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, delete(&format!("/sessions/{}", old_id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Technicians
// =============================================================================

#[tokio::test]
async fn test_technicians_with_availability() {
    let (app, _dir) = make_app();
    let (status, body) = send(&app, get("/technicians?at=2030-01-01T09:00")).await;
    assert_eq!(status, StatusCode::OK);
    let listed = body["technicians"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], 7);
    assert_eq!(listed[0]["available"], true);
    assert_eq!(listed[1]["available"], false);
}

#[tokio::test]
async fn test_technicians_without_time_are_all_available() {
    let (app, _dir) = make_app();
    let (_, body) = send(&app, get("/technicians")).await;
    let listed = body["technicians"].as_array().unwrap();
    assert!(listed.iter().all(|t| t["available"] == true));
}

#[tokio::test]
async fn test_technicians_directory_down() {
    let (app, _dir) = make_app_with(Arc::new(EchoAssistant), Arc::new(DownDirectory));
    let (status, body) = send(&app, get("/technicians")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "service_unavailable");

    let (_, active) = send(&app, get("/sessions/active")).await;
    assert_eq!(active["messages"][0]["text"], DIRECTORY_APOLOGY);
}

// =============================================================================
// Appointments
// =============================================================================

#[tokio::test]
async fn test_schedule_then_double_booking() {
    let (app, _dir) = make_app();
    let request = r#"{"technician_id":7,"date":"2999-01-01T10:00"}"#;

    let (status, body) = send(&app, post_json("/appointments", request)).await;
    assert_eq!(status, StatusCode::CREATED);
    let view: AppointmentView = serde_json::from_value(body).unwrap();
    assert_eq!(view.technician_id, 7);
    assert_eq!(view.technician_name, "Técnico 7");
    assert_eq!(view.formatted_date, "01/01/2999, 10:00");
    assert!(view.confirmation_code < 1000);
    assert_eq!(
        view.ledger_text,
        format!(
            "Visita confirmada com Técnico 7 para 01/01/2999, 10:00\nCódigo da visita: AG-{}",
            view.confirmation_code
        )
    );

    let (status, body) = send(&app, post_json("/appointments", request)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("Técnico 7"));

    let (_, listed) = send(&app, get("/appointments")).await;
    let listed: AppointmentsResponse = serde_json::from_value(listed).unwrap();
    assert_eq!(listed.appointments.len(), 1);

    let (_, active) = send(&app, get("/sessions/active")).await;
    let active: Session = serde_json::from_value(active).unwrap();
    assert_eq!(active.messages.len(), 2);
    assert_eq!(active.messages[0].text, view.ledger_text);
}

#[tokio::test]
async fn test_schedule_past_date() {
    let (app, _dir) = make_app();
    let (status, body) = send(
        &app,
        post_json("/appointments", r#"{"technician_id":3,"date":"2000-01-01T10:00"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "unprocessable_entity");

    let (_, listed) = send(&app, get("/appointments")).await;
    assert_eq!(listed["appointments"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_schedule_incomplete() {
    let (app, _dir) = make_app();
    let (status, _) = send(&app, post_json("/appointments", r#"{"technician_id":0,"date":""}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, post_json("/appointments", r#"{}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_appointments_survive_session_switch() {
    let (app, _dir) = make_app();
    send(
        &app,
        post_json("/appointments", r#"{"technician_id":5,"date":"2999-06-01T14:30"}"#),
    )
    .await;
    send(&app, post_empty("/sessions")).await;

    let (status, _) = send(
        &app,
        post_json("/appointments", r#"{"technician_id":5,"date":"2999-06-01T14:30"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

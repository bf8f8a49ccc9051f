//! Training session endpoints used by the coach dashboard and the mood board.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pulse::{
    domain::{Mood, SessionId, SessionView, TrainingSession},
    error::PulseError,
    service::PulseService,
};

// =============================================================================
// Request/Response DTOs
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub message: String,
    pub id: SessionId,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSessionRequest {
    #[serde(default)]
    pub id: Option<SessionIdInput>,
}

/// The dashboard sends ids as strings; API clients send numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionIdInput {
    Number(SessionId),
    Text(String),
}

impl SessionIdInput {
    pub fn resolve(&self) -> Result<SessionId, PulseError> {
        match self {
            Self::Number(id) => Ok(*id),
            Self::Text(raw) => raw.trim().parse().map_err(|e| {
                PulseError::InvalidArgument(format!("Invalid session ID '{raw}': {e}"))
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user: Option<String>,
}

/// Dashboard row.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub training_title: String,
    pub happy_count: i64,
    pub sad_count: i64,
    pub neutral_count: i64,
    pub has_interacted: bool,
    pub user_mood: Option<Mood>,
}

impl From<SessionView> for SessionSummary {
    fn from(view: SessionView) -> Self {
        let has_interacted = view.has_interacted();
        let SessionView {
            session,
            viewer_mood,
        } = view;
        Self {
            id: session.id,
            training_title: session.title,
            happy_count: session.counts.happy,
            sad_count: session.counts.sad,
            neutral_count: session.counts.neutral,
            has_interacted,
            user_mood: viewer_mood,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionDetail {
    pub id: SessionId,
    pub title: String,
    pub time_stamp: DateTime<Utc>,
    pub happy_count: i64,
    pub sad_count: i64,
    pub neutral_count: i64,
}

impl From<TrainingSession> for SessionDetail {
    fn from(session: TrainingSession) -> Self {
        Self {
            id: session.id,
            title: session.title,
            time_stamp: session.created_at,
            happy_count: session.counts.happy,
            sad_count: session.counts.sad,
            neutral_count: session.counts.neutral,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /sessions - Create a training session
pub(crate) async fn create_session(
    State(service): State<Arc<PulseService>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), PulseError> {
    let Json(req) = payload?;
    let session = service.create_session(&req.title).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            message: "Training session created successfully".to_string(),
            id: session.id,
        }),
    ))
}

/// GET /sessions?user= - List sessions with the viewer's interaction state
pub(crate) async fn list_sessions(
    State(service): State<Arc<PulseService>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<SessionSummary>>, PulseError> {
    let views = service.list_sessions(query.user.as_deref()).await?;
    Ok(Json(views.into_iter().map(SessionSummary::from).collect()))
}

/// GET /sessions/latest - Most recently created session
pub(crate) async fn latest_session(
    State(service): State<Arc<PulseService>>,
) -> Result<Json<SessionDetail>, PulseError> {
    Ok(Json(service.latest_session().await?.into()))
}

/// GET /sessions/{id}
pub(crate) async fn get_session(
    State(service): State<Arc<PulseService>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionDetail>, PulseError> {
    Ok(Json(service.get_session(id).await?.into()))
}

/// DELETE /sessions with `{id}` body
pub(crate) async fn delete_session_by_body(
    State(service): State<Arc<PulseService>>,
    payload: Result<Json<DeleteSessionRequest>, JsonRejection>,
) -> Response {
    let id = payload
        .map_err(PulseError::from)
        .and_then(|Json(req)| {
            req.id
                .ok_or_else(|| PulseError::InvalidArgument("Session ID is required.".to_string()))
        })
        .and_then(|input| input.resolve());

    match id {
        Ok(id) => delete_response(&service, id).await,
        Err(err) => delete_failure(&err),
    }
}

/// DELETE /sessions/{id}
pub(crate) async fn delete_session_by_path(
    State(service): State<Arc<PulseService>>,
    Path(id): Path<SessionId>,
) -> Response {
    delete_response(&service, id).await
}

async fn delete_response(service: &PulseService, id: SessionId) -> Response {
    match service.delete_session(id).await {
        Ok(()) => Json(DeleteSessionResponse {
            success: true,
            message: "Session deleted successfully.".to_string(),
        })
        .into_response(),
        Err(err) => delete_failure(&err),
    }
}

/// Delete keeps its `{success, message}` body shape on failure too.
fn delete_failure(err: &PulseError) -> Response {
    if let PulseError::Storage(source) = err {
        tracing::error!(name: "storage.failure", error = %source, "Failed to delete session");
    }
    (
        err.status_code(),
        Json(DeleteSessionResponse {
            success: false,
            message: err.public_message(),
        }),
    )
        .into_response()
}

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::pulse::{error::PulseError, service::PulseService};

/// Fields are optional so a missing one yields our 400 rather than a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SubmitMoodRequest {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitMoodResponse {
    pub message: String,
    pub status: String,
}

/// POST /moods - Submit or update a mood for a session
pub(crate) async fn submit_mood(
    State(service): State<Arc<PulseService>>,
    payload: Result<Json<SubmitMoodRequest>, JsonRejection>,
) -> Result<Json<SubmitMoodResponse>, PulseError> {
    let Json(req) = payload?;
    let outcome = service
        .submit_mood(
            req.title.as_deref(),
            req.user.as_deref(),
            req.mood.as_deref(),
        )
        .await?;

    Ok(Json(SubmitMoodResponse {
        message: outcome.message(),
        status: outcome.status().to_string(),
    }))
}

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use super::{moods, sessions};
use crate::pulse::service::PulseService;

/// REST routes, nested under `/api`.
pub fn build_router() -> Router<Arc<PulseService>> {
    Router::new()
        .route(
            "/sessions",
            get(sessions::list_sessions)
                .post(sessions::create_session)
                .delete(sessions::delete_session_by_body),
        )
        .route("/sessions/latest", get(sessions::latest_session))
        .route(
            "/sessions/{id}",
            get(sessions::get_session).delete(sessions::delete_session_by_path),
        )
        .route("/moods", post(moods::submit_mood))
}

/// Script-style paths the existing frontend still calls.
pub fn build_legacy_router() -> Router<Arc<PulseService>> {
    Router::new()
        .route("/post_training.php", post(sessions::create_session))
        .route("/delete_section.php", delete(sessions::delete_session_by_body))
        .route("/get_training_mood.php", get(sessions::list_sessions))
        .route("/get_latest_training.php", get(sessions::latest_session))
        .route("/post_mood.php", post(moods::submit_mood))
}

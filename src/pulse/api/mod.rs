pub mod moods;
pub mod routes;
pub mod sessions;

use axum::Router;

use crate::pulse::service::PulseService;
use std::sync::Arc;

pub fn router() -> Router<Arc<PulseService>> {
    routes::build_router()
}

pub fn legacy_router() -> Router<Arc<PulseService>> {
    routes::build_legacy_router()
}

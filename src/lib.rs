//! TeamPulse
//!
//! Mood surveys for training sessions: a coach creates sessions, team members
//! submit a fingerprinted `happy` / `sad` / `neutral` mood for the latest one,
//! and the dashboard shows per-session tallies.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP/JSON API with CORS, rate limiting and timeouts
//! - **Reconciliation**: keeps each session's counters equal to its ledger
//! - **Persistence**: Postgres via `sqlx`, or an in-memory store
//!
//! # Modules
//!
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`pulse`]: domain, storage, service and HTTP handlers
//! - [`server`]: router assembly and startup

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod pulse;
pub mod server;

use crate::config::AppConfig;
use crate::pulse::security::rate_limit::AppRateLimiter;
use crate::pulse::service::PulseService;

use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Session and mood operations.
    pub pulse: Arc<PulseService>,
    /// Global Rate Limiter
    pub rate_limiter: Arc<AppRateLimiter>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pulse: Arc<PulseService>, config: Arc<AppConfig>) -> Self {
        let rate_limiter = Arc::new(AppRateLimiter::new(
            config.resilience.requests_per_second,
            config.resilience.burst_size,
        ));
        Self {
            pulse,
            rate_limiter,
            config,
        }
    }
}

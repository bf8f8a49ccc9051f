//! TeamPulse domain, storage and HTTP surface.
//!
//! - [`domain`]: moods, sessions, ledgers and the reconciliation decision
//! - [`persistence`]: the [`persistence::MoodStore`] trait and its providers
//! - [`service`]: validated operations used by the handlers
//! - [`api`]: axum routes

pub mod api;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod security;
pub mod service;
pub mod telemetry;

use crate::pulse::domain::{
    Ledger, MoodOutcome, MoodSubmission, SessionId, SessionView, TrainingSession,
};
use crate::pulse::error::PulseError;
use async_trait::async_trait;

pub mod providers;

/// Storage for training sessions and their interaction ledgers.
///
/// Implementations must keep `happy + sad + neutral` equal to the number of
/// ledger pairs of every session, and must serialize [`MoodStore::reconcile`]
/// calls that target the same session.
#[async_trait]
pub trait MoodStore: Send + Sync + std::fmt::Debug {
    // =========================================================================
    // Session Lifecycle
    // =========================================================================

    /// Insert a session with zeroed counters. `Conflict` if the title exists.
    async fn create_session(&self, title: &str) -> Result<TrainingSession, PulseError>;

    /// Remove a session and its ledger. `NotFound` if absent.
    async fn delete_session(&self, id: SessionId) -> Result<(), PulseError>;

    async fn get_session(&self, id: SessionId) -> Result<Option<TrainingSession>, PulseError>;

    /// Newest session by creation time, highest id on ties.
    async fn latest_session(&self) -> Result<Option<TrainingSession>, PulseError>;

    /// All sessions, newest id first, joined with the viewer's recorded mood.
    async fn list_sessions(&self, viewer: Option<&str>) -> Result<Vec<SessionView>, PulseError>;

    // =========================================================================
    // Interaction Ledger
    // =========================================================================

    /// Apply a submission to the ledger and counters in one atomic step.
    async fn reconcile(&self, submission: &MoodSubmission) -> Result<MoodOutcome, PulseError>;

    /// Ledger of a session; `None` until the first submission.
    async fn ledger(&self, id: SessionId) -> Result<Option<Ledger>, PulseError>;
}

//! Validated entry points over a [`MoodStore`].
//!
//! Handlers call these instead of the store so that input checks (title
//! trimming, mood parsing) always happen before any storage access.

use std::sync::Arc;

use tracing::info;

use crate::pulse::domain::{
    MoodOutcome, MoodSubmission, SessionId, SessionView, TrainingSession, validate_title,
};
use crate::pulse::error::PulseError;
use crate::pulse::persistence::MoodStore;

#[derive(Debug, Clone)]
pub struct PulseService {
    store: Arc<dyn MoodStore>,
}

impl PulseService {
    pub fn new(store: Arc<dyn MoodStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn MoodStore> {
        &self.store
    }

    pub async fn create_session(&self, raw_title: &str) -> Result<TrainingSession, PulseError> {
        let title = validate_title(raw_title)?;
        let session = self.store.create_session(&title).await?;

        info!(
            name: "session.created",
            session_id = session.id,
            title = %session.title,
            "Training session created"
        );
        Ok(session)
    }

    pub async fn delete_session(&self, id: SessionId) -> Result<(), PulseError> {
        self.store.delete_session(id).await?;
        info!(name: "session.deleted", session_id = id, "Training session deleted");
        Ok(())
    }

    pub async fn get_session(&self, id: SessionId) -> Result<TrainingSession, PulseError> {
        self.store
            .get_session(id)
            .await?
            .ok_or_else(|| PulseError::NotFound(format!("Session {id} not found")))
    }

    pub async fn latest_session(&self) -> Result<TrainingSession, PulseError> {
        self.store
            .latest_session()
            .await?
            .ok_or_else(|| PulseError::NotFound("No training session found".to_string()))
    }

    /// Sessions for the dashboard. A blank viewer counts as anonymous.
    pub async fn list_sessions(&self, viewer: Option<&str>) -> Result<Vec<SessionView>, PulseError> {
        let viewer = viewer.filter(|v| !v.is_empty());
        self.store.list_sessions(viewer).await
    }

    pub async fn submit_mood(
        &self,
        title: Option<&str>,
        submitter: Option<&str>,
        mood: Option<&str>,
    ) -> Result<MoodOutcome, PulseError> {
        let submission = MoodSubmission::parse(title, submitter, mood)?;
        let outcome = self.store.reconcile(&submission).await?;

        info!(
            name: "mood.reconciled",
            title = %submission.title,
            status = outcome.status(),
            mood = %outcome.current(),
            "Mood reconciled"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::domain::Mood;
    use crate::pulse::persistence::providers::memory::MemoryStore;

    fn service() -> PulseService {
        PulseService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_create_trims_and_rejects_blank_titles() {
        let svc = service();
        let session = svc.create_session("  Warmup  ").await.unwrap();
        assert_eq!(session.title, "Warmup");

        let err = svc.create_session("   ").await.unwrap_err();
        assert!(matches!(err, PulseError::InvalidArgument(_)));

        let err = svc.create_session("Warmup").await.unwrap_err();
        assert!(matches!(err, PulseError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_mood_never_reaches_storage() {
        let svc = service();
        let session = svc.create_session("Warmup").await.unwrap();

        let err = svc
            .submit_mood(Some("Warmup"), Some("fp-1"), Some("angry"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::InvalidArgument(_)));

        assert!(svc.store().ledger(session.id).await.unwrap().is_none());
        assert_eq!(svc.get_session(session.id).await.unwrap().counts.total(), 0);
    }

    #[tokio::test]
    async fn test_invalid_mood_wins_over_unknown_title() {
        let svc = service();
        let err = svc
            .submit_mood(Some("Missing"), Some("fp-1"), Some("angry"))
            .await
            .unwrap_err();
        assert!(matches!(err, PulseError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_submit_change_flow() {
        let svc = service();
        let session = svc.create_session("Retro").await.unwrap();

        let first = svc
            .submit_mood(Some("Retro"), Some("fp-1"), Some("happy"))
            .await
            .unwrap();
        assert_eq!(first, MoodOutcome::Submitted { mood: Mood::Happy });

        let changed = svc
            .submit_mood(Some("Retro"), Some("fp-1"), Some("sad"))
            .await
            .unwrap();
        assert_eq!(
            changed,
            MoodOutcome::Changed {
                from: Mood::Happy,
                to: Mood::Sad
            }
        );

        let counts = svc.get_session(session.id).await.unwrap().counts;
        assert_eq!((counts.happy, counts.sad, counts.neutral), (0, 1, 0));
    }

    #[tokio::test]
    async fn test_blank_viewer_is_anonymous() {
        let svc = service();
        svc.create_session("Retro").await.unwrap();
        svc.submit_mood(Some("Retro"), Some(""), Some("happy"))
            .await
            .unwrap_err();

        let views = svc.list_sessions(Some("")).await.unwrap();
        assert_eq!(views.len(), 1);
        assert!(!views[0].has_interacted());
    }

    #[tokio::test]
    async fn test_latest_and_get_not_found() {
        let svc = service();
        assert!(matches!(
            svc.latest_session().await,
            Err(PulseError::NotFound(_))
        ));
        assert!(matches!(
            svc.get_session(42).await,
            Err(PulseError::NotFound(_))
        ));
    }
}

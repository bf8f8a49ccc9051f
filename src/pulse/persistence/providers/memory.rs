//! In-process store for tests and local demos.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::pulse::domain::{
    Ledger, MoodCounts, MoodOutcome, MoodSubmission, SessionId, SessionView, TrainingSession,
};
use crate::pulse::error::PulseError;
use crate::pulse::persistence::MoodStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: SessionId,
    sessions: BTreeMap<SessionId, TrainingSession>,
    titles: HashMap<String, SessionId>,
    ledgers: HashMap<SessionId, Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MoodStore for MemoryStore {
    async fn create_session(&self, title: &str) -> Result<TrainingSession, PulseError> {
        let mut state = self.state.write().await;
        if state.titles.contains_key(title) {
            return Err(PulseError::Conflict(format!(
                "Training session '{title}' already exists"
            )));
        }

        state.next_id += 1;
        let session = TrainingSession {
            id: state.next_id,
            title: title.to_string(),
            created_at: Utc::now(),
            counts: MoodCounts::default(),
        };
        state.titles.insert(session.title.clone(), session.id);
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), PulseError> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .remove(&id)
            .ok_or_else(|| PulseError::NotFound(format!("Session {id} not found")))?;
        state.titles.remove(&session.title);
        state.ledgers.remove(&id);
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<TrainingSession>, PulseError> {
        Ok(self.state.read().await.sessions.get(&id).cloned())
    }

    async fn latest_session(&self) -> Result<Option<TrainingSession>, PulseError> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .values()
            .max_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn list_sessions(&self, viewer: Option<&str>) -> Result<Vec<SessionView>, PulseError> {
        let state = self.state.read().await;
        let views = state
            .sessions
            .values()
            .rev()
            .map(|session| {
                let viewer_mood = viewer.and_then(|who| {
                    state
                        .ledgers
                        .get(&session.id)
                        .and_then(|ledger| ledger.mood_of(who))
                });
                SessionView {
                    session: session.clone(),
                    viewer_mood,
                }
            })
            .collect();
        Ok(views)
    }

    async fn reconcile(&self, submission: &MoodSubmission) -> Result<MoodOutcome, PulseError> {
        // The write guard spans lookup, ledger update and counter update.
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let session_id = *state.titles.get(&submission.title).ok_or_else(|| {
            PulseError::NotFound(format!(
                "Training session '{}' not found",
                submission.title
            ))
        })?;
        let session = state.sessions.get_mut(&session_id).ok_or_else(|| {
            PulseError::NotFound(format!("Session {session_id} not found"))
        })?;

        let outcome = state
            .ledgers
            .entry(session_id)
            .or_insert_with(|| Ledger::new(session_id))
            .record(&submission.submitter, submission.mood);
        session.counts.apply(&outcome);

        Ok(outcome)
    }

    async fn ledger(&self, id: SessionId) -> Result<Option<Ledger>, PulseError> {
        Ok(self.state.read().await.ledgers.get(&id).cloned())
    }
}

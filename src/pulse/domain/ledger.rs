use serde::{Deserialize, Serialize};

use super::mood::Mood;
use super::reconcile::MoodOutcome;
use super::session::SessionId;

/// One submitter's current mood in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPair {
    pub submitter: String,
    pub mood: Mood,
}

/// Per-session record of who voted and what they currently feel.
///
/// Pairs keep insertion order; there is at most one pair per submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub session_id: SessionId,
    pairs: Vec<LedgerPair>,
}

impl Ledger {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            pairs: Vec::new(),
        }
    }

    /// Rebuild from stored pairs, already in insertion order.
    pub fn from_pairs(session_id: SessionId, pairs: Vec<LedgerPair>) -> Self {
        Self { session_id, pairs }
    }

    pub fn pairs(&self) -> &[LedgerPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn mood_of(&self, submitter: &str) -> Option<Mood> {
        self.pairs
            .iter()
            .find(|p| p.submitter == submitter)
            .map(|p| p.mood)
    }

    /// Record a mood and report what changed.
    pub fn record(&mut self, submitter: &str, mood: Mood) -> MoodOutcome {
        match self.pairs.iter().position(|p| p.submitter == submitter) {
            Some(idx) => {
                let pair = &mut self.pairs[idx];
                let outcome = MoodOutcome::decide(Some(pair.mood), mood);
                pair.mood = mood;
                outcome
            }
            None => {
                self.pairs.push(LedgerPair {
                    submitter: submitter.to_string(),
                    mood,
                });
                MoodOutcome::decide(None, mood)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_then_overwrites_in_place() {
        let mut ledger = Ledger::new(7);
        assert!(ledger.is_empty());

        assert_eq!(ledger.record("a", Mood::Happy).status(), "submitted");
        assert_eq!(ledger.record("b", Mood::Neutral).status(), "submitted");
        assert_eq!(ledger.record("a", Mood::Sad).status(), "changed");
        assert_eq!(ledger.record("a", Mood::Sad).status(), "unchanged");

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.pairs()[0].submitter, "a");
        assert_eq!(ledger.pairs()[0].mood, Mood::Sad);
        assert_eq!(ledger.mood_of("b"), Some(Mood::Neutral));
        assert_eq!(ledger.mood_of("c"), None);
    }
}

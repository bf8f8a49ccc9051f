use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mood::Mood;
use super::reconcile::MoodOutcome;
use crate::pulse::error::PulseError;

pub type SessionId = i64;

/// Per-mood vote counters of a training session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCounts {
    pub happy: i64,
    pub sad: i64,
    pub neutral: i64,
}

impl MoodCounts {
    pub fn get(&self, mood: Mood) -> i64 {
        match mood {
            Mood::Happy => self.happy,
            Mood::Sad => self.sad,
            Mood::Neutral => self.neutral,
        }
    }

    fn slot(&mut self, mood: Mood) -> &mut i64 {
        match mood {
            Mood::Happy => &mut self.happy,
            Mood::Sad => &mut self.sad,
            Mood::Neutral => &mut self.neutral,
        }
    }

    pub fn total(&self) -> i64 {
        self.happy + self.sad + self.neutral
    }

    /// Apply the counter deltas of a reconciliation outcome.
    pub fn apply(&mut self, outcome: &MoodOutcome) {
        if let Some(mood) = outcome.decremented() {
            *self.slot(mood) -= 1;
        }
        if let Some(mood) = outcome.incremented() {
            *self.slot(mood) += 1;
        }
    }
}

/// A named unit a team can leave mood feedback on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSession {
    pub id: SessionId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub counts: MoodCounts,
}

/// A session as seen by one viewer on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub session: TrainingSession,
    /// Mood the viewer recorded for this session, if any.
    pub viewer_mood: Option<Mood>,
}

impl SessionView {
    pub fn has_interacted(&self) -> bool {
        self.viewer_mood.is_some()
    }
}

/// Trim a raw title and reject empty ones.
pub fn validate_title(raw: &str) -> Result<String, PulseError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(PulseError::InvalidArgument("Title is required".to_string()));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_outcomes() {
        let mut counts = MoodCounts::default();

        counts.apply(&MoodOutcome::Submitted { mood: Mood::Happy });
        counts.apply(&MoodOutcome::Submitted { mood: Mood::Happy });
        assert_eq!(counts.get(Mood::Happy), 2);

        counts.apply(&MoodOutcome::Changed {
            from: Mood::Happy,
            to: Mood::Sad,
        });
        assert_eq!(
            counts,
            MoodCounts {
                happy: 1,
                sad: 1,
                neutral: 0
            }
        );

        counts.apply(&MoodOutcome::Unchanged { mood: Mood::Sad });
        assert_eq!(counts.total(), 2);
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Warmup ").unwrap(), "Warmup");
        assert!(matches!(
            validate_title("   "),
            Err(PulseError::InvalidArgument(_))
        ));
    }
}

//! Mood reconciliation.
//!
//! A submission either records a first mood, repeats the current one, or
//! switches to a different one. The decision here is pure: providers load the
//! previous mood under their own lock, call [`MoodOutcome::decide`], and apply
//! the resulting ledger write and counter deltas in the same commit.

use serde::Serialize;

use super::mood::Mood;
use crate::pulse::error::PulseError;

/// A validated mood submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSubmission {
    pub title: String,
    pub submitter: String,
    pub mood: Mood,
}

impl MoodSubmission {
    /// Validate raw request fields.
    ///
    /// The mood is checked before anything else touches storage.
    pub fn parse(
        title: Option<&str>,
        submitter: Option<&str>,
        mood: Option<&str>,
    ) -> Result<Self, PulseError> {
        let (Some(title), Some(submitter), Some(mood)) = (
            title.filter(|s| !s.is_empty()),
            submitter.filter(|s| !s.is_empty()),
            mood.filter(|s| !s.is_empty()),
        ) else {
            return Err(PulseError::InvalidArgument(
                "Missing user, mood, or title".to_string(),
            ));
        };

        Ok(Self {
            title: title.to_string(),
            submitter: submitter.to_string(),
            mood: mood.parse()?,
        })
    }
}

/// Result of reconciling one submission against the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MoodOutcome {
    /// First mood from this submitter.
    Submitted { mood: Mood },
    /// Same mood as already recorded.
    Unchanged { mood: Mood },
    /// Recorded mood replaced.
    Changed { from: Mood, to: Mood },
}

impl MoodOutcome {
    pub fn decide(previous: Option<Mood>, next: Mood) -> Self {
        match previous {
            None => MoodOutcome::Submitted { mood: next },
            Some(prev) if prev == next => MoodOutcome::Unchanged { mood: next },
            Some(prev) => MoodOutcome::Changed {
                from: prev,
                to: next,
            },
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            MoodOutcome::Submitted { .. } => "submitted",
            MoodOutcome::Unchanged { .. } => "unchanged",
            MoodOutcome::Changed { .. } => "changed",
        }
    }

    pub fn message(&self) -> String {
        match self {
            MoodOutcome::Submitted { .. } => "Mood submitted".to_string(),
            MoodOutcome::Unchanged { .. } => "No change — same mood".to_string(),
            MoodOutcome::Changed { from, to } => format!("Mood updated from {from} to {to}"),
        }
    }

    /// Counter that goes up by one, if any.
    pub fn incremented(&self) -> Option<Mood> {
        match self {
            MoodOutcome::Submitted { mood } => Some(*mood),
            MoodOutcome::Changed { to, .. } => Some(*to),
            MoodOutcome::Unchanged { .. } => None,
        }
    }

    /// Counter that goes down by one, if any.
    pub fn decremented(&self) -> Option<Mood> {
        match self {
            MoodOutcome::Changed { from, .. } => Some(*from),
            _ => None,
        }
    }

    /// Mood the submitter holds after this outcome.
    pub fn current(&self) -> Mood {
        match self {
            MoodOutcome::Submitted { mood } | MoodOutcome::Unchanged { mood } => *mood,
            MoodOutcome::Changed { to, .. } => *to,
        }
    }
}

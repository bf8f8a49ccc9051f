use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::pulse::error::PulseError;

/// One of the three moods a team member can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 3] = [Mood::Happy, Mood::Sad, Mood::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
        }
    }

    /// Name of the counter column tracking this mood.
    ///
    /// Always a fixed identifier, so it can be spliced into SQL.
    pub fn counter_column(self) -> &'static str {
        match self {
            Mood::Happy => "happy_count",
            Mood::Sad => "sad_count",
            Mood::Neutral => "neutral_count",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "neutral" => Ok(Mood::Neutral),
            other => Err(PulseError::InvalidArgument(format!("Invalid mood '{other}'"))),
        }
    }
}

pub mod ledger;
pub mod mood;
pub mod reconcile;
pub mod session;

pub use ledger::{Ledger, LedgerPair};
pub use mood::Mood;
pub use reconcile::{MoodOutcome, MoodSubmission};
pub use session::{MoodCounts, SessionId, SessionView, TrainingSession, validate_title};

use crate::pulse::domain::{
    Ledger, LedgerPair, Mood, MoodCounts, MoodOutcome, MoodSubmission, SessionId, SessionView,
    TrainingSession,
};
use crate::pulse::error::PulseError;
use crate::pulse::persistence::MoodStore;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

const SESSION_COLUMNS: &str = "id, title, time_stamp, happy_count, sad_count, neutral_count";

#[derive(Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(connection_string: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(connection_string)
            .await?;

        // Run Migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

fn session_from_row(row: &PgRow) -> Result<TrainingSession, sqlx::Error> {
    Ok(TrainingSession {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        created_at: row.try_get("time_stamp")?,
        counts: MoodCounts {
            happy: row.try_get("happy_count")?,
            sad: row.try_get("sad_count")?,
            neutral: row.try_get("neutral_count")?,
        },
    })
}

fn stored_mood(raw: &str) -> Result<Mood, PulseError> {
    raw.parse().map_err(|e: PulseError| {
        PulseError::Storage(sqlx::Error::Decode(
            format!("ledger holds unexpected mood: {e}").into(),
        ))
    })
}

/// `SET` clause moving the counters for an outcome, or `None` when nothing moves.
fn counter_assignments(outcome: &MoodOutcome) -> Option<String> {
    let mut parts = Vec::with_capacity(2);
    if let Some(mood) = outcome.decremented() {
        let col = mood.counter_column();
        parts.push(format!("{col} = {col} - 1"));
    }
    if let Some(mood) = outcome.incremented() {
        let col = mood.counter_column();
        parts.push(format!("{col} = {col} + 1"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

#[async_trait]
impl MoodStore for PostgresStore {
    async fn create_session(&self, title: &str) -> Result<TrainingSession, PulseError> {
        let result = sqlx::query(&format!(
            "INSERT INTO training_sessions (title) VALUES ($1) RETURNING {SESSION_COLUMNS}"
        ))
        .bind(title)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(session_from_row(&row)?),
            Err(err) => {
                // Unique constraint on title; no check-then-insert window.
                if let sqlx::Error::Database(db) = &err
                    && db.is_unique_violation()
                {
                    return Err(PulseError::Conflict(format!(
                        "Training session '{title}' already exists"
                    )));
                }
                Err(err.into())
            }
        }
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), PulseError> {
        // Ledger rows go with it via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PulseError::NotFound(format!("Session {id} not found")));
        }
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<TrainingSession>, PulseError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(session_from_row).transpose()?)
    }

    async fn latest_session(&self) -> Result<Option<TrainingSession>, PulseError> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM training_sessions ORDER BY time_stamp DESC, id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(session_from_row).transpose()?)
    }

    async fn list_sessions(&self, viewer: Option<&str>) -> Result<Vec<SessionView>, PulseError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id, s.title, s.time_stamp, s.happy_count, s.sad_count, s.neutral_count,
                   i.mood AS viewer_mood
            FROM training_sessions s
            LEFT JOIN session_interactions i
                ON i.session_id = s.id AND i.submitter = $1
            ORDER BY s.id DESC
            "#,
        )
        .bind(viewer)
        .fetch_all(&self.pool)
        .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let viewer_mood: Option<String> = row.try_get("viewer_mood")?;
            views.push(SessionView {
                session: session_from_row(&row)?,
                viewer_mood: viewer_mood.as_deref().map(stored_mood).transpose()?,
            });
        }
        Ok(views)
    }

    async fn reconcile(&self, submission: &MoodSubmission) -> Result<MoodOutcome, PulseError> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await?;

        // Row lock on the session serializes concurrent submissions to it.
        let session_id: Option<SessionId> =
            sqlx::query_scalar("SELECT id FROM training_sessions WHERE title = $1 FOR UPDATE")
                .bind(&submission.title)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(session_id) = session_id else {
            return Err(PulseError::NotFound(format!(
                "Training session '{}' not found",
                submission.title
            )));
        };

        let previous: Option<String> = sqlx::query_scalar(
            "SELECT mood FROM session_interactions WHERE session_id = $1 AND submitter = $2",
        )
        .bind(session_id)
        .bind(&submission.submitter)
        .fetch_optional(&mut *tx)
        .await?;
        let previous = previous.as_deref().map(stored_mood).transpose()?;

        let outcome = MoodOutcome::decide(previous, submission.mood);

        match outcome {
            MoodOutcome::Submitted { mood } => {
                sqlx::query(
                    "INSERT INTO session_interactions (session_id, submitter, mood) VALUES ($1, $2, $3)",
                )
                .bind(session_id)
                .bind(&submission.submitter)
                .bind(mood.as_str())
                .execute(&mut *tx)
                .await?;
            }
            MoodOutcome::Changed { to, .. } => {
                sqlx::query(
                    "UPDATE session_interactions SET mood = $3 WHERE session_id = $1 AND submitter = $2",
                )
                .bind(session_id)
                .bind(&submission.submitter)
                .bind(to.as_str())
                .execute(&mut *tx)
                .await?;
            }
            MoodOutcome::Unchanged { .. } => {}
        }

        if let Some(assignments) = counter_assignments(&outcome) {
            sqlx::query(&format!(
                "UPDATE training_sessions SET {assignments} WHERE id = $1"
            ))
            .bind(session_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(outcome)
    }

    async fn ledger(&self, id: SessionId) -> Result<Option<Ledger>, PulseError> {
        let rows = sqlx::query(
            "SELECT submitter, mood FROM session_interactions WHERE session_id = $1 ORDER BY seq",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let mut pairs = Vec::with_capacity(rows.len());
        for row in rows {
            let mood: String = row.try_get("mood")?;
            pairs.push(LedgerPair {
                submitter: row.try_get("submitter")?,
                mood: stored_mood(&mood)?,
            });
        }
        Ok(Some(Ledger::from_pairs(id, pairs)))
    }
}

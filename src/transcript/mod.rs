//! Persistence for session transcripts and end-of-session summaries.
//! Both live in the same SQLite database, one table each, behind a
//! single `TranscriptStore`.

mod db;
pub mod models;

use anyhow::Result;
use thiserror::Error;
use tokio_rusqlite::Connection;

pub use models::{Scores, SummaryRecord, TranscriptRecord};

use crate::core::db::{async_db, initialize_db};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Summary already exists for session {0}")]
    DuplicateSummary(String),

    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Cheap to clone. Every clone talks to the same connection which
/// runs queries on its own background thread.
#[derive(Clone)]
pub struct TranscriptStore {
    db: Connection,
}

impl TranscriptStore {
    pub fn new(db: Connection) -> Self {
        Self { db }
    }

    /// Open the database file at `db_path`. Call `init` before use.
    pub async fn open(db_path: &str) -> Result<Self> {
        let db = async_db(db_path).await?;
        Ok(Self::new(db))
    }

    /// Create the schema if it doesn't already exist.
    pub async fn init(&self) -> Result<(), StoreError> {
        self.db
            .call(|conn| {
                initialize_db(conn)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Append one message to a session's transcript.
    pub async fn record(
        &self,
        session_id: &str,
        turn_index: i64,
        sender: &str,
        message: &str,
    ) -> Result<i64, StoreError> {
        db::insert_interaction(&self.db, session_id, turn_index, sender, message).await
    }

    /// Save the summary for a session. Fails with
    /// `StoreError::DuplicateSummary` if the session already has one.
    pub async fn save_summary(
        &self,
        session_id: &str,
        dominant_trait: &str,
        scores: &Scores,
    ) -> Result<i64, StoreError> {
        let id = db::insert_summary(&self.db, session_id, dominant_trait, scores).await?;
        tracing::info!(session_id, dominant_trait, "Summary saved");
        Ok(id)
    }

    pub async fn find_interactions(
        &self,
        session_id: &str,
    ) -> Result<Vec<TranscriptRecord>, StoreError> {
        db::find_interactions_by_session(&self.db, session_id).await
    }

    pub async fn find_summary(&self, session_id: &str) -> Result<Option<SummaryRecord>, StoreError> {
        db::find_summary_by_session(&self.db, session_id).await
    }
}

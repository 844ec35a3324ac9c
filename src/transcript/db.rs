use rusqlite::OptionalExtension;
use tokio_rusqlite::{Connection, params};

use super::StoreError;
use super::models::{Scores, SummaryRecord, TranscriptRecord};

pub async fn insert_interaction(
    db: &Connection,
    session_id: &str,
    turn_index: i64,
    sender: &str,
    message: &str,
) -> Result<i64, StoreError> {
    let s_id = session_id.to_owned();
    let sender = sender.to_owned();
    let message = message.to_owned();
    let id = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO interactions (session_id, turn, sender, message) VALUES (?, ?, ?, ?)",
            )?;
            let id = stmt.insert(params![s_id, turn_index, sender, message])?;
            Ok(id)
        })
        .await?;

    Ok(id)
}

pub async fn insert_summary(
    db: &Connection,
    session_id: &str,
    dominant_trait: &str,
    scores: &Scores,
) -> Result<i64, StoreError> {
    let s_id = session_id.to_owned();
    let dominant_trait = dominant_trait.to_owned();
    let scores_json = serde_json::to_string(scores)?;
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO summaries (session_id, dominant_trait, scores) VALUES (?, ?, ?)",
            )?;
            let id = stmt.insert(params![s_id, dominant_trait, scores_json])?;
            Ok(id)
        })
        .await;

    // `session_id` is UNIQUE so a second summary for the same
    // session is rejected rather than overwriting the first
    match result {
        Ok(id) => Ok(id),
        Err(tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _)))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Err(StoreError::DuplicateSummary(session_id.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_interactions_by_session(
    db: &Connection,
    session_id: &str,
) -> Result<Vec<TranscriptRecord>, StoreError> {
    let s_id = session_id.to_owned();
    let records = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, session_id, turn, sender, message, timestamp
                FROM interactions
                WHERE session_id = ?
                ORDER BY turn, id
                "#,
            )?;
            let rows = stmt
                .query_map([s_id], |row| {
                    Ok(TranscriptRecord {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        turn_index: row.get(2)?,
                        sender: row.get(3)?,
                        message: row.get(4)?,
                        timestamp: row.get(5)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await?;

    Ok(records)
}

pub async fn find_summary_by_session(
    db: &Connection,
    session_id: &str,
) -> Result<Option<SummaryRecord>, StoreError> {
    let s_id = session_id.to_owned();
    let row = db
        .call(move |conn| {
            let row = conn
                .query_row(
                    r#"
                    SELECT id, session_id, dominant_trait, scores, timestamp
                    FROM summaries
                    WHERE session_id = ?
                    "#,
                    [s_id],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await?;

    let Some((id, session_id, dominant_trait, scores, timestamp)) = row else {
        return Ok(None);
    };

    Ok(Some(SummaryRecord {
        id,
        session_id,
        dominant_trait,
        scores: serde_json::from_str(&scores)?,
        timestamp,
    }))
}

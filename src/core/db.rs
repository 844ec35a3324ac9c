use std::fs;
use std::path::Path;

use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open (creating if needed) the SQLite database at `db_path`. Parent
/// directories are created so a fresh checkout can run `serve`
/// without a separate setup step.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let db = Connection::open(db_path).await?;
    Ok(db)
}

/// Create every table the app needs. Safe to run repeatedly.
pub fn initialize_db(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS interactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT NOT NULL,
            turn INTEGER NOT NULL,
            sender TEXT NOT NULL,
            message TEXT NOT NULL,
            timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS interactions_session_id
            ON interactions (session_id);

        CREATE TABLE IF NOT EXISTS summaries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id TEXT NOT NULL UNIQUE,
            dominant_trait TEXT NOT NULL,
            -- JSON object of trait name to score
            scores TEXT NOT NULL,
            timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
}

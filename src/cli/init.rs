use anyhow::{Result, anyhow};

use crate::transcript::TranscriptStore;

pub async fn run(db: bool, db_path: &str) -> Result<()> {
    if !db {
        return Err(anyhow!("Missing value for init \"--db\""));
    }

    println!("Initializing db at {}...", db_path);
    let store = TranscriptStore::open(db_path).await?;
    store.init().await?;
    println!("Finished initializing db");

    Ok(())
}

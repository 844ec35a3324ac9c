use std::fs;

use anyhow::Result;
use reqwest::Client;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::core::AppConfig;
use crate::providers;
use crate::relay::prompt::Profile;
use crate::relay::{self, ConversationTurn, RelayRequest, Role};
use crate::transcript::TranscriptStore;

fn load_profile(path: &str) -> Result<Profile> {
    let profile = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(profile)
}

fn system_prompt(config: &AppConfig, profile: Option<&Profile>) -> String {
    match profile {
        Some(profile) => profile.system_prompt(),
        None => config.system_prompt.clone(),
    }
}

/// Show the profile's feedback for the session's dominant trait once
/// a summary has been saved for it.
async fn print_feedback(store: &TranscriptStore, session_id: &str, profile: &Profile) {
    let summary = match store.find_summary(session_id).await {
        Ok(Some(summary)) => summary,
        Ok(None) => return,
        Err(e) => {
            eprintln!("Failed to read summary: {}", e);
            return;
        }
    };

    if let Some(feedback) = profile.feedback_for(&summary.dominant_trait) {
        println!("{} Your Dominant Trait: {}", feedback.icon, feedback.title);
        println!("Psychological Profile: {}", feedback.profile);
        println!("You are prepared for: {}", feedback.scenarios);
    }
}

pub async fn run(profile: Option<String>, session_id: Option<String>) -> Result<()> {
    let config = AppConfig::from_env()?;
    let profile = profile.as_deref().map(load_profile).transpose()?;
    let system_prompt = system_prompt(&config, profile.as_ref());
    let provider = providers::from_config(&config)?;
    let client = Client::new();

    let store = TranscriptStore::open(&config.db_path).await?;
    store.init().await?;
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    println!("Session {} using {}", session_id, config.provider);

    let mut rl = DefaultEditor::new()?;
    let mut history: Vec<ConversationTurn> = Vec::new();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                history.push(ConversationTurn::new(Role::User, &line));
                let request = RelayRequest::new(history.clone(), &system_prompt)?;

                match relay::interact(provider.as_ref(), &client, &request).await {
                    Ok(reply) => {
                        println!("{}", reply);

                        let turn_index = history.len() as i64 - 1;
                        if let Err(e) = store
                            .record(&session_id, turn_index, Role::User.as_str(), &line)
                            .await
                        {
                            eprintln!("Failed to record transcript: {}", e);
                        }
                        if let Err(e) = store
                            .record(&session_id, turn_index + 1, Role::Assistant.as_str(), &reply)
                            .await
                        {
                            eprintln!("Failed to record transcript: {}", e);
                        }

                        history.push(ConversationTurn::new(Role::Assistant, &reply));
                    }
                    Err(e) => {
                        // Drop the failed turn so it can be retried
                        history.pop();
                        eprintln!("{} ({})", e.public_message(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(profile) = &profile {
        print_feedback(&store, &session_id, profile).await;
    }

    Ok(())
}

//! Prompt templates using Handlebars. Strict mode is on so a missing
//! field fails loudly instead of rendering an empty string, and HTML
//! escaping is turned off since the output goes to a model, not a
//! browser.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, anyhow};
use handlebars::{Handlebars, no_escape};
use serde::{Deserialize, Serialize};

use super::{ConversationTurn, RelayRequest, Role};

const DEFAULT_PERSONA: &str = "You are a helpful AI.";

#[derive(Debug)]
pub enum Prompt {
    LocalConversation,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Local models get the whole conversation flattened into one block
// of text, ending with the assistant's label so the model continues
// as the assistant.
const LOCAL_CONVERSATION_PROMPT: &str = "System Instruction: {{system_prompt}}

Conversation History:
{{#each turns}}{{label}}: {{text}}
{{/each}}{{assistant_label}}:";

#[derive(Serialize)]
struct PromptTurn<'a> {
    label: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct LocalConversation<'a> {
    system_prompt: &'a str,
    turns: Vec<PromptTurn<'a>>,
    assistant_label: &'a str,
}

pub fn templates<'a>() -> Result<Handlebars<'a>> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(no_escape);
    registry
        .register_template_string(
            &Prompt::LocalConversation.to_string(),
            LOCAL_CONVERSATION_PROMPT,
        )
        .map_err(|e| anyhow!("Failed to register template: {}", e))?;
    Ok(registry)
}

/// Display name for a turn's author. The raw role token never appears
/// in the prompt.
pub fn role_label<'a>(turn: &ConversationTurn, assistant_name: &'a str) -> &'a str {
    match turn.role {
        Role::User => "User",
        Role::Assistant => assistant_name,
    }
}

pub fn render_local_conversation(
    registry: &Handlebars,
    request: &RelayRequest,
    assistant_name: &str,
) -> Result<String> {
    let turns = request
        .history()
        .iter()
        .map(|turn| PromptTurn {
            label: role_label(turn, assistant_name),
            text: &turn.text,
        })
        .collect();
    let data = LocalConversation {
        system_prompt: request.system_prompt(),
        turns,
        assistant_label: assistant_name,
    };

    registry
        .render(&Prompt::LocalConversation.to_string(), &data)
        .map_err(|e| anyhow!("Failed to render {} prompt: {}", Prompt::LocalConversation, e))
}

/// What to show the user when a trait ends up dominant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feedback {
    pub icon: String,
    pub title: String,
    pub profile: String,
    pub scenarios: String,
}

/// A persona definition loaded from JSON, used to build a system
/// prompt and the end-of-session feedback.
///
/// ```json
/// {
///   "persona": "You are Kai.",
///   "rules": ["Be brief.", "Ask one question."],
///   "feedback": {"LOGIC": {"icon": "🧠", "title": "The Analyst", "profile": "...", "scenarios": "..."}}
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    // Keyed by trait name e.g. "LOGIC"
    #[serde(default)]
    pub feedback: BTreeMap<String, Feedback>,
}

impl Profile {
    pub fn system_prompt(&self) -> String {
        let persona = self.persona.as_deref().unwrap_or(DEFAULT_PERSONA);
        format!("{}\n\nFollow these rules:\n{}", persona, self.rules.join("\n"))
    }

    /// Feedback for `dominant_trait`, matched case-insensitively.
    pub fn feedback_for(&self, dominant_trait: &str) -> Option<&Feedback> {
        self.feedback
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(dominant_trait))
            .map(|(_, feedback)| feedback)
    }
}

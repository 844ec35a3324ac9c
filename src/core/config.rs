use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Error, Result, anyhow};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are Kai, an AI for a short, reflective experience. Guide the user through a 6-turn conversation. On your 6th response, provide a concluding thought and end with the specific token [END_SESSION]. Sometimes, offer choices in the format [CHOICE: Option 1 | Option 2].";

/// Which LLM provider the relay forwards conversations to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" | "local" => Ok(ProviderKind::Ollama),
            "gemini" | "cloud" => Ok(ProviderKind::Gemini),
            other => Err(anyhow!(
                "Unknown provider \"{}\", expected \"ollama\" or \"gemini\"",
                other
            )),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub provider: ProviderKind,
    pub ollama_api_hostname: String,
    pub ollama_model: String,
    pub gemini_api_hostname: String,
    pub gemini_model: String,
    pub gemini_api_key: String,
    // Applied to every harm category when set e.g. "BLOCK_ONLY_HIGH"
    pub gemini_safety_threshold: Option<String>,
    pub assistant_name: String,
    pub db_path: String,
    pub system_prompt: String,
}

impl AppConfig {
    /// Assemble the config from environment variables. Called once at
    /// startup and then passed into whatever needs it. Credentials are
    /// checked when the provider is constructed so commands that never
    /// talk to a provider don't need them.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let provider = var("KAI_PROVIDER", "ollama").parse::<ProviderKind>()?;
        let ollama_api_hostname = var("KAI_OLLAMA_HOST", "http://127.0.0.1:11434");
        let ollama_model = var("KAI_OLLAMA_MODEL", "llama3:8b");
        let gemini_api_hostname = var(
            "KAI_GEMINI_HOST",
            "https://generativelanguage.googleapis.com/v1beta",
        );
        let gemini_model = var("KAI_GEMINI_MODEL", "gemini-2.5-flash-preview-05-20");
        let gemini_api_key = var("GEMINI_API_KEY", "");
        let gemini_safety_threshold =
            lookup("KAI_GEMINI_SAFETY_THRESHOLD").filter(|s| !s.trim().is_empty());
        let assistant_name = var("KAI_ASSISTANT_NAME", "Kai");
        let db_path = var("KAI_DB_PATH", "./data/reflection.db");
        let system_prompt = var("KAI_SYSTEM_PROMPT", DEFAULT_SYSTEM_PROMPT);

        Ok(Self {
            provider,
            ollama_api_hostname,
            ollama_model,
            gemini_api_hostname,
            gemini_model,
            gemini_api_key,
            gemini_safety_threshold,
            assistant_name,
            db_path,
            system_prompt,
        })
    }
}

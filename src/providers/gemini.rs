//! Google's Gemini `generateContent` API. Gemini takes multi-turn
//! conversations natively so each turn is passed through as its own
//! entry with the system prompt in a separate field.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Provider;
use crate::relay::{RelayError, RelayRequest, Role};

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: SystemInstruction<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SystemInstruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct SafetySetting<'a> {
    category: &'a str,
    threshold: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    code: u16,
    message: String,
}

fn gemini_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

pub struct GeminiProvider {
    api_hostname: String,
    model: String,
    api_key: String,
    safety_threshold: Option<String>,
}

impl GeminiProvider {
    pub fn new(
        api_hostname: &str,
        model: &str,
        api_key: &str,
        safety_threshold: Option<&str>,
    ) -> Result<Self> {
        if api_key.is_empty() {
            bail!("Missing Gemini API key, set GEMINI_API_KEY");
        }
        Ok(Self {
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            safety_threshold: safety_threshold.map(String::from),
        })
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn post(&self, client: &Client) -> RequestBuilder {
        let url = format!("{}/models/{}:generateContent", self.api_hostname, self.model);
        client.post(url).query(&[("key", &self.api_key)])
    }

    fn payload(&self, request: &RelayRequest) -> Result<Value, RelayError> {
        let contents: Vec<Content> = request
            .history()
            .iter()
            .map(|turn| Content {
                role: gemini_role(turn.role),
                parts: vec![Part { text: &turn.text }],
            })
            .collect();
        let safety_settings: Vec<SafetySetting> = self
            .safety_threshold
            .as_deref()
            .map(|threshold| {
                HARM_CATEGORIES
                    .into_iter()
                    .map(|category| SafetySetting {
                        category,
                        threshold,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let body = GenerateContentRequest {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![Part {
                    text: request.system_prompt(),
                }],
            },
            safety_settings,
        };

        serde_json::to_value(&body).map_err(|e| RelayError::Internal(e.into()))
    }

    fn extract_text<'a>(&self, response: &'a Value) -> Option<&'a str> {
        let text = response["candidates"][0]["content"]["parts"][0]["text"].as_str();
        if text.is_none() {
            // Content blocked by safety settings comes back without
            // any candidates
            if let Some(reason) = response["promptFeedback"]["blockReason"].as_str() {
                tracing::warn!(reason, "Gemini blocked the prompt");
            }
        }
        text
    }

    fn error_detail(&self, body: &str) -> String {
        serde_json::from_str::<GeminiErrorResponse>(body)
            .ok()
            .and_then(|e| e.error)
            .map(|e| format!("{} {}", e.code, e.message))
            .unwrap_or_else(|| body.to_string())
    }
}

//! Locally hosted models served by Ollama. The conversation is
//! flattened into a single prompt since `/api/generate` only takes
//! one block of text.

use anyhow::Result;
use async_trait::async_trait;
use handlebars::Handlebars;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

use super::Provider;
use crate::relay::prompt::{render_local_conversation, templates};
use crate::relay::{RelayError, RelayRequest};

pub struct OllamaProvider {
    api_hostname: String,
    model: String,
    assistant_name: String,
    templates: Handlebars<'static>,
}

impl OllamaProvider {
    pub fn new(api_hostname: &str, model: &str, assistant_name: &str) -> Result<Self> {
        Ok(Self {
            api_hostname: api_hostname.trim_end_matches('/').to_string(),
            model: model.to_string(),
            assistant_name: assistant_name.to_string(),
            templates: templates()?,
        })
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn post(&self, client: &Client) -> RequestBuilder {
        client.post(format!("{}/api/generate", self.api_hostname))
    }

    fn payload(&self, request: &RelayRequest) -> Result<Value, RelayError> {
        let prompt = render_local_conversation(&self.templates, request, &self.assistant_name)?;
        Ok(json!({
            "model": self.model,
            "prompt": prompt,
            // Ask for the full response at once
            "stream": false,
        }))
    }

    fn extract_text<'a>(&self, response: &'a Value) -> Option<&'a str> {
        response["response"].as_str()
    }
}

// src/providers/chat.rs

use reqwest::Client;
use serde::Serialize;
use std::time::Instant;

use crate::config::CompletionConfig;
use crate::errors::{GenError, Result};
use crate::providers::{Completion, CompletionProvider, extract_completion_text};

/// A provider for OpenAI-compatible chat-completion endpoints (Groq, OpenAI, vLLM, ...).
#[derive(Clone)]
pub struct ChatCompletionProvider {
    client: Client,
    config: CompletionConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

impl ChatCompletionProvider {
    /// Creates a new `ChatCompletionProvider`.
    pub fn new(client: Client, config: CompletionConfig) -> Self {
        Self { client, config }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_base.trim_end_matches('/'))
    }
}

impl CompletionProvider for ChatCompletionProvider {
    fn model(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let url = self.endpoint();

        log::info!("Calling completion API: {} with model: {}", url, self.config.model);

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let start = Instant::now();

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }
        let resp = request.send().await?;

        let status = resp.status();
        let raw = resp.text().await?;
        let latency_ms = start.elapsed().as_millis() as u64;

        log::info!("Completion API response status: {} ({}ms)", status, latency_ms);

        // Error bodies are usually JSON too; let the extractor classify them.
        let response_json: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) if status.is_success() => return Err(GenError::JsonParse(e)),
            Err(_) => {
                return Err(GenError::ApiError {
                    status: status.as_u16(),
                    body: raw,
                });
            }
        };

        log::debug!("Completion API response body: {}", response_json);

        let text = match extract_completion_text(&response_json) {
            // A non-2xx body without `choices` or `error` (a proxy page, say) keeps its status.
            Err(GenError::InvalidResponse(_)) if !status.is_success() => {
                return Err(GenError::ApiError {
                    status: status.as_u16(),
                    body: raw,
                });
            }
            other => other?,
        };

        Ok(Completion { text, latency_ms })
    }
}

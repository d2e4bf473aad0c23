//! Client for the upstream chat-completion service.
//!
//! The proxy speaks the OpenAI-style `/chat/completions` shape. When a
//! configured (non-default) model is rejected upstream, the request is
//! retried once with the default model before giving up.

use crate::config::{ChatConfig, DEFAULT_CHAT_MODEL};
use crate::error::ApiError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Provide detailed and comprehensive answers when the user asks for explanations. Keep your answers compact and brief yet logical and meaningful, ensuring the user gets a complete answer without being cut off. Do not include your internal chain of thought or reasoning process in the final output, only the response to the user.";

const TRUNCATION_NOTE: &str =
    "\n\n(Note: My response was cut off because it reached the maximum length.)";

pub struct ChatClient {
    http: reqwest::Client,
    config: ChatConfig,
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Message,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct Message {
    #[serde(default)]
    content: String,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { http, config })
    }

    /// Send a user message upstream and return the cleaned reply.
    pub async fn ask(&self, message: &str) -> Result<String, ApiError> {
        let Some(token) = self.config.token.as_deref() else {
            return Err(ApiError::Internal(anyhow::anyhow!(
                "Server is not configured with a chat API token"
            )));
        };

        let first = self.complete(token, &self.config.model, message).await?;
        if first.status().is_success() {
            return Self::extract_reply(first).await;
        }

        if self.config.model != DEFAULT_CHAT_MODEL {
            log::warn!(
                "chat model {} rejected ({}), retrying with {DEFAULT_CHAT_MODEL}",
                self.config.model,
                first.status()
            );
            let retry = self.complete(token, DEFAULT_CHAT_MODEL, message).await?;
            if retry.status().is_success() {
                return Self::extract_reply(retry).await;
            }
            let detail = retry.text().await.unwrap_or_default();
            return Err(ApiError::upstream("Chat service failed", detail));
        }

        let detail = first.text().await.unwrap_or_default();
        Err(ApiError::upstream("Chat service failed", detail))
    }

    async fn complete(
        &self,
        token: &str,
        model: &str,
        message: &str,
    ) -> Result<reqwest::Response, ApiError> {
        self.http
            .post(&self.config.api_url)
            .bearer_auth(token)
            .json(&json!({
                "model": model,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": message },
                ],
                "max_tokens": 3000,
                "temperature": 0.7,
            }))
            .send()
            .await
            .map_err(|err| ApiError::upstream("Chat service unreachable", err.to_string()))
    }

    async fn extract_reply(response: reqwest::Response) -> Result<String, ApiError> {
        let completion: Completion = response
            .json()
            .await
            .map_err(|err| ApiError::upstream("Invalid response from chat service", err.to_string()))?;

        let (content, finish_reason) = match completion.choices.into_iter().next() {
            Some(choice) => (choice.message.content, choice.finish_reason),
            None => (String::new(), None),
        };

        let mut reply = clean_reply(&content);
        if reply.is_empty() {
            reply = "No answer available.".to_string();
        }
        if finish_reason.as_deref() == Some("length") {
            reply.push_str(TRUNCATION_NOTE);
        }
        Ok(reply)
    }
}

/// Strip chain-of-thought artifacts some models leak into their replies:
/// `<think>...</think>` blocks and `Thinking Process:` sections (removed
/// up to the next blank line or the end of the text), both matched
/// case-insensitively. The remainder is trimmed.
pub fn clean_reply(text: &str) -> String {
    let without_blocks = strip_tagged_blocks(text, "<think>", "</think>");
    let without_sections = strip_labeled_sections(&without_blocks, "thinking process:");
    without_sections.trim().to_string()
}

fn strip_tagged_blocks(text: &str, open: &str, close: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with the original text.
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(rel) = lower[pos..].find(open) {
        let start = pos + rel;
        let body = start + open.len();
        // An unterminated block is left in place.
        let Some(end_rel) = lower[body..].find(close) else {
            break;
        };
        out.push_str(&text[pos..start]);
        pos = body + end_rel + close.len();
    }
    out.push_str(&text[pos..]);
    out
}

fn strip_labeled_sections(text: &str, label: &str) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(rel) = lower[pos..].find(label) {
        let start = pos + rel;
        out.push_str(&text[pos..start]);
        pos = match text[start..].find("\n\n") {
            Some(end_rel) => start + end_rel,
            None => text.len(),
        };
    }
    out.push_str(&text[pos..]);
    out
}

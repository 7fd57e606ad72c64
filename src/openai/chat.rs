use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::OpenAiConfig;
use crate::error::{CineseekError, CineseekResult};

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ReplyMessage>,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let user_agent = format!("cineseek/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build OpenAI HTTP client")?;
        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
        })
    }

    /// Sends a system + user prompt and returns the first choice's text, or an empty string
    /// when the reply carries no content.
    pub(crate) async fn complete(
        &self,
        system: &str,
        user: &str,
        temperature: f32,
        json_object: bool,
    ) -> CineseekResult<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            response_format: json_object.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let res = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                CineseekError::transport(
                    None,
                    format!("OpenAI request failed: {}", e.without_url()),
                )
            })?;

        let status = res.status();
        let bytes = res.bytes().await?;
        if !status.is_success() {
            return Err(CineseekError::transport(
                Some(status.as_u16()),
                format!(
                    "OpenAI API error: {}",
                    String::from_utf8_lossy(&bytes).trim()
                ),
            ));
        }

        let parsed: ChatResponse = serde_json::from_slice(&bytes)
            .map_err(|e| CineseekError::Parse(format!("OpenAI returned unexpected JSON: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default();
        debug!(model = %self.model, chars = content.len(), "OpenAI completion received");
        Ok(content)
    }
}

//! Blocking chat-completion client.
//!
//! Speaks the OpenAI chat-completions format, and the Anthropic messages
//! format when the URL points at `anthropic.com`. Any OpenAI-compatible
//! endpoint works with the former.

use super::{CodeQuery, QueryError, QueryResponse};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 8192;
const MAX_ERROR_BODY: usize = 2048;

/// Wire format spoken by the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

impl ApiFormat {
    /// Detect the format from the endpoint URL.
    pub fn detect(url: &str) -> Self {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }
}

/// Connection settings for a [`ChatClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_tokens: u32,
}

impl ClientSettings {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: api_url.into(),
            model: model.into(),
            timeout,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// [`CodeQuery`] over HTTP.
pub struct ChatClient {
    client: Client,
    settings: ClientSettings,
    format: ApiFormat,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_url", &self.settings.api_url)
            .field("model", &self.settings.model)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl ChatClient {
    pub fn new(settings: ClientSettings) -> Result<Self, QueryError> {
        if settings.api_key.trim().is_empty() {
            return Err(QueryError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        let format = ApiFormat::detect(&settings.api_url);

        Ok(Self {
            client,
            settings,
            format,
        })
    }

    pub fn format(&self) -> ApiFormat {
        self.format
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

impl CodeQuery for ChatClient {
    fn query(&self, system_prompt: &str, user_prompt: &str) -> Result<QueryResponse, QueryError> {
        let started = Instant::now();
        debug!(
            url = %self.settings.api_url,
            model = %self.settings.model,
            format = ?self.format,
            "querying model"
        );

        let request = self
            .client
            .post(&self.settings.api_url)
            .header("content-type", "application/json");
        let request = match self.format {
            ApiFormat::Anthropic => request
                .header("x-api-key", &self.settings.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&anthropic_request(
                    &self.settings.model,
                    self.settings.max_tokens,
                    system_prompt,
                    user_prompt,
                )),
            ApiFormat::OpenAI => request.bearer_auth(&self.settings.api_key).json(
                &openai_request(
                    &self.settings.model,
                    self.settings.max_tokens,
                    system_prompt,
                    user_prompt,
                ),
            ),
        };

        let response = request
            .send()
            .map_err(|e| QueryError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(QueryError::Api {
                status: status.as_u16(),
                body: truncate(body, MAX_ERROR_BODY),
            });
        }

        let primary_text = extract_text(self.format, &body)?;
        info!(
            bytes = primary_text.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "model replied"
        );
        Ok(QueryResponse { primary_text })
    }
}

/// Pull the completion text out of a successful response body.
pub fn extract_text(format: ApiFormat, body: &str) -> Result<String, QueryError> {
    match format {
        ApiFormat::OpenAI => {
            let completion: OpenAIResponse =
                serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;
            completion
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content.unwrap_or_default())
                .ok_or(QueryError::EmptyResponse)
        }
        ApiFormat::Anthropic => {
            let completion: AnthropicResponse =
                serde_json::from_str(body).map_err(|e| QueryError::Decode(e.to_string()))?;
            let texts: Vec<String> = completion
                .content
                .into_iter()
                .filter_map(|block| block.text)
                .collect();
            if texts.is_empty() {
                return Err(QueryError::EmptyResponse);
            }
            Ok(texts.concat())
        }
    }
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

fn openai_request(model: &str, max_tokens: u32, system: &str, user: &str) -> OpenAIRequest {
    OpenAIRequest {
        model: model.to_string(),
        max_tokens,
        messages: vec![
            Message {
                role: "system".to_string(),
                content: system.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: user.to_string(),
            },
        ],
    }
}

fn anthropic_request(model: &str, max_tokens: u32, system: &str, user: &str) -> AnthropicRequest {
    AnthropicRequest {
        model: model.to_string(),
        max_tokens,
        system: system.to_string(),
        messages: vec![Message {
            role: "user".to_string(),
            content: user.to_string(),
        }],
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

//! Chat-completion client used for keyword and quiz generation.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint.

use crate::config::{ChatConfig, Credentials};
use crate::http::{build_client, join_url};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("chat service error: request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat service error: {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("chat service error: response contained no message")]
    EmptyResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One system + user exchange with its sampling settings
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ChatRequest {
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.as_str()),
            ChatMessage::user(self.user.as_str()),
        ]
    }
}

/// Anything that answers a prompt with free-form text.
///
/// Implementations return the reply trimmed of surrounding whitespace.
#[async_trait]
pub trait ChatService {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the OpenAI chat-completions API
pub struct OpenAiChat {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(config: &ChatConfig, credentials: &Credentials) -> Result<Self, ChatError> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            url: join_url(&config.endpoint, "chat/completions"),
            model: config.model.clone(),
            api_key: credentials.openai_key.clone(),
        })
    }
}

#[async_trait]
impl ChatService for OpenAiChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let body = CompletionBody {
            model: &self.model,
            messages: request.messages(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        tracing::debug!(url = %self.url, model = %self.model, "requesting chat completion");
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = error_body(response).await;
            return Err(ChatError::Api { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        let reply = first_reply(completion).ok_or(ChatError::EmptyResponse)?;
        tracing::debug!(chars = reply.chars().count(), "chat completion received");
        Ok(reply)
    }
}

/// Body of an error response, or a note saying why it could not be read
async fn error_body(response: reqwest::Response) -> String {
    body_or_note(response.text().await)
}

fn body_or_note<E: std::fmt::Display>(read: Result<String, E>) -> String {
    match read {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(error = %e, "failed to read error response body");
            format!("<unreadable response body: {}>", e)
        }
    }
}

fn first_reply(completion: CompletionResponse) -> Option<String> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
}

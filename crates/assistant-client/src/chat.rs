use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use futures::{Stream, StreamExt as _};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::sse::FrameDecoder;

/// Message author role.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message owned by a conversation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Creates a message with a fresh id.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
        }
    }
}

/// Coarse sampling temperature setting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Low,
    #[default]
    Medium,
    High,
}

impl Temperature {
    /// Concrete sampling temperature sent to the completion API.
    pub fn as_f32(self) -> f32 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 0.7,
            Self::High => 0.9,
        }
    }
}

/// Generation parameters for a chat completion.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChatParams {
    /// Model name understood by the backing service.
    pub model: String,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Coarse temperature setting.
    pub temperature: Temperature,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: "claude-instant".into(),
            max_tokens: 512,
            temperature: Temperature::Medium,
        }
    }
}

/// Client for streamed chat completions.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ChatClient {
    /// Creates a chat client from explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Starts a streamed chat completion and returns a pull-style handle over
    /// its token deltas.
    ///
    /// When `messages` is a single non-system message, the configured system
    /// prompt is prepended before the request is issued.
    pub async fn stream_completion(
        &self,
        messages: &[ChatMessage],
        params: &ChatParams,
    ) -> Result<ChatStream, ClientError> {
        if messages.is_empty() {
            return Err(ClientError::Validation(
                "at least one message is required".into(),
            ));
        }
        let body = build_request_body(messages, params, &self.config.system_prompt);
        debug!(model = %params.model, messages = messages.len(), "starting chat completion stream");

        let resp = self
            .http
            .post(self.config.chat_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Request(format!("chat request failed: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Request(format!(
                "chat request failed with status {status}: {body}"
            )));
        }

        Ok(ChatStream::new(resp.bytes_stream()))
    }

    /// Runs a completion to the end and returns the concatenated text.
    pub async fn complete_text(
        &self,
        messages: &[ChatMessage],
        params: &ChatParams,
    ) -> Result<String, ClientError> {
        self.stream_completion(messages, params)
            .await?
            .collect_text()
            .await
    }
}

fn build_request_body(
    messages: &[ChatMessage],
    params: &ChatParams,
    system_prompt: &str,
) -> serde_json::Value {
    let mut wire = Vec::with_capacity(messages.len() + 1);
    if let [only] = messages
        && only.role != Role::System
    {
        wire.push(json!({"role": "system", "content": system_prompt}));
    }
    for message in messages {
        wire.push(json!({"role": message.role, "content": message.content}));
    }
    json!({
        "model": params.model,
        "messages": wire,
        "temperature": params.temperature.as_f32(),
        "max_tokens": params.max_tokens,
        "stream": true,
    })
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, ClientError>> + Send + 'static>>;

/// Pull-style handle over a streamed chat completion.
///
/// The remote token-delta stream passes through unchanged: each delta is the
/// next `choices[0].delta.content` fragment, and the stream ends at the
/// `[DONE]` sentinel or at end of body.
pub struct ChatStream {
    bytes: ByteStream,
    decoder: FrameDecoder,
    pending: VecDeque<String>,
    failure: Option<ClientError>,
    done: bool,
}

impl ChatStream {
    pub(crate) fn new<S, E>(bytes: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: std::fmt::Display,
    {
        let bytes = bytes
            .map(|item| item.map_err(|e| ClientError::Stream(format!("read failed: {e}"))));
        Self {
            bytes: Box::pin(bytes),
            decoder: FrameDecoder::default(),
            pending: VecDeque::new(),
            failure: None,
            done: false,
        }
    }

    /// Waits for and returns the next non-empty text delta.
    ///
    /// Returns `None` once the stream has finished. A read or decode failure
    /// is yielded exactly once, after any deltas decoded before it, and ends
    /// the stream; nothing is ever yielded after the failure.
    pub async fn next_delta(&mut self) -> Option<Result<String, ClientError>> {
        loop {
            if let Some(delta) = self.pending.pop_front() {
                return Some(Ok(delta));
            }
            if let Some(err) = self.failure.take() {
                self.done = true;
                return Some(Err(err));
            }
            if self.done {
                return None;
            }

            match self.bytes.next().await {
                Some(Ok(chunk)) => {
                    for frame in self.decoder.feed(&chunk) {
                        if frame.data.trim() == "[DONE]" {
                            self.done = true;
                            break;
                        }
                        match delta_from_payload(&frame.data) {
                            Ok(Some(delta)) if !delta.is_empty() => self.pending.push_back(delta),
                            Ok(_) => {}
                            Err(err) => {
                                // deltas decoded before the failure drain first
                                self.failure = Some(err);
                                break;
                            }
                        }
                    }
                }
                Some(Err(err)) => self.failure = Some(err),
                None => self.done = true,
            }
        }
    }

    /// Drains the stream and returns the concatenated completion text.
    pub async fn collect_text(mut self) -> Result<String, ClientError> {
        let mut out = String::new();
        while let Some(delta) = self.next_delta().await {
            out.push_str(&delta?);
        }
        Ok(out)
    }
}

fn delta_from_payload(payload: &str) -> Result<Option<String>, ClientError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| ClientError::Stream(format!("invalid completion frame: {e}")))?;
    Ok(value
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(|v| v.as_str())
        .map(ToOwned::to_owned))
}

// Claude API streaming client using reqwest-eventsource.
//
// Sends messages to the Anthropic Messages API with `stream: true` and parses
// the Server-Sent Events. Text deltas are forwarded as `LlmEvent::Token` when a
// channel is supplied; the assembled text is returned as a `Completion`.

use futures_util::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use fsi_core::config::{Config, LlmSettings};

use crate::error::AdvisorError;
use crate::protocol::LlmEvent;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Status reported for an `overloaded_error` that arrives mid-stream.
const OVERLOADED_STATUS: u16 = 529;

// ---------------------------------------------------------------------------
// ClaudeClient
// ---------------------------------------------------------------------------

/// Full text and token usage of one finished model call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Low-level Claude API streaming client. Model parameters are passed per
/// call, so one client serves any `LlmSettings`.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ClaudeClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Point the client at another Messages endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Run one call to completion without streaming tokens anywhere.
    pub async fn complete(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
    ) -> Result<Completion, AdvisorError> {
        self.call_with_timeout(settings, system, user_content, None, 0)
            .await
    }

    /// Stream a call as `LlmEvent`s over `tx`, ending with exactly one
    /// `Complete` or `Error` unless the receiver is dropped first.
    ///
    /// The `generation` counter is threaded through every emitted event so
    /// the receiving side can discard stale events from cancelled tasks.
    pub async fn stream_message(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
        tx: mpsc::Sender<LlmEvent>,
        generation: u64,
    ) {
        let result = self
            .call_with_timeout(settings, system, user_content, Some(&tx), generation)
            .await;
        let event = match result {
            Ok(completion) => LlmEvent::Complete {
                full_text: completion.text,
                input_tokens: completion.input_tokens,
                output_tokens: completion.output_tokens,
                generation,
            },
            Err(AdvisorError::Cancelled) => return,
            Err(error) => LlmEvent::Error { error, generation },
        };
        let _ = tx.send(event).await;
    }

    async fn call_with_timeout(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
        tx: Option<&mpsc::Sender<LlmEvent>>,
        generation: u64,
    ) -> Result<Completion, AdvisorError> {
        if self.api_key.trim().is_empty() {
            return Err(AdvisorError::NotConfigured);
        }
        let call = self.run_stream(settings, system, user_content, tx, generation);
        match tokio::time::timeout(settings.timeout(), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_secs = settings.timeout_secs, "model call timed out");
                Err(AdvisorError::Timeout {
                    secs: settings.timeout_secs,
                })
            }
        }
    }

    async fn run_stream(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
        tx: Option<&mpsc::Sender<LlmEvent>>,
        generation: u64,
    ) -> Result<Completion, AdvisorError> {
        let body = serde_json::json!({
            "model": settings.model,
            "max_tokens": settings.max_tokens,
            "temperature": settings.temperature,
            "stream": true,
            "system": system,
            "messages": [{ "role": "user", "content": user_content }]
        });

        let request = self
            .http
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body);

        let mut es = request
            .eventsource()
            .map_err(|e| AdvisorError::Transport(format!("failed to create event source: {e}")))?;

        info!(model = %settings.model, generation, "model call started");

        let mut full_text = String::new();
        let mut input_tokens: u32 = 0;
        let mut output_tokens: u32 = 0;

        while let Some(event) = es.next().await {
            match event {
                Ok(Event::Open) => {
                    debug!("SSE connection opened");
                }
                Ok(Event::Message(msg)) => {
                    let event_type = msg.event.as_str();
                    let data = &msg.data;

                    match event_type {
                        "message_start" => {
                            match parse_input_tokens(data) {
                                Some(n) => input_tokens = n,
                                None => warn!("failed to parse input_tokens from message_start"),
                            }
                            debug!(input_tokens, "message_start");
                        }
                        "content_block_delta" => {
                            if let Some(text) = parse_delta_text(data) {
                                full_text.push_str(&text);
                                if let Some(tx) = tx {
                                    if tx.send(LlmEvent::Token { text, generation }).await.is_err() {
                                        es.close();
                                        return Err(AdvisorError::Cancelled);
                                    }
                                }
                            }
                        }
                        "message_delta" => {
                            match parse_output_tokens(data) {
                                Some(n) => output_tokens = n,
                                None => warn!("failed to parse output_tokens from message_delta"),
                            }
                            debug!(output_tokens, "message_delta");
                        }
                        "message_stop" => {
                            debug!("message_stop, streaming complete");
                            es.close();
                            break;
                        }
                        "error" => {
                            es.close();
                            let (status, message) = parse_stream_error(data);
                            warn!(status, %message, "model stream reported an error");
                            return Err(AdvisorError::ApiStatus { status, message });
                        }
                        // Ignore ping, content_block_start, content_block_stop, etc.
                        _ => {
                            debug!(event_type, "ignoring SSE event");
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => {
                    // The server closed the stream without message_stop.
                    es.close();
                    break;
                }
                Err(err) => {
                    es.close();
                    let error = into_advisor_error(err).await;
                    warn!(%error, "SSE stream error");
                    return Err(error);
                }
            }
        }

        if full_text.trim().is_empty() {
            return Err(AdvisorError::EmptyResponse);
        }
        info!(input_tokens, output_tokens, generation, "model call complete");
        Ok(Completion {
            text: full_text,
            input_tokens,
            output_tokens,
        })
    }
}

// ---------------------------------------------------------------------------
// LlmClient wrapper
// ---------------------------------------------------------------------------

/// High-level wrapper that can be either an active Claude client or disabled.
#[derive(Debug, Clone)]
pub enum LlmClient {
    /// Claude API is configured and ready.
    Active(ClaudeClient),
    /// LLM functionality is disabled (no API key configured).
    Disabled,
}

impl LlmClient {
    /// `Active` if the config carries a non-blank API key, else `Disabled`.
    pub fn from_config(config: &Config) -> Self {
        match config.api_key() {
            Some(key) => LlmClient::Active(ClaudeClient::new(key)),
            None => LlmClient::Disabled,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, LlmClient::Active(_))
    }

    pub async fn complete(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
    ) -> Result<Completion, AdvisorError> {
        match self {
            LlmClient::Active(client) => client.complete(settings, system, user_content).await,
            LlmClient::Disabled => Err(AdvisorError::NotConfigured),
        }
    }

    /// Stream a message, delegating to the inner `ClaudeClient` or immediately
    /// sending an error if disabled.
    pub async fn stream_message(
        &self,
        settings: &LlmSettings,
        system: &str,
        user_content: &str,
        tx: mpsc::Sender<LlmEvent>,
        generation: u64,
    ) {
        match self {
            LlmClient::Active(client) => {
                client
                    .stream_message(settings, system, user_content, tx, generation)
                    .await
            }
            LlmClient::Disabled => {
                let _ = tx
                    .send(LlmEvent::Error {
                        error: AdvisorError::NotConfigured,
                        generation,
                    })
                    .await;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// SSE JSON parsing helpers
// ---------------------------------------------------------------------------

/// Extract `input_tokens` from a `message_start` event's JSON.
///
/// Expected shape: `{ "type": "message_start", "message": { "usage": { "input_tokens": N } } }`
pub(crate) fn parse_input_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("message")?
        .get("usage")?
        .get("input_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// Extract `delta.text` from a `content_block_delta` event's JSON.
pub(crate) fn parse_delta_text(data: &str) -> Option<String> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("delta")?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}

/// Extract `output_tokens` from a `message_delta` event's JSON.
pub(crate) fn parse_output_tokens(data: &str) -> Option<u32> {
    let v: Value = serde_json::from_str(data).ok()?;
    v.get("usage")?
        .get("output_tokens")?
        .as_u64()
        .map(|n| n as u32)
}

/// `error.message` from an API error body, if it has one.
pub(crate) fn parse_error_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v.get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

/// Status and message for an in-stream `error` event.
fn parse_stream_error(data: &str) -> (u16, String) {
    let v: Value = serde_json::from_str(data).unwrap_or(Value::Null);
    let error = &v["error"];
    let status = match error["type"].as_str() {
        Some("overloaded_error") => OVERLOADED_STATUS,
        Some("rate_limit_error") => 429,
        _ => 500,
    };
    let message = error["message"]
        .as_str()
        .unwrap_or("stream error")
        .to_string();
    (status, message)
}

/// Map an SSE error to the advisor error the caller sees. Reads the response
/// body of a non-success status for the API's own message.
async fn into_advisor_error(err: reqwest_eventsource::Error) -> AdvisorError {
    match err {
        reqwest_eventsource::Error::InvalidStatusCode(status, response) => {
            let body = response.text().await.unwrap_or_default();
            let message = parse_error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
            AdvisorError::ApiStatus {
                status: status.as_u16(),
                message,
            }
        }
        reqwest_eventsource::Error::Transport(e) => AdvisorError::Transport(e.to_string()),
        other => AdvisorError::Transport(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

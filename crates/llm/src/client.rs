//! Chat Completion Client
//!
//! `HttpChatClient` talks to an OpenAI-compatible chat-completion endpoint:
//! bearer-token auth, `[system, ...messages]` envelope, optional
//! `response_format: json_object`. Every call races against a
//! `CancellationToken` and rejects with `LlmError::Aborted` when it fires.

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use noesis_core::{CoreError, CoreResult};

use crate::json::extract_json_payload;
use crate::types::{ChatRequest, LlmError, LlmResult, WireMessage};

/// The seam the orchestration layer programs against.
///
/// Implementations must reject with `LlmError::Aborted` when the token is
/// cancelled, including when it is already cancelled on entry.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Send one chat-completion request and return the assistant text.
    async fn complete(&self, request: ChatRequest, cancel: &CancellationToken)
        -> LlmResult<String>;
}

/// Production chat-completion client.
pub struct HttpChatClient {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl HttpChatClient {
    /// Create a client for one endpoint/credential/model triple.
    ///
    /// Credentials are validated here so pipelines fail before issuing work.
    pub fn new(
        endpoint: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> CoreResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| CoreError::config(format!("invalid endpoint URL '{}': {}", endpoint, e)))?;
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CoreError::config("API key is empty"));
        }
        let model = model.into();
        if model.trim().is_empty() {
            return Err(CoreError::config("model name is empty"));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            model,
        })
    }

    /// Build the request envelope.
    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let mut messages: Vec<serde_json::Value> = Vec::with_capacity(request.messages.len() + 1);
        messages.push(serde_json::json!({
            "role": "system",
            "content": request.system,
        }));
        for message in &request.messages {
            messages.push(serde_json::json!(message));
        }

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.options.temperature,
        });
        if let Some(top_p) = request.options.top_p {
            body["top_p"] = serde_json::json!(top_p);
        }
        if let Some(max_tokens) = request.options.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        if request.options.json_mode {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }
        body
    }

    async fn send(&self, body: serde_json::Value) -> LlmResult<(u16, String)> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| LlmError::Network {
            message: e.to_string(),
        })?;
        Ok((status, text))
    }
}

#[async_trait]
impl ChatCompleter for HttpChatClient {
    async fn complete(
        &self,
        request: ChatRequest,
        cancel: &CancellationToken,
    ) -> LlmResult<String> {
        if cancel.is_cancelled() {
            return Err(LlmError::Aborted);
        }

        debug!(
            model = %self.model,
            messages = request.messages.len(),
            json_mode = request.options.json_mode,
            "chat: sending completion request"
        );

        let body = self.build_request_body(&request);
        let (status, text) = tokio::select! {
            _ = cancel.cancelled() => return Err(LlmError::Aborted),
            result = self.send(body) => result?,
        };

        if !(200..300).contains(&status) {
            return Err(LlmError::Transport {
                status,
                message: extract_error_message(&text, status),
            });
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::MalformedResponse {
                message: format!("failed to parse completion envelope: {}", e),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .ok_or_else(|| LlmError::MalformedResponse {
                message: "response contained no message content".to_string(),
            })?;

        debug!(content_len = content.len(), "chat: completion received");

        if request.options.json_mode {
            Ok(extract_json_payload(&content))
        } else {
            Ok(content)
        }
    }
}

/// Best-effort human-readable message from a non-2xx body.
///
/// Tries a top-level `message`, then `error.message`; falls back to the raw
/// body text, then to the bare status line.
fn extract_error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Chat-completion response envelope (2xx).
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

//! HTTP transport to the remote assistant.
//!
//! One request per turn: POST the user message with
//! `Accept: text/event-stream`, then hand the response body to the
//! streaming pipeline. A non-success status is terminal for the turn;
//! retries are the caller's business.

use crate::error::{ChatError, ChatResult};
use crate::request::{ChatRequest, RequestOptions};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use voltchat_core::{ConversationId, GenerationSettings, Message};
use voltchat_streaming::{DeltaStream, StreamError, StreamResult};

/// Default caller identity.
pub const DEFAULT_USER_ID: &str = "DCS_Student";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default token budget per reply.
pub const DEFAULT_MAX_TOKENS: u64 = 16000;
/// Default reasoning/tool step budget per turn.
pub const DEFAULT_MAX_STEPS: u32 = 15;

/// A pinned stream of assistant text fragments for one turn.
pub type ReplyStream = Pin<Box<dyn Stream<Item = StreamResult<String>> + Send>>;

/// Client for a streaming assistant endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    base_url: String,
    agent: String,
    user_id: String,
    settings: GenerationSettings,
}

impl ChatClient {
    /// Create a new client for an agent behind a base URL.
    ///
    /// Generation settings start at the deployment defaults
    /// (temperature 0.7, 16000 tokens, 15 steps).
    pub fn new(base_url: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            agent: agent.into(),
            user_id: DEFAULT_USER_ID.to_string(),
            settings: GenerationSettings::new()
                .temperature(DEFAULT_TEMPERATURE)
                .max_tokens(DEFAULT_MAX_TOKENS)
                .max_steps(DEFAULT_MAX_STEPS),
        }
    }

    /// Set the caller identity sent with every request.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Override the generation settings.
    #[must_use]
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use a preconfigured `reqwest` client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The generation settings in effect.
    #[must_use]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The full chat endpoint URL, with the agent name percent-encoded.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/agents/{}/chat",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.agent),
        )
    }

    /// Send one user turn and open its reply stream.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint is unreachable or answers with a
    /// non-success status; either way no stream is opened and nothing
    /// has been consumed.
    pub async fn stream_reply(
        &self,
        message: &Message,
        conversation: &ConversationId,
    ) -> ChatResult<ReplyStream> {
        let options = RequestOptions::new(conversation, self.user_id.clone(), &self.settings);
        let body = ChatRequest::user_turn(message, options);

        let response = self
            .client
            .post(self.endpoint_url())
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let byte_stream = response
            .bytes_stream()
            .map(|item| item.map_err(StreamError::transport));

        Ok(Box::pin(DeltaStream::from_bytes(byte_stream)))
    }
}

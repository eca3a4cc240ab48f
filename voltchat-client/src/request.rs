//! Wire request types.
//!
//! The body shape the remote assistant endpoint expects: a list of input
//! messages (each a list of typed parts) plus per-request options.

use serde::Serialize;
use voltchat_core::{ConversationId, GenerationSettings, Message};

/// A chat request body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Input messages for this turn.
    pub input: Vec<InputMessage>,
    /// Request options.
    pub options: RequestOptions,
}

impl ChatRequest {
    /// Build the request body for one user turn.
    pub fn user_turn(message: &Message, options: RequestOptions) -> Self {
        Self {
            input: vec![InputMessage::from_message(message)],
            options,
        }
    }
}

/// One input message on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    /// Message id, echoing the transcript entry.
    pub id: String,
    /// Author role (`"user"`).
    pub role: String,
    /// Typed content parts.
    pub parts: Vec<InputPart>,
}

impl InputMessage {
    /// Convert a transcript message to its wire form.
    pub fn from_message(message: &Message) -> Self {
        Self {
            id: message.id.to_string(),
            role: message.role.to_string(),
            parts: vec![InputPart::Text {
                text: message.content.clone(),
            }],
        }
    }
}

/// One typed content part.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputPart {
    /// Plain text.
    Text {
        /// The text itself.
        text: String,
    },
}

/// Per-request options, passed through to the assistant unchanged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Conversation correlation id.
    pub conversation_id: String,
    /// Caller identity.
    pub user_id: String,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    /// Maximum reasoning/tool steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<u32>,
}

impl RequestOptions {
    /// Build options from the session's conversation id, identity, and settings.
    pub fn new(
        conversation: &ConversationId,
        user_id: impl Into<String>,
        settings: &GenerationSettings,
    ) -> Self {
        Self {
            conversation_id: conversation.to_string(),
            user_id: user_id.into(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            max_steps: settings.max_steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use voltchat_core::{ConversationId, GenerationSettings, MessageId, Role};

    #[test]
    fn test_request_body_shape() {
        let message = Message {
            id: MessageId::from_string("msg_1"),
            role: Role::User,
            content: "Explain the echo server".to_string(),
            created_at: voltchat_core::now_utc(),
        };
        let settings = GenerationSettings::new()
            .temperature(0.7)
            .max_tokens(16000)
            .max_steps(15);
        let options = RequestOptions::new(
            &ConversationId::from_string("conv_1"),
            "DCS_Student",
            &settings,
        );
        let body = ChatRequest::user_turn(&message, options);

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "input": [{
                    "id": "msg_1",
                    "role": "user",
                    "parts": [{ "type": "text", "text": "Explain the echo server" }],
                }],
                "options": {
                    "conversationId": "conv_1",
                    "userId": "DCS_Student",
                    "temperature": 0.7,
                    "maxTokens": 16000,
                    "maxSteps": 15,
                },
            })
        );
    }

    #[test]
    fn test_unset_settings_are_omitted() {
        let options = RequestOptions::new(
            &ConversationId::from_string("conv_1"),
            "student",
            &GenerationSettings::new(),
        );
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "conversationId": "conv_1", "userId": "student" })
        );
    }
}

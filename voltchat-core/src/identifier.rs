//! ID generation utilities.
//!
//! This module provides functions for generating unique identifiers
//! for messages and conversations, plus type-safe wrappers for both.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a unique message ID.
///
/// Returns a UUID v4 string prefixed with "msg_".
///
/// # Example
///
/// ```rust
/// use voltchat_core::identifier::generate_message_id;
///
/// let id = generate_message_id();
/// assert!(id.starts_with("msg_"));
/// assert_eq!(id.len(), 36); // "msg_" + 32 hex chars
/// ```
#[must_use]
pub fn generate_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

/// Generate a unique conversation ID.
///
/// Returns a UUID v4 string prefixed with "conv_".
#[must_use]
pub fn generate_conversation_id() -> String {
    format!("conv_{}", Uuid::new_v4().simple())
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Type-safe wrapper for a message ID.
///
/// Stable for the lifetime of the message it names; transcript entries
/// are located by this id, never by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new message ID.
    #[must_use]
    pub fn new() -> Self {
        Self(generate_message_id())
    }

    /// Create from an existing string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type-safe wrapper for a conversation ID.
///
/// Generated once per session and attached to every outgoing request so
/// the remote endpoint can correlate turns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Create a new conversation ID.
    #[must_use]
    pub fn new() -> Self {
        Self(generate_conversation_id())
    }

    /// Create from an existing string.
    #[must_use]
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_prefix() {
        let id = generate_message_id();
        assert!(id.starts_with("msg_"));
        assert_eq!(id.len(), 36);
    }

    #[test]
    fn test_conversation_id_prefix() {
        let id = generate_conversation_id();
        assert!(id.starts_with("conv_"));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = MessageId::new();
        let b = MessageId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_roundtrip() {
        let id = MessageId::from_string("msg_abc123");
        assert_eq!(id.as_str(), "msg_abc123");
        assert_eq!(id.to_string(), "msg_abc123");
    }
}

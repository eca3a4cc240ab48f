//! Transcript message types.
//!
//! A [`Message`] is one transcript entry. User messages are created
//! complete and never mutated; the in-flight assistant message starts
//! empty and grows as deltas arrive.

use crate::identifier::{now_utc, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The local user.
    User,
    /// The remote assistant.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry.
///
/// The `id` is stable for the lifetime of the message. `created_at` is
/// for display only; transcript insertion order is authoritative for
/// sequencing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique identifier.
    pub id: MessageId,
    /// Author of the entry.
    pub role: Role,
    /// Text content. Grows only for the in-flight assistant message.
    pub content: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a message with an explicit role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            created_at: now_utc(),
        }
    }

    /// Create a complete user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a complete assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create an empty assistant message, ready to receive deltas.
    #[must_use]
    pub fn assistant_placeholder() -> Self {
        Self::new(Role::Assistant, String::new())
    }

    /// Check if this message was authored by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// Check if this message was authored by the assistant.
    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

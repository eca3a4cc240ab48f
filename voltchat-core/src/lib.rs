//! # voltchat-core
//!
//! Core types for the voltchat transcript engine.
//!
//! This crate provides the foundational types shared by the streaming
//! pipeline and the chat client:
//!
//! - **Messages**: transcript entries with stable identity ([`Message`], [`Role`])
//! - **Transcript**: an ordered, identity-indexed message store ([`Transcript`])
//! - **Identifiers**: prefixed unique ids for messages and conversations
//! - **Settings**: generation parameters passed through to the remote assistant
//!
//! ## Example
//!
//! ```rust
//! use voltchat_core::{Message, Transcript};
//!
//! let mut transcript = Transcript::new();
//! let user = Message::user("Explain the echo server");
//! transcript.push(user);
//!
//! let reply = Message::assistant_placeholder();
//! let reply_id = reply.id.clone();
//! transcript.push(reply);
//!
//! transcript.append_content(&reply_id, "The echo server ");
//! transcript.append_content(&reply_id, "listens on a TCP socket...");
//!
//! assert_eq!(transcript.len(), 2);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod identifier;
pub mod message;
pub mod settings;
pub mod transcript;

pub use identifier::{
    generate_conversation_id, generate_message_id, now_utc, ConversationId, MessageId,
};
pub use message::{Message, Role};
pub use settings::GenerationSettings;
pub use transcript::Transcript;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::identifier::{
        generate_conversation_id, generate_message_id, now_utc, ConversationId, MessageId,
    };
    pub use crate::message::{Message, Role};
    pub use crate::settings::GenerationSettings;
    pub use crate::transcript::Transcript;
}

//! # voltchat-client
//!
//! The chat client for voltchat: HTTP transport to a streaming assistant
//! endpoint plus the transcript accumulator that folds the reply stream
//! into an ordered conversation.
//!
//! ## Example
//!
//! ```ignore
//! use voltchat_client::{ChatClient, ChatSession};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ChatClient::new("http://localhost:3141", "DCS Code Assistant");
//!     let mut session = ChatSession::new(client);
//!
//!     session.send("Explain the echo server in Assignment 1").await;
//!
//!     for message in session.snapshot() {
//!         println!("{}: {}", message.role, message.content);
//!     }
//! }
//! ```
//!
//! ## Design
//!
//! One request/response cycle runs at a time. [`ChatSession::send`] is a
//! single sequential pull loop over the reply stream; cancellation is
//! dropping the future, which releases the transport reader and
//! guarantees no further transcript mutation. The rendering layer reads
//! [`ChatSession::snapshot`] after each mutation and checks
//! [`ChatSession::awaiting_response`] to disable submission.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod request;
pub mod session;

pub use client::{ChatClient, ReplyStream, DEFAULT_MAX_STEPS, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_USER_ID};
pub use error::{ChatError, ChatResult};
pub use request::{ChatRequest, InputMessage, InputPart, RequestOptions};
pub use session::{ChatSession, TurnState};

// Re-export the foundational types callers interact with.
pub use voltchat_core::{ConversationId, GenerationSettings, Message, MessageId, Role, Transcript};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ChatClient, ChatError, ChatResult, ChatSession, GenerationSettings, Message, Role,
        Transcript, TurnState,
    };
}

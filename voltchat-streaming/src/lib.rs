//! # voltchat-streaming
//!
//! The byte-level ingestion pipeline for voltchat.
//!
//! An assistant reply arrives as a server-sent-event (SSE) byte stream,
//! chunked at arbitrary, non-semantic boundaries. This crate rebuilds
//! logical structure from that stream in two stages:
//!
//! - **[`LineDecoder`] / [`LineStream`]**: turn raw byte buffers into
//!   complete text lines, carrying any trailing partial line (and any
//!   partial UTF-8 sequence) across chunk boundaries.
//! - **[`DeltaStream`]**: interpret decoded lines as SSE `data:` framing,
//!   parse each payload, tolerate malformed lines, honor the `[DONE]`
//!   sentinel, and yield a sequence of text fragments.
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use futures::{stream, StreamExt};
//! use voltchat_streaming::{DeltaStream, StreamResult};
//!
//! # tokio_test::block_on(async {
//! let chunks: Vec<StreamResult<Bytes>> = vec![
//!     Ok(Bytes::from("data: {\"type\":\"text-delta\",\"delta\":\"He\"}\n")),
//!     Ok(Bytes::from("data: {\"type\":\"text-delta\",\"delta\":\"llo\"}\ndata: [DONE]\n")),
//! ];
//! let mut deltas = DeltaStream::from_bytes(stream::iter(chunks));
//!
//! let mut reply = String::new();
//! while let Some(fragment) = deltas.next().await {
//!     reply.push_str(&fragment.unwrap());
//! }
//! assert_eq!(reply, "Hello");
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod lines;
pub mod sse;

pub use error::{StreamError, StreamResult};
pub use lines::{LineDecoder, LineStream};
pub use sse::{interpret_line, DeltaStream, LineEvent};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{interpret_line, DeltaStream, LineDecoder, LineEvent, LineStream, StreamError, StreamResult};
}

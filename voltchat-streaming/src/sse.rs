//! SSE event reconstruction.
//!
//! Interprets decoded lines as server-sent-event framing and yields the
//! text fragments of the assistant reply. This is a deliberately
//! permissive subset of the full SSE grammar: one payload per `data:`
//! line, no multi-line data accumulation, no `event:`/`id:` fields.
//! Everything else the transport sends (blank lines, comments, unknown
//! fields) is ignored.

use crate::error::StreamResult;
use crate::lines::LineStream;
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use serde::Deserialize;
use std::pin::Pin;
use std::task::{Context, Poll};

const DATA_PREFIX: &str = "data:";
const DONE_SENTINEL: &str = "[DONE]";

/// Recognized wire payload shapes, after JSON-decoding a `data:` line.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum WirePayload {
    /// Primary shape: an incremental text fragment.
    #[serde(rename = "text-delta")]
    TextDelta {
        /// The fragment to append.
        delta: String,
    },
    /// Legacy fallback shape: a complete chunk of text.
    #[serde(rename = "text")]
    Text {
        /// The chunk to append.
        content: String,
    },
}

/// The interpretation of a single decoded line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// A usable, non-empty text fragment.
    Delta(String),
    /// The explicit end-of-stream sentinel.
    Done,
    /// Nothing usable: blank line, comment, other SSE field, malformed
    /// payload, or an unrecognized-but-valid payload shape.
    Ignored,
}

/// Interpret one decoded line of the SSE stream.
///
/// Malformed payloads fail locally: the line is discarded with a log
/// entry and the stream continues. Valid payloads of unrecognized shape
/// are ignored without logging noise.
#[must_use]
pub fn interpret_line(line: &str) -> LineEvent {
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return LineEvent::Ignored;
    };
    let payload = payload.trim();

    if payload == DONE_SENTINEL {
        return LineEvent::Done;
    }

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!("Discarding malformed stream payload: {} - data: {}", error, payload);
            return LineEvent::Ignored;
        }
    };

    match serde_json::from_value::<WirePayload>(value) {
        Ok(WirePayload::TextDelta { delta }) if !delta.is_empty() => LineEvent::Delta(delta),
        Ok(WirePayload::Text { content }) if !content.is_empty() => {
            // Compatibility shim of unclear origin; kept visible in logs
            // so a stream that actually uses it can be traced.
            tracing::debug!("Accepting legacy text payload shape");
            LineEvent::Delta(content)
        }
        Ok(_) => LineEvent::Ignored,
        Err(_) => {
            tracing::debug!("Ignoring unrecognized stream payload shape: {}", payload);
            LineEvent::Ignored
        }
    }
}

pin_project! {
    /// Stream adapter yielding assistant text fragments from a stream
    /// of decoded lines.
    ///
    /// Driven entirely by the underlying line stream; finite; not
    /// restartable once started. After the `[DONE]` sentinel the
    /// underlying stream is never polled again, so no further fragments
    /// are emitted even if more decoded lines remain.
    pub struct DeltaStream<S> {
        #[pin]
        inner: S,
        done: bool,
    }
}

impl<S> DeltaStream<S>
where
    S: Stream<Item = StreamResult<String>>,
{
    /// Create a new delta stream over decoded lines.
    pub fn new(inner: S) -> Self {
        Self { inner, done: false }
    }
}

impl<B> DeltaStream<LineStream<B>>
where
    B: Stream<Item = StreamResult<Bytes>>,
{
    /// Create a delta stream directly over a chunked byte stream,
    /// stacking a [`LineStream`] underneath.
    pub fn from_bytes(bytes: B) -> Self {
        Self::new(LineStream::new(bytes))
    }
}

impl<S> Stream for DeltaStream<S>
where
    S: Stream<Item = StreamResult<String>>,
{
    type Item = StreamResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(line))) => match interpret_line(&line) {
                    LineEvent::Delta(fragment) => return Poll::Ready(Some(Ok(fragment))),
                    LineEvent::Done => {
                        *this.done = true;
                        return Poll::Ready(None);
                    }
                    LineEvent::Ignored => {}
                },
                Poll::Ready(Some(Err(error))) => return Poll::Ready(Some(Err(error))),
                Poll::Ready(None) => {
                    *this.done = true;
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

//! Chunk-boundary-safe line decoding.
//!
//! The transport hands us byte buffers split at arbitrary points: one
//! logical line may span two buffers, and one buffer may hold several
//! lines. [`LineDecoder`] re-splits on `\n`, carrying the trailing
//! partial line (including any partial UTF-8 sequence) until more bytes
//! arrive, and flushing it as a final line when the stream ends.

use crate::error::{StreamError, StreamResult};
use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

const MAX_LINE_BUFFER: usize = 10 * 1024 * 1024;

/// Incremental line splitter over a chunked byte stream.
///
/// Bytes are buffered until a `\n` delimiter appears; each complete line
/// is decoded (lossily) to text with a trailing `\r` stripped. No line is
/// emitted twice and no bytes are dropped except the delimiters.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning all lines it completes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::BufferOverflow`] when the peer never sends
    /// a delimiter and the carry buffer exceeds its bound.
    pub fn feed(&mut self, chunk: &[u8]) -> StreamResult<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop(); // the \n itself
            lines.push(decode_line(&line));
        }

        // Only the carried remainder is bounded; a large chunk that
        // delimits its lines is fine.
        if self.buffer.len() > MAX_LINE_BUFFER {
            return Err(StreamError::BufferOverflow);
        }

        Ok(lines)
    }

    /// Flush the carried partial line at end-of-stream, if any.
    ///
    /// A source that ends without a trailing newline still yields its
    /// last line exactly once.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let line = decode_line(&std::mem::take(&mut self.buffer));
        Some(line)
    }

    /// Number of bytes currently carried across chunk boundaries.
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = match bytes.last() {
        Some(b'\r') => &bytes[..bytes.len() - 1],
        _ => bytes,
    };
    String::from_utf8_lossy(bytes).into_owned()
}

pin_project! {
    /// Stream adapter yielding decoded lines from a byte stream.
    pub struct LineStream<S> {
        #[pin]
        inner: S,
        decoder: LineDecoder,
        pending: VecDeque<String>,
        finished: bool,
    }
}

impl<S> LineStream<S>
where
    S: Stream<Item = StreamResult<Bytes>>,
{
    /// Create a new line stream over a chunked byte stream.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            decoder: LineDecoder::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }
}

impl<S> Stream for LineStream<S>
where
    S: Stream<Item = StreamResult<Bytes>>,
{
    type Item = StreamResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(line) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(line)));
            }

            if *this.finished {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => match this.decoder.feed(&bytes) {
                    Ok(lines) => this.pending.extend(lines),
                    Err(error) => return Poll::Ready(Some(Err(error))),
                },
                Poll::Ready(Some(Err(error))) => return Poll::Ready(Some(Err(error))),
                Poll::Ready(None) => {
                    *this.finished = true;
                    if let Some(line) = this.decoder.finish() {
                        this.pending.push_back(line);
                    }
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

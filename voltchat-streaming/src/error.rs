//! Streaming errors.

use thiserror::Error;

/// Errors that can occur while consuming a response stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The transport failed mid-stream.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The peer sent an unbounded line; the decode buffer was exhausted.
    #[error("Line buffer overflow")]
    BufferOverflow,
}

impl StreamError {
    /// Create a transport error from any displayable cause.
    pub fn transport<E: std::fmt::Display>(err: E) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::BufferOverflow;
        assert_eq!(err.to_string(), "Line buffer overflow");

        let err = StreamError::transport("connection reset");
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }
}

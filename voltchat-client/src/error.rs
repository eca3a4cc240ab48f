//! Client errors.

use thiserror::Error;

/// Errors that can occur while running a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The endpoint answered with a non-success status.
    #[error("Assistant endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it could be read.
        body: String,
    },

    /// The request never produced a response.
    #[error("Failed to reach assistant endpoint: {0}")]
    Connect(#[from] reqwest::Error),
}

/// Result type for client operations.
pub type ChatResult<T> = Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ChatError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Assistant endpoint returned HTTP 503: unavailable"
        );
    }
}

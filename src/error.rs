//! Error types for generation attempts.

use std::time::Duration;

/// Errors that can occur while driving a generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum AntiGenError {
    /// Request rejected before anything was started (e.g. empty prompt).
    #[error("invalid request: {0}")]
    Validation(String),

    /// A generation attempt is already in flight on this session.
    #[error("a generation is already in progress")]
    Busy,

    /// The image endpoint returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No payload arrived within the deadline.
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    /// The payload was not a recognizable image.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// I/O error (e.g. saving the image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AntiGenError {
    /// Short notification text shown to the user when an attempt ends.
    ///
    /// Timeouts get a distinct message; every other remote failure collapses
    /// into a single retry suggestion.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Please enter a prompt first.",
            Self::Busy => "A generation is already running.",
            Self::Timeout(_) => "Generation is taking longer than usual, please try again later.",
            Self::Api { .. } | Self::Network(_) | Self::Decode(_) => {
                "Image generation failed, please try again later."
            }
            Self::Url(_) | Self::Io(_) | Self::Json(_) => "Something went wrong, please try again.",
        }
    }
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, AntiGenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AntiGenError::Api {
            status: 502,
            message: "Bad gateway".into(),
        };
        assert_eq!(err.to_string(), "API error: 502 - Bad gateway");

        let err = AntiGenError::Validation("prompt must not be empty".into());
        assert_eq!(err.to_string(), "invalid request: prompt must not be empty");

        let err = AntiGenError::Timeout(Duration::from_secs(40));
        assert_eq!(err.to_string(), "generation timed out after 40s");
    }

    #[test]
    fn test_user_message_distinguishes_timeouts() {
        let timeout = AntiGenError::Timeout(Duration::from_secs(40));
        let api = AntiGenError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_ne!(timeout.user_message(), api.user_message());
    }
}

//! Unified error type for mandalagen.

use thiserror::Error;

/// Errors that can occur while generating a mandala.
#[derive(Debug, Error)]
pub enum MandalaError {
    /// An API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A request exceeded its deadline.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Fetched bytes could not be decoded as an image.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Input rejected before any network call was made.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error replayed verbatim from a cassette.
    #[error("{0}")]
    Replay(String),

    /// No API key configured.
    #[error("No OpenAI API key. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The environment variable name.
        env_var: String,
    },
}

impl MandalaError {
    /// Whether a single bounded retry is worthwhile.
    ///
    /// Network failures, timeouts, and server-side (5xx) responses are
    /// transient. Credential and quota rejections (401/403/429) are not,
    /// and neither are validation or decode failures.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Map a reqwest error, distinguishing deadline expiry from other
/// transport failures.
pub fn from_reqwest(err: reqwest::Error, what: &str) -> MandalaError {
    if err.is_timeout() {
        MandalaError::Timeout(format!("{what}: {err}"))
    } else {
        MandalaError::Network(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        assert!(MandalaError::Api { status: 500, message: "oops".into() }.is_transient());
        assert!(MandalaError::Api { status: 503, message: "busy".into() }.is_transient());
    }

    #[test]
    fn credential_errors_are_not_transient() {
        assert!(!MandalaError::Api { status: 401, message: "bad API key".into() }.is_transient());
        assert!(!MandalaError::Api { status: 429, message: "quota".into() }.is_transient());
    }

    #[test]
    fn timeouts_are_transient() {
        assert!(MandalaError::Timeout("generation".into()).is_transient());
    }

    #[test]
    fn validation_and_decode_are_not_transient() {
        assert!(!MandalaError::Validation("empty word".into()).is_transient());
        assert!(!MandalaError::Decode("not an image".into()).is_transient());
        assert!(!MandalaError::Replay("replayed failure".into()).is_transient());
    }

    #[test]
    fn missing_key_message_mentions_api_key() {
        // The top-level credential hint keys off this substring.
        let msg = MandalaError::MissingApiKey { env_var: "OPENAI_API_KEY".into() }.to_string();
        assert!(msg.contains("API key"));
    }
}

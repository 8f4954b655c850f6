// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarvestError>;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to get token: {status} {body}")]
    Auth { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single page request. Kept apart from [`HarvestError`]
/// because the collector degrades these instead of propagating them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Rate limiting, the usual gateway/server errors and dropped connections
    /// are worth another attempt; everything else ends the query.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Status(status) => matches!(status, 429 | 500 | 502 | 503),
            FetchError::Transport(_) => true,
            FetchError::Decode(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        for status in [429, 500, 502, 503] {
            assert!(FetchError::Status(status).is_transient(), "{status}");
        }
        for status in [400, 401, 403, 404, 501] {
            assert!(!FetchError::Status(status).is_transient(), "{status}");
        }
    }

    #[test]
    fn test_transport_is_transient_decode_is_not() {
        assert!(FetchError::Transport("timed out".to_string()).is_transient());
        assert!(!FetchError::Decode("eof".to_string()).is_transient());
    }

    #[test]
    fn test_auth_error_message() {
        let err = HarvestError::Auth {
            status: 401,
            body: "invalid_client".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to get token: 401 invalid_client");
    }
}

// ABOUTME: Application-wide error type for d2ship.
// ABOUTME: Every deferred computation fails with one of these; Display is the user-facing message.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure: connection refused, DNS, timeout.
    #[error("{0}")]
    Transport(String),

    /// The remote answered with a non-2xx status.
    #[error("API error code: {status_text} ({status})")]
    Api { status: u16, status_text: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("cannot use same name for template and local image")]
    SameTemplateAndLocal,

    #[error("not a data image reference: {0}")]
    InvalidImage(String),

    #[error("no container matches {0}")]
    UnknownContainer(String),

    #[error("computation was abandoned before settling")]
    Abandoned,

    #[error("operation canceled")]
    Canceled,

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Build a transport error from an underlying message, falling back to a
    /// generic text when the message is empty.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Error::Transport("Unknown error".to_string())
        } else {
            Error::Transport(message)
        }
    }

    /// Build a transport error from `err` and every error in its source chain.
    pub fn transport_chain(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !text.is_empty() && !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Self::transport(message)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_carries_status_text_and_code() {
        let err = Error::Api {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "API error code: Not Found (404)");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn transport_chain_names_the_underlying_cause() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        ));
        assert_eq!(
            Error::transport_chain(&err).to_string(),
            "client error (Connect): connection refused"
        );
    }

    #[test]
    fn empty_transport_message_falls_back() {
        assert_eq!(Error::transport("").to_string(), "Unknown error");
        assert_eq!(
            Error::transport("connection refused").to_string(),
            "connection refused"
        );
    }
}

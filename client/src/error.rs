//! Error types for repository interaction and client configuration.

use std::fmt;

use thiserror::Error;

/// What went wrong talking to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Login was refused, or a request was rejected as unauthorized.
    Authentication,
    /// The request never produced a response: connection failure, timeout.
    Transport,
    /// The response does not follow the repository contract, e.g. a
    /// successful create without a `Location` header.
    Protocol,
    /// The repository answered a well-formed request with a non-success
    /// status.
    RemoteRejection,
    /// The operation does not apply to the publication's current state.
    InvalidState,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Authentication => "authentication",
            ErrorKind::Transport => "transport",
            ErrorKind::Protocol => "protocol",
            ErrorKind::RemoteRejection => "remote rejection",
            ErrorKind::InvalidState => "invalid state",
        })
    }
}

/// The single error surface of the repository client.
///
/// Callers branch on [`kind`](Self::kind); `body` keeps the response text
/// when the repository sent one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct ClientError {
    /// Error category.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: String,
    /// Response body, if any.
    pub body: Option<String>,
}

impl ClientError {
    /// An error without a response body.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    /// Attaches the response body. Empty bodies are dropped.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    /// A [`ErrorKind::Transport`] error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// A [`ErrorKind::Protocol`] error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Returns true for [`ErrorKind::Authentication`].
    pub fn is_authentication(&self) -> bool {
        self.kind == ErrorKind::Authentication
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::transport(format!("request timed out: {err}"))
        } else {
            ClientError::transport(err.to_string())
        }
    }
}

/// Failure loading a [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was read.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The TOML text is malformed or has the wrong shape.
    #[error("invalid client configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is present but unusable.
    #[error("invalid value for {field}: {message}")]
    Invalid {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

//! Error type shared by the codec, the transport and the client operations.

use thiserror::Error;

/// Errors returned by every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying HTTP stack failed (DNS, connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The Admin API answered with an unexpected status and an error envelope.
    #[error("{code}: {message}")]
    Server {
        status: u16,
        code: String,
        message: String,
    },

    /// The Admin API answered with an error envelope that lists no errors.
    #[error("server returned status {status} with an empty error list")]
    EmptyErrorEnvelope { status: u16 },

    /// Malformed JSON, or JSON whose shape does not match the expected document.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A predicate object must carry exactly one operator key besides its modifiers.
    #[error("predicate should have exactly one operator, found {keys:?}")]
    MalformedPredicate { keys: Vec<String> },

    /// A response object must carry exactly one type key besides its behaviors.
    #[error("response should have exactly one type, found {keys:?}")]
    MalformedResponse { keys: Vec<String> },

    #[error("unsupported predicate operator: {0}")]
    UnsupportedOperator(String),

    #[error("unsupported response type: {0}")]
    UnsupportedResponseType(String),

    #[error("unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// A `requestFrom` value that is neither an IP address nor a socket address.
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The caller's cancellation token fired before the call completed.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the call completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// True when the error was reported by the Admin API itself.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::EmptyErrorEnvelope { .. })
    }

    /// True when the call gave up because of a deadline or a transport timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::DeadlineExceeded => true,
            Error::Transport(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The `(code, message)` pair of a server-reported error.
    pub fn server_code(&self) -> Option<(&str, &str)> {
        match self {
            Error::Server { code, message, .. } => Some((code, message)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for seerr_sync.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for seerr_sync.
#[derive(Error, Debug)]
pub enum Error {
    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Server returned HTTP {code}: {message}")]
    Http { code: u16, message: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to parse server response: {0}")]
    Parse(String),

    // Local errors
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Server URL not configured. Set SEERR_URL or [server].url in config.toml")]
    ServerNotConfigured,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error from a string.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Classify a non-success HTTP status.
    ///
    /// 401 and 403 mean the session is unusable and are reported as `Auth`;
    /// everything else keeps its status code.
    pub fn from_status(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            401 | 403 => Error::Auth(message),
            _ => Error::Http { code, message },
        }
    }

    /// Whether the failure is a connectivity problem that may clear up on its own.
    ///
    /// Only these errors allow the detail path to fall back to cached data.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network(_) | Error::Timeout(_))
    }

    /// Whether the server rejected the request outright (4xx or auth).
    pub fn is_rejection(&self) -> bool {
        match self {
            Error::Http { code, .. } => (400..500).contains(code),
            Error::Auth(_) => true,
            _ => false,
        }
    }

    /// HTTP status code carried by this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Http { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Timeout(err.to_string());
        }
        if let Some(status) = err.status() {
            return Error::from_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return Error::Parse(err.to_string());
        }
        if err.is_connect() || err.is_request() {
            return Error::Network(err.to_string());
        }
        Error::Other(err.to_string())
    }
}

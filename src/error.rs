//! Error types for devpage
//!
//! Every call boundary (transport, decode, fetch, dispatch, pager) returns
//! `Result<T, Error>`. Nothing in this crate retries on any variant; retry
//! policy belongs to the consumer.

use thiserror::Error;

/// The main error type for devpage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Envelope / Transport Errors
    // ============================================================================
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Malformed response envelope: {message}")]
    MalformedEnvelope { message: String },

    #[error("Server error {code}: {message}")]
    Domain { code: i64, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Resource Errors
    // ============================================================================
    #[error("Unknown resource kind: {kind}")]
    UnknownResourceKind { kind: String },

    #[error("Invalid page request: {message}")]
    InvalidPageRequest { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a malformed envelope error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            message: message.into(),
        }
    }

    /// Create a server-signaled domain error
    pub fn domain(code: i64, message: impl Into<String>) -> Self {
        Self::Domain {
            code,
            message: message.into(),
        }
    }

    /// Create an unknown resource kind error
    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownResourceKind { kind: kind.into() }
    }

    /// Create an invalid page request error
    pub fn invalid_page(message: impl Into<String>) -> Self {
        Self::InvalidPageRequest {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Server status code, for domain errors
    pub fn domain_code(&self) -> Option<i64> {
        match self {
            Error::Domain { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the server rejected the credential
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.domain_code(), Some(401 | 403))
    }
}

/// Result type alias for devpage
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

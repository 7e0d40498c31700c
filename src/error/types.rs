//! Error type definitions
//!
//! Defines the main error types used throughout the poll bot.

use thiserror::Error;

/// Main error type for the poll bot
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors (unsupported login type, bad settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Login failed (bad credentials, missing SAML assertion, missing auth token)
    #[error("Login error: {0}")]
    Login(String),

    /// The configured poll host does not exist
    #[error("'{host}' is not a valid poll host")]
    UnknownHost { host: String },

    /// No firehose token could be obtained for the host
    #[error(
        "no firehose token for '{host}'; verify the host is correct and that \
         this session has joined the presenter context"
    )]
    MissingToken { host: String },

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new login error
    pub fn login(msg: impl Into<String>) -> Self {
        Self::Login(msg.into())
    }

    /// Create an unknown-host error
    pub fn unknown_host(host: impl Into<String>) -> Self {
        Self::UnknownHost { host: host.into() }
    }

    /// Create a missing-token error
    pub fn missing_token(host: impl Into<String>) -> Self {
        Self::MissingToken { host: host.into() }
    }
}

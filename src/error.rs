//! Error types for sentence-harvest
//!
//! This module provides error handling for the library:
//! - A single [`Error`] enum covering input, credential, network and export failures
//! - A coarse [`ErrorKind`] grouping so callers can react without matching every variant
//!
//! Sentence extraction never fails. A subject without sentences is a valid,
//! silent outcome and has no error variant.

use thiserror::Error;

/// Result type alias for sentence-harvest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for sentence-harvest
#[derive(Debug, Error)]
pub enum Error {
    /// The level specification produced no usable levels
    #[error("invalid level specification: {input:?} contains no valid levels")]
    InvalidLevels {
        /// The raw specification string supplied by the caller
        input: String,
    },

    /// Export mode name not recognised
    #[error("unknown export mode '{0}' (expected japanese-only, english-only, bilingual or json-full)")]
    InvalidExportMode(String),

    /// Export requested before any successful fetch
    #[error("no fetched results to export")]
    NoResults,

    /// No API token is available from the credential source
    #[error("missing API token: configure a credential before fetching")]
    MissingCredential,

    /// Credential store could not be read or written
    #[error("credential store error: {0}")]
    Credential(String),

    /// Upstream API answered with a non-success status
    #[error("HTTP error {status} {status_text} for {url}")]
    Http {
        /// Numeric HTTP status code
        status: u16,
        /// Canonical reason phrase for the status (may be empty)
        status_text: String,
        /// The URL that was requested
        url: String,
    },

    /// Transport-level failure (connect, timeout, body decode)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream cursor chain did not terminate
    #[error("pagination error: {0}")]
    Pagination(String),

    /// A request URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// An export file could not be handed to the delivery sink
    #[error("delivery error: {0}")]
    Delivery(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unparseable or empty level specification
    Input,
    /// Missing or unreadable credential
    Auth,
    /// Non-success HTTP status or transport failure
    Network,
    /// Export serialization or delivery failure
    Export,
    /// Configuration or unexpected internal failure
    Internal,
}

impl Error {
    /// Build a configuration error for a specific key
    pub fn config(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidLevels { .. } | Error::InvalidExportMode(_) | Error::NoResults => {
                ErrorKind::Input
            }
            Error::MissingCredential | Error::Credential(_) => ErrorKind::Auth,
            Error::Http { .. } | Error::Network(_) | Error::Pagination(_) => ErrorKind::Network,
            Error::Delivery(_) | Error::Io(_) => ErrorKind::Export,
            Error::InvalidUrl(_)
            | Error::Config { .. }
            | Error::Serialization(_)
            | Error::Other(_) => ErrorKind::Internal,
        }
    }

    /// HTTP status code, if this error came from a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

//! Error types for the DDNS refresh
//!
//! This module defines all error types used throughout the workspace.

use crate::traits::IpVersion;
use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS refresh
#[derive(Error, Debug)]
pub enum Error {
    /// IP source-related errors (never fatal for the run)
    #[error("IP source error: {0}")]
    IpSource(String),

    /// Hostname or registrable domain could not be determined
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (transport, client construction)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Zone or record not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// A create/update/delete for one address family failed
    #[error("Failed to update {family} DNS record: {source}")]
    Reconcile {
        /// Address family whose record could not be reconciled
        family: IpVersion,
        /// The underlying provider error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an IP source error
    pub fn ip_source(msg: impl Into<String>) -> Self {
        Self::IpSource(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Wrap a provider error as the failure of one address family
    pub fn reconcile(family: IpVersion, source: Error) -> Self {
        Self::Reconcile {
            family,
            source: Box::new(source),
        }
    }

    /// Whether this error happened before any work could be attempted
    ///
    /// Configuration and authentication problems are operator mistakes;
    /// everything else is a runtime failure of an otherwise valid setup.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Authentication(_))
    }
}

//! Error types for boot proxy calls
//!
//! Callers in the orchestration core only distinguish success from failure;
//! the variants exist for logs and operators.

use thiserror::Error;

/// Error type for boot proxy operations
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Endpoint URL cannot be used as an API base
    #[error("invalid proxy endpoint: {0}")]
    InvalidEndpoint(String),

    /// Request never got a response
    #[error("transport error talking to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Proxy answered with a non-success status
    #[error("proxy rejected request to {url} with {status}: {body}")]
    Rejected {
        url: String,
        status: u16,
        body: String,
    },

    /// Failure reported by a non-HTTP proxy implementation
    #[error("proxy {endpoint} failed: {message}")]
    Failed { endpoint: String, message: String },
}

/// Result type for boot proxy operations
pub type Result<T> = std::result::Result<T, ProxyError>;

//! Errors returned by the injected capabilities.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the normalization, persistence and print capabilities.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never got an answer.
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status.
    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The server answered but refused the request; the message is its own.
    #[error("{0}")]
    Rejected(String),

    /// The answer did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// A document handed to the printer could not be decoded.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//! Error types for the request builder.
//!
//! # Design
//! Building a descriptor never fails. Only the helpers that convert between
//! descriptors and wire text can, so this enum stays small: parsing a method
//! name, and encoding a body as JSON.

use thiserror::Error;

/// Errors returned by the fallible helpers on `HttpRequest` and `HttpMethod`.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The string is not one of the HTTP methods this crate models.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// The request body could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

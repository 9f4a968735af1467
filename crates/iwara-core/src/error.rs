//! Error types for the iwara scraper
//!
//! Every failure inside the core is one of these variants. The facade turns
//! them into [`Response::Failure`](crate::Response) using their display text,
//! so the messages are written to be shown to a user as-is.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for all iwara scraper operations
#[derive(Error, Debug)]
pub enum IwaraError {
    /// Transport-level failure (connect, timeout, body read, ...)
    #[error("HTTP request failed ({kind}): {0}", kind = transport_kind(.0))]
    HttpError(#[from] reqwest::Error),

    /// Server answered with a status the operation does not accept
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// Login endpoint rejected the username/password pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A structurally required element or attribute is missing from the page
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Page content was found but could not be interpreted
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// JSON body from the remote service could not be decoded
    #[error("Failed to decode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid identifier or query provided by the caller
    #[error("Invalid ID: {0}")]
    InvalidId(String),
}

impl IwaraError {
    /// Shorthand for [`IwaraError::MissingField`]
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

/// Classifies a transport error for the user-facing message
fn transport_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_body() {
        "body"
    } else if error.is_decode() {
        "decode"
    } else if error.is_status() {
        "status"
    } else {
        "request"
    }
}

impl Serialize for IwaraError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for iwara operations
pub type Result<T> = std::result::Result<T, IwaraError>;

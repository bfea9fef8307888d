//! Shared Error Types
//!
//! Errors that describe bad input rather than server failures. They are raised
//! while decoding wire payloads (relay frames, request bodies) and are safe to
//! show to the client verbatim.
//!
//! # Error Categories
//!
//! - `SerializationError` - the payload is not the JSON shape we expect
//! - `ValidationError` - a required field is missing, blank or malformed
//! - `MessageError` - the frame itself is unusable (e.g. binary relay frame)
//!
//! # Usage
//!
//! ```rust
//! use boosty::shared::error::SharedError;
//!
//! let error = SharedError::validation("recipientId", "is required");
//! assert!(error.to_string().contains("recipientId"));
//! ```
use thiserror::Error;

/// Input errors shared by the HTTP handlers and the messaging relay
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// JSON decoding failed
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// A field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The wire name of the offending field
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// The frame could not be interpreted at all
    #[error("Message error: {message}")]
    MessageError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for the "required field absent" case
    pub fn missing(field: impl Into<String>) -> Self {
        Self::validation(field, "is required")
    }

    /// Create a new message error
    pub fn message(message: impl Into<String>) -> Self {
        Self::MessageError {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

/// Return the value if it is present and not blank, otherwise a `missing` error
pub fn required(value: Option<String>, field: &str) -> Result<String, SharedError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SharedError::missing(field)),
    }
}

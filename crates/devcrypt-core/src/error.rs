//! Error types for devcrypt core.

use thiserror::Error;

/// Errors that can occur in key handling, sealing and content encryption.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed text, PEM, base64 or hex input.
    #[error("invalid {context}: {reason}")]
    Decode { context: String, reason: String },

    /// A single-line field (label, filename) contained a newline.
    #[error("{0} may not contain newlines")]
    EmbeddedNewline(&'static str),

    /// An AEAD tag or sealed box did not verify. A wrong key and corrupted
    /// data report the same error.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Encryption could not be performed.
    #[error("encryption error: {0}")]
    Encryption(String),
}

impl CoreError {
    /// Build a [`CoreError::Decode`] with the given context.
    pub fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

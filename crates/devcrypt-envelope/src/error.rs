//! Error types for encrypted files.

use devcrypt_core::CoreError;
use thiserror::Error;

/// Errors that can occur while reading, writing or modifying an encrypted file.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// A key box line in a container could not be parsed.
    #[error("line {line}: {source}")]
    Line {
        /// 1-based line number in the container.
        line: usize,
        #[source]
        source: CoreError,
    },

    /// The recipient already has a key box.
    #[error("recipient already present: {0}")]
    RecipientAlreadyPresent(String),

    /// The recipient has no key box.
    #[error("recipient not found: {0}")]
    RecipientNotFound(String),

    /// No key box is sealed to the given private key.
    #[error("no key box matches private key {label:?}")]
    NoMatchingEnvelope { label: String },

    /// Writing the container failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EnvelopeError {
    /// True if this is an authentication failure from the sealer or cipher.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Core(CoreError::AuthenticationFailed))
    }
}

/// Result type for encrypted file operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;

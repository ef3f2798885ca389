//! Error types for devcrypt operations.

use std::path::PathBuf;

use devcrypt_core::CoreError;
use devcrypt_envelope::EnvelopeError;
use devcrypt_store::StoreError;
use thiserror::Error;

/// Errors that can occur during devcrypt operations.
#[derive(Debug, Error)]
pub enum DevcryptError {
    /// Key or content error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Encrypted file error.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A key file exists but could not be decoded.
    #[error("key file {}: {source}", path.display())]
    InvalidKeyFile {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    /// Refused to overwrite an existing private key.
    #[error("key file {} already exists; use --force to replace it", .0.display())]
    KeyExists(PathBuf),

    /// No output given and the input lacks the encrypted file suffix.
    #[error("encrypted file {} has no {suffix} suffix; specify an output instead", path.display())]
    NoSuffix { path: PathBuf, suffix: String },

    /// A removal selector matched no recipient.
    #[error("no recipient matches {0:?}")]
    NoMatchingRecipient(String),

    /// Removal would leave the file with no recipients.
    #[error("refusing to remove every recipient")]
    LastRecipient,
}

/// Result type for devcrypt operations.
pub type Result<T> = std::result::Result<T, DevcryptError>;

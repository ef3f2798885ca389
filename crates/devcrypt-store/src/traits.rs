//! Store trait: the interface the facade persists files through.

use std::path::Path;

use crate::error::Result;

/// Who may read a persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Owner only (private keys, decrypted plaintext).
    Private,
    /// World-readable (public keys, encrypted containers).
    Public,
}

impl Access {
    /// Unix permission bits for this access level.
    pub const fn mode(self) -> u32 {
        match self {
            Self::Private => 0o600,
            Self::Public => 0o644,
        }
    }
}

/// Synchronous file persistence.
///
/// # Design Notes
///
/// - **Atomic replace**: `persist` either leaves the old content or the new
///   content at `path`, never a partial write.
/// - **Last writer wins**: concurrent writers to one path are not serialized.
pub trait Store: Send + Sync {
    /// Read the whole file at `path`.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if there
    /// is nothing at `path`.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Check whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Atomically replace the file at `path` with `bytes`.
    ///
    /// Missing parent directories are created.
    fn persist(&self, path: &Path, bytes: &[u8], access: Access) -> Result<()>;
}

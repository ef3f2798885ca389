//! Filesystem implementation of the Store trait.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};
use crate::traits::{Access, Store};

/// Store backed by the local filesystem.
///
/// Writes go to a temporary file `.<name>.*.tmp` next to the target, which
/// is synced and renamed over it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    /// Create a filesystem store.
    pub fn new() -> Self {
        Self
    }
}

impl Store for FsStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tracing::debug!(path = %path.display(), "reading file");
        fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
            _ => StoreError::io(path, e),
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn persist(&self, path: &Path, bytes: &[u8], access: Access) -> Result<()> {
        let name = path
            .file_name()
            .ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let prefix = format!(".{}.", name.to_string_lossy());
        let mut temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| StoreError::io(&dir, e))?;
        tracing::debug!(
            path = %path.display(),
            temp = %temp.path().display(),
            len = bytes.len(),
            "writing file"
        );

        temp.write_all(bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| StoreError::io(temp.path(), e))?;
        set_access(temp.path(), access)?;

        // On failure the temp file is removed when the returned handle drops.
        temp.persist(path)
            .map_err(|e| StoreError::io(path, e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn set_access(path: &Path, access: Access) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(access.mode()))
        .map_err(|e| StoreError::io(path, e))
}

#[cfg(not(unix))]
fn set_access(_path: &Path, _access: Access) -> Result<()> {
    Ok(())
}

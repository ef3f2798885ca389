//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as the
//! filesystem store but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::traits::{Access, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<PathBuf, StoredFile>>,
}

#[derive(Debug, Clone)]
struct StoredFile {
    bytes: Vec<u8>,
    access: Access,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Access level the file at `path` was last persisted with.
    pub fn access(&self, path: &Path) -> Option<Access> {
        let files = self.files.read().unwrap();
        files.get(path).map(|file| file.access)
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.read().unwrap().len()
    }

    /// True if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let files = self.files.read().unwrap();
        files
            .get(path)
            .map(|file| file.bytes.clone())
            .ok_or_else(|| StoreError::NotFound(path.to_path_buf()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn persist(&self, path: &Path, bytes: &[u8], access: Access) -> Result<()> {
        if path.file_name().is_none() {
            return Err(StoreError::InvalidPath(path.to_path_buf()));
        }

        let mut files = self.files.write().unwrap();
        files.insert(
            path.to_path_buf(),
            StoredFile {
                bytes: bytes.to_vec(),
                access,
            },
        );
        Ok(())
    }
}

//! # devcrypt Store
//!
//! Persistence for devcrypt. Provides a trait-based interface for reading and
//! atomically replacing files, with filesystem and in-memory implementations,
//! plus resolution of the user's key file locations.
//!
//! ## Key Types
//!
//! - [`Store`] - The trait for all file persistence
//! - [`FsStore`] - Local filesystem with atomic rename
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`KeyPathConfig`] / [`KeyPaths`] - Where the user's key pair lives
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use devcrypt_store::{Access, FsStore, KeyPathConfig, Store};
//!
//! let paths = KeyPathConfig::default().resolve().unwrap();
//! println!("private key at {}", paths.private_key.display());
//!
//! let store = FsStore::new();
//! store.persist(Path::new("notes.txt"), b"hello", Access::Private).unwrap();
//! ```

pub mod error;
pub mod fs;
pub mod memory;
pub mod paths;
pub mod traits;

pub use error::{Result, StoreError};
pub use fs::FsStore;
pub use memory::MemoryStore;
pub use paths::{default_config_dir, public_key_path, KeyPathConfig, KeyPaths, DEFAULT_KEY_FILE};
pub use traits::{Access, Store};

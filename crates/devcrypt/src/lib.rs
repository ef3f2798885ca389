//! # devcrypt
//!
//! Encrypt development secrets so that they can be committed alongside the
//! code that uses them, readable by every listed teammate and nobody else.
//!
//! ## Overview
//!
//! Each encrypted file carries its own random file key, sealed once per
//! recipient. Recipients can be added, removed and rotated without touching
//! anyone's private key but your own.
//!
//! - **Keys**: a labelled X25519 key pair per user, stored under the config
//!   directory
//! - **Encrypted files**: key box lines followed by armored chunked ciphertext
//! - **Recipients**: adding needs the file key, removing does not
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use devcrypt::{Devcrypt, DevcryptConfig};
//! use devcrypt::store::{FsStore, KeyPathConfig};
//!
//! let key_paths = KeyPathConfig::default().resolve().unwrap();
//! let devcrypt = Devcrypt::new(FsStore::new(), DevcryptConfig::new(key_paths));
//!
//! devcrypt.keygen("alice@laptop", false).unwrap();
//! let report = devcrypt.encrypt(Path::new(".env"), None).unwrap();
//! devcrypt.decrypt(&report.output, None).unwrap();
//! ```
//!
//! ## Re-exports
//!
//! - `devcrypt::core` - Keys, sealing and chunked encryption
//! - `devcrypt::envelope` - Encrypted files and their container format
//! - `devcrypt::store` - Persistence and key path resolution

pub mod devcrypt;
pub mod error;

// Re-export component crates
pub use devcrypt_core as core;
pub use devcrypt_envelope as envelope;
pub use devcrypt_store as store;

// Re-export main types for convenience
pub use crate::devcrypt::{Devcrypt, DevcryptConfig, EncryptReport, FileInfo, DEFAULT_SUFFIX};
pub use error::{DevcryptError, Result};

// Re-export commonly used types
pub use devcrypt_core::{PrivateKey, PublicKey};
pub use devcrypt_store::{Access, FsStore, KeyPathConfig, KeyPaths, MemoryStore, Store};

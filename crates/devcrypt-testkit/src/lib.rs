//! # devcrypt Testkit
//!
//! Testing utilities for devcrypt.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Vectors**: Known key encodings and a known encrypted file
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Deterministic recipients and ready-made shared files
//!
//! ## Vectors
//!
//! ```rust
//! use devcrypt_testkit::vectors::verify_all_vectors;
//!
//! verify_all_vectors().unwrap();
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use devcrypt_testkit::generators::{file_key, plaintext};
//!
//! proptest! {
//!     #[test]
//!     fn chunks_round_trip(key in file_key(), data in plaintext(4096)) {
//!         let content = devcrypt_core::chunk::encrypt(&data, &key).unwrap();
//!         let opened = devcrypt_core::chunk::decrypt(&content.ciphertext, &content.nonce, &key).unwrap();
//!         prop_assert_eq!(opened, data);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use devcrypt_testkit::fixtures::{shared_file, team};
//!
//! let members = team(&["alice", "bob"]);
//! let file = shared_file("app.env", b"TOKEN=1", &members);
//! assert_eq!(file.public_keys().len(), 2);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{key_paths, plaintext, shared_file, team, TestRecipient};
pub use vectors::{content_vectors, key_vectors, verify_all_vectors, ContentVector, KeyVector};

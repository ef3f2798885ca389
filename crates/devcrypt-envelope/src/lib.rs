//! # devcrypt Envelope
//!
//! Multi-recipient encrypted files.
//!
//! A file's content is encrypted once under a random file key. That key is
//! sealed separately to every recipient's public key, one key box per
//! recipient, and the key boxes are stored as plain text lines above the
//! armored ciphertext.
//!
//! ## Lifecycle
//!
//! - [`UnsealedFile::new`] starts a file with a fresh key and no recipients.
//! - [`ContainerFile::decode`] reads a stored file. Recipients, filename and
//!   plaintext size are visible without any key.
//! - [`ContainerFile::unseal`] recovers the file key with a recipient's
//!   private key, giving an [`UnsealedFile`] that can decrypt, re-encrypt,
//!   add recipients and rotate its key.
//!
//! ## Usage
//!
//! ```rust
//! use devcrypt_core::generate_keys;
//! use devcrypt_envelope::{ContainerFile, UnsealedFile};
//!
//! let (public_key, private_key) = generate_keys("alice@laptop").unwrap();
//!
//! let mut file = UnsealedFile::new("secret.txt").unwrap();
//! file.add_recipient(&public_key).unwrap();
//! file.encrypt_content(b"hello").unwrap();
//!
//! let stored = file.as_container().to_bytes();
//! let container = ContainerFile::from_bytes(&stored).unwrap();
//! let opened = container.unseal(&private_key).unwrap();
//! assert_eq!(opened.decrypt_content().unwrap(), b"hello");
//! ```

pub mod container;
pub mod error;
pub mod keybox;
pub mod unsealed;

pub use container::{ContainerFile, ENCRYPTED_FILE_BLOCK_TYPE};
pub use error::{EnvelopeError, Result};
pub use keybox::{KeyBox, KEYBOX_TAG};
pub use unsealed::{EncryptResult, UnsealedFile};

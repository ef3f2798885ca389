//! # devcrypt Core
//!
//! Pure primitives for devcrypt: keys, sealed boxes, chunked encryption and
//! the PEM-style armor used by the on-disk formats.
//!
//! This crate contains no I/O. Everything is computation over in-memory byte
//! buffers.
//!
//! ## Key Types
//!
//! - [`PublicKey`] / [`PrivateKey`] - Labelled X25519 keys with text encodings
//! - [`FileKey`] - The 256-bit symmetric key that encrypts one file's content
//! - [`EncryptedContent`] - Chunked ciphertext plus its base nonce and MAC
//!
//! ## Encryption Model
//!
//! 1. **File key**: random per file, encrypts content in 16 KiB chunks with
//!    NaCl secretbox, XSalsa20-Poly1305 ([`chunk`])
//! 2. **Sealed boxes**: the file key is sealed to each recipient's X25519
//!    public key with an anonymous crypto_box ([`seal`])
//!
//! ## Usage
//!
//! ```rust
//! use devcrypt_core::{chunk, generate_keys, seal, FileKey};
//!
//! let (public_key, private_key) = generate_keys("alice@laptop").unwrap();
//!
//! let file_key = FileKey::generate();
//! let content = chunk::encrypt(b"API_TOKEN=hunter2", &file_key).unwrap();
//!
//! let sealed = seal::seal(&file_key, &public_key).unwrap();
//! let opened = seal::unseal(&sealed, &public_key, &private_key).unwrap();
//!
//! let plaintext = chunk::decrypt(&content.ciphertext, &content.nonce, &opened).unwrap();
//! assert_eq!(plaintext, b"API_TOKEN=hunter2");
//! ```

pub mod armor;
pub mod chunk;
pub mod error;
pub mod keys;
pub mod seal;
pub mod text;

pub use armor::Block;
pub use chunk::{BaseNonce, EncryptedContent, Mac, CHUNK_SIZE, NONCE_SIZE, TAG_SIZE};
pub use error::{CoreError, Result};
pub use keys::{generate_keys, FileKey, PrivateKey, PublicKey, KEY_SIZE};
pub use seal::SEAL_OVERHEAD;

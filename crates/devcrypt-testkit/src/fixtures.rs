//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::path::Path;

use devcrypt_core::{FileKey, PrivateKey, PublicKey};
use devcrypt_envelope::UnsealedFile;
use devcrypt_store::{public_key_path, Access, KeyPaths, Store, DEFAULT_KEY_FILE};

/// A recipient with both halves of its key pair.
#[derive(Debug, Clone)]
pub struct TestRecipient {
    pub public_key: PublicKey,
    pub private_key: PrivateKey,
}

impl TestRecipient {
    /// Create with a deterministic key pair from seed.
    pub fn from_seed(label: &str, seed: [u8; 32]) -> Self {
        let private_key = PrivateKey::from_bytes(label, seed).expect("label must be one line");
        Self {
            public_key: private_key.public_key(),
            private_key,
        }
    }

    /// Create with a random key pair.
    pub fn generate(label: &str) -> Self {
        let (public_key, private_key) =
            devcrypt_core::generate_keys(label).expect("label must be one line");
        Self {
            public_key,
            private_key,
        }
    }

    /// The recipient's label.
    pub fn label(&self) -> &str {
        self.public_key.label()
    }

    /// Write this key pair where `paths` points, as keygen would.
    pub fn install(&self, store: &dyn Store, paths: &KeyPaths) {
        store
            .persist(
                &paths.private_key,
                self.private_key.encode().as_bytes(),
                Access::Private,
            )
            .expect("persist private key");
        self.write_public_key(store, &paths.public_key);
    }

    /// Write the public key line to `path`.
    pub fn write_public_key(&self, store: &dyn Store, path: &Path) {
        let line = format!("{}\n", self.public_key.encode());
        store
            .persist(path, line.as_bytes(), Access::Public)
            .expect("persist public key");
    }
}

/// Deterministic recipients, one per label, seeded `[1; 32]`, `[2; 32]`, ...
pub fn team(labels: &[&str]) -> Vec<TestRecipient> {
    labels
        .iter()
        .zip(1u8..)
        .map(|(label, i)| TestRecipient::from_seed(label, [i; 32]))
        .collect()
}

/// Key paths inside `dir`, laid out like the default config directory.
pub fn key_paths(dir: &Path) -> KeyPaths {
    let private_key = dir.join(DEFAULT_KEY_FILE);
    KeyPaths {
        public_key: public_key_path(&private_key),
        private_key,
    }
}

/// Deterministic, non-repeating-looking plaintext of `len` bytes.
pub fn plaintext(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i.wrapping_mul(31) ^ (i >> 8)) as u8)
        .collect()
}

/// A new file readable by every member of `recipients`, holding `content`.
pub fn shared_file(filename: &str, content: &[u8], recipients: &[TestRecipient]) -> UnsealedFile {
    let mut file = UnsealedFile::new(filename).expect("filename must be one line");
    for recipient in recipients {
        file.add_recipient(&recipient.public_key)
            .expect("recipients must be distinct");
    }
    file.encrypt_content(content).expect("encrypt content");
    file
}

/// A file key from a seed byte.
pub fn file_key(seed: u8) -> FileKey {
    FileKey::from_bytes([seed; 32])
}

//! Devcrypt: the file-level operations behind the command line.
//!
//! Every operation reads and writes through a [`Store`], resolving the
//! user's key pair from [`DevcryptConfig`].

use std::path::{Path, PathBuf};

use devcrypt_core::{generate_keys, PrivateKey, PublicKey};
use devcrypt_envelope::{ContainerFile, EncryptResult, UnsealedFile};
use devcrypt_store::{Access, KeyPaths, Store};
use serde::Serialize;

use crate::error::{DevcryptError, Result};

/// Suffix appended to encrypted files by default.
pub const DEFAULT_SUFFIX: &str = ".devcrypt";

/// Configuration for Devcrypt.
#[derive(Debug, Clone)]
pub struct DevcryptConfig {
    /// Where the user's key pair lives.
    pub key_paths: KeyPaths,
    /// Suffix of encrypted files.
    pub suffix: String,
}

impl DevcryptConfig {
    /// Configuration with the default suffix.
    pub fn new(key_paths: KeyPaths) -> Self {
        Self {
            key_paths,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

/// Outcome of [`Devcrypt::encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptReport {
    /// Path of the encrypted file.
    pub output: PathBuf,
    /// False if the plaintext was unchanged and nothing was written.
    pub changed: bool,
}

/// Key-free summary of an encrypted file.
#[derive(Debug, Clone, Serialize)]
pub struct FileInfo {
    /// Path the container was read from.
    pub path: PathBuf,
    /// Name of the file the container was created for.
    pub filename: String,
    /// Plaintext size, `None` if the ciphertext is malformed.
    pub plaintext_size: Option<usize>,
    /// Recipients in key box order.
    pub recipients: Vec<PublicKey>,
}

/// The main Devcrypt struct.
pub struct Devcrypt<S: Store> {
    store: S,
    config: DevcryptConfig,
}

impl<S: Store> Devcrypt<S> {
    /// Create a new instance.
    pub fn new(store: S, config: DevcryptConfig) -> Self {
        Self { store, config }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &DevcryptConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keys
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate and store the user's key pair.
    ///
    /// Refuses to replace an existing private key unless `force` is set.
    pub fn keygen(&self, label: &str, force: bool) -> Result<PublicKey> {
        let paths = &self.config.key_paths;
        if !force && self.store.exists(&paths.private_key) {
            tracing::warn!(path = %paths.private_key.display(), "refusing to overwrite key");
            return Err(DevcryptError::KeyExists(paths.private_key.clone()));
        }

        let (public_key, private_key) = generate_keys(label)?;
        self.store.persist(
            &paths.private_key,
            private_key.encode().as_bytes(),
            Access::Private,
        )?;

        let mut line = public_key.encode();
        line.push('\n');
        self.store
            .persist(&paths.public_key, line.as_bytes(), Access::Public)?;

        tracing::info!(
            label,
            private_key = %paths.private_key.display(),
            public_key = %paths.public_key.display(),
            "generated key pair"
        );
        Ok(public_key)
    }

    /// Read a public key file.
    pub fn read_public_key(&self, path: &Path) -> Result<PublicKey> {
        let data = self.store.read(path)?;
        let text = String::from_utf8_lossy(&data);
        PublicKey::decode(&text).map_err(|source| DevcryptError::InvalidKeyFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The user's public key.
    pub fn user_public_key(&self) -> Result<PublicKey> {
        self.read_public_key(&self.config.key_paths.public_key)
    }

    /// The user's private key.
    pub fn user_private_key(&self) -> Result<PrivateKey> {
        let path = &self.config.key_paths.private_key;
        let data = self.store.read(path)?;
        PrivateKey::decode(&data).map_err(|source| DevcryptError::InvalidKeyFile {
            path: path.clone(),
            source,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────────────────

    /// Encrypt `input` to `output`, default `<input><suffix>`.
    ///
    /// An existing output is unsealed with the user's key and updated in
    /// place, keeping its recipients. Otherwise a new file is started with the
    /// user as sole recipient.
    pub fn encrypt(&self, input: &Path, output: Option<&Path>) -> Result<EncryptReport> {
        let output = match output {
            Some(output) => output.to_path_buf(),
            None => self.encrypted_path(input),
        };

        let mut file = if self.store.exists(&output) {
            tracing::debug!(output = %output.display(), "updating existing encrypted file");
            self.unseal(&output)?
        } else {
            tracing::debug!(output = %output.display(), "creating encrypted file");
            let mut file = UnsealedFile::new(file_name(input))?;
            file.add_recipient(&self.user_public_key()?)?;
            file
        };

        let plaintext = self.store.read(input)?;
        let result = file.encrypt_content(&plaintext)?;
        if result == EncryptResult::Unchanged {
            tracing::debug!(output = %output.display(), "plaintext unchanged");
            return Ok(EncryptReport {
                output,
                changed: false,
            });
        }

        self.write_container(&output, file.as_container())?;
        tracing::info!(input = %input.display(), output = %output.display(), "encrypted file");
        Ok(EncryptReport {
            output,
            changed: true,
        })
    }

    /// Decrypt `input` to `output`, default `input` without its suffix.
    pub fn decrypt(&self, input: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let output = match output {
            Some(output) => output.to_path_buf(),
            None => self.decrypted_path(input)?,
        };

        let file = self.unseal(input)?;
        let plaintext = file.decrypt_content()?;
        self.store.persist(&output, &plaintext, Access::Private)?;

        tracing::info!(input = %input.display(), output = %output.display(), "decrypted file");
        Ok(output)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Recipients
    // ─────────────────────────────────────────────────────────────────────────

    /// Add recipients. Fails without writing if any is already present.
    pub fn add(&self, input: &Path, public_keys: &[PublicKey]) -> Result<()> {
        let mut file = self.unseal(input)?;
        for public_key in public_keys {
            tracing::debug!(label = public_key.label(), "adding recipient");
            file.add_recipient(public_key)?;
        }

        self.write_container(input, file.as_container())?;
        tracing::info!(input = %input.display(), added = public_keys.len(), "added recipients");
        Ok(())
    }

    /// Remove recipients matched by base64 key or by label.
    ///
    /// Needs no private key. Every selector must match at least one
    /// recipient, and at least one recipient must remain.
    pub fn remove<T: AsRef<str>>(&self, input: &Path, selectors: &[T]) -> Result<Vec<PublicKey>> {
        let mut container = self.read_container(input)?;
        let recipients = container.public_keys();

        let mut removed = Vec::new();
        for selector in selectors {
            let selector = selector.as_ref();
            let matches: Vec<&PublicKey> = recipients
                .iter()
                .filter(|key| key.key_base64() == selector || key.label() == selector)
                .collect();
            if matches.is_empty() {
                return Err(DevcryptError::NoMatchingRecipient(selector.to_string()));
            }

            for public_key in matches {
                if removed.contains(public_key) {
                    continue;
                }
                tracing::debug!(label = public_key.label(), "removing recipient");
                container.remove_recipient(public_key)?;
                removed.push(public_key.clone());
            }
        }

        if container.key_boxes().is_empty() {
            tracing::warn!(input = %input.display(), "refusing to remove every recipient");
            return Err(DevcryptError::LastRecipient);
        }

        self.write_container(input, &container)?;
        tracing::info!(input = %input.display(), removed = removed.len(), "removed recipients");
        Ok(removed)
    }

    /// Replace the file key and re-encrypt.
    pub fn rotate(&self, input: &Path) -> Result<()> {
        let mut file = self.unseal(input)?;
        file.rotate_file_key()?;
        self.write_container(input, file.as_container())?;

        tracing::info!(input = %input.display(), "rotated file key");
        Ok(())
    }

    /// Describe an encrypted file without decrypting it.
    pub fn info(&self, input: &Path) -> Result<FileInfo> {
        let container = self.read_container(input)?;
        Ok(FileInfo {
            path: input.to_path_buf(),
            filename: container.filename().to_string(),
            plaintext_size: container.plaintext_len(),
            recipients: container.public_keys(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn read_container(&self, path: &Path) -> Result<ContainerFile> {
        let data = self.store.read(path)?;
        Ok(ContainerFile::from_bytes(&data)?)
    }

    fn unseal(&self, path: &Path) -> Result<UnsealedFile> {
        let private_key = self.user_private_key()?;
        let container = self.read_container(path)?;
        Ok(container.unseal(&private_key)?)
    }

    fn write_container(&self, path: &Path, container: &ContainerFile) -> Result<()> {
        self.store
            .persist(path, &container.to_bytes(), Access::Public)?;
        Ok(())
    }

    fn encrypted_path(&self, input: &Path) -> PathBuf {
        let mut path = input.as_os_str().to_owned();
        path.push(&self.config.suffix);
        PathBuf::from(path)
    }

    fn decrypted_path(&self, input: &Path) -> Result<PathBuf> {
        let suffix = &self.config.suffix;
        input
            .to_str()
            .and_then(|s| s.strip_suffix(suffix.as_str()))
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| DevcryptError::NoSuffix {
                path: input.to_path_buf(),
                suffix: suffix.clone(),
            })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrypt_store::MemoryStore;

    fn devcrypt() -> Devcrypt<MemoryStore> {
        let key_paths = KeyPaths {
            private_key: PathBuf::from("/keys/devcrypt_key"),
            public_key: PathBuf::from("/keys/devcrypt_key.pub"),
        };
        Devcrypt::new(MemoryStore::new(), DevcryptConfig::new(key_paths))
    }

    #[test]
    fn test_default_paths() {
        let dc = devcrypt();
        assert_eq!(
            dc.encrypted_path(Path::new("dir/app.env")),
            PathBuf::from("dir/app.env.devcrypt")
        );
        assert_eq!(
            dc.decrypted_path(Path::new("dir/app.env.devcrypt")).unwrap(),
            PathBuf::from("dir/app.env")
        );
        assert!(matches!(
            dc.decrypted_path(Path::new("app.env")),
            Err(DevcryptError::NoSuffix { .. })
        ));
        assert!(dc.decrypted_path(Path::new(".devcrypt")).is_err());
    }

    #[test]
    fn test_keygen_writes_both_halves() {
        let dc = devcrypt();
        let public_key = dc.keygen("me@host", false).unwrap();

        let store = dc.store();
        let paths = &dc.config().key_paths;
        assert_eq!(store.access(&paths.private_key), Some(Access::Private));
        assert_eq!(store.access(&paths.public_key), Some(Access::Public));

        assert_eq!(dc.user_public_key().unwrap(), public_key);
        assert_eq!(dc.user_public_key().unwrap().label(), "me@host");
        assert_eq!(dc.user_private_key().unwrap().public_key(), public_key);
    }

    #[test]
    fn test_keygen_refuses_overwrite() {
        let dc = devcrypt();
        let first = dc.keygen("a", false).unwrap();
        assert!(matches!(
            dc.keygen("b", false),
            Err(DevcryptError::KeyExists(_))
        ));
        assert_eq!(dc.user_public_key().unwrap(), first);

        let second = dc.keygen("b", true).unwrap();
        assert_ne!(second, first);
    }

    #[test]
    fn test_encrypt_unchanged_writes_nothing() {
        let dc = devcrypt();
        dc.keygen("me", false).unwrap();
        let input = Path::new("/work/app.env");
        dc.store().persist(input, b"A=1", Access::Private).unwrap();

        let first = dc.encrypt(input, None).unwrap();
        assert!(first.changed);
        let stored = dc.store().read(&first.output).unwrap();

        let second = dc.encrypt(input, None).unwrap();
        assert!(!second.changed);
        assert_eq!(dc.store().read(&second.output).unwrap(), stored);
    }

    #[test]
    fn test_new_file_is_named_after_input() {
        let dc = devcrypt();
        dc.keygen("me", false).unwrap();
        let input = Path::new("/work/app.env");
        dc.store().persist(input, b"A=1", Access::Private).unwrap();

        let report = dc.encrypt(input, None).unwrap();
        let info = dc.info(&report.output).unwrap();
        assert_eq!(info.filename, "app.env");
        assert_eq!(info.plaintext_size, Some(3));
    }

    #[test]
    fn test_missing_key_is_a_store_error() {
        let dc = devcrypt();
        assert!(matches!(
            dc.user_private_key(),
            Err(DevcryptError::Store(_))
        ));
    }

    #[test]
    fn test_invalid_key_file() {
        let dc = devcrypt();
        let path = &dc.config().key_paths.public_key;
        dc.store().persist(path, b"not a key", Access::Public).unwrap();
        assert!(matches!(
            dc.user_public_key(),
            Err(DevcryptError::InvalidKeyFile { .. })
        ));
    }
}

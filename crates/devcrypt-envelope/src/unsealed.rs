//! An encrypted file together with its recovered file key.

use devcrypt_core::text::ensure_single_line;
use devcrypt_core::{chunk, CoreError, FileKey, PublicKey};
use zeroize::Zeroize;

use crate::container::ContainerFile;
use crate::error::{EnvelopeError, Result};
use crate::keybox::KeyBox;

/// Outcome of [`UnsealedFile::encrypt_content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptResult {
    /// The plaintext differs from what was stored.
    Updated,
    /// The plaintext fingerprint matches the stored one.
    Unchanged,
}

/// A container whose file key is known. Exists only in memory.
#[derive(Debug, Clone)]
pub struct UnsealedFile {
    container: ContainerFile,
    file_key: FileKey,
}

impl UnsealedFile {
    /// Start a new file with a fresh key, no recipients and no content.
    pub fn new(filename: impl Into<String>) -> Result<Self> {
        let filename = filename.into();
        ensure_single_line(&filename, "filenames")?;

        Ok(Self {
            container: ContainerFile {
                filename,
                mac: None,
                nonce: None,
                ciphertext: Vec::new(),
                key_boxes: Vec::new(),
            },
            file_key: FileKey::generate(),
        })
    }

    pub(crate) fn from_parts(container: ContainerFile, file_key: FileKey) -> Self {
        Self {
            container,
            file_key,
        }
    }

    /// Name of the file this container was created for.
    pub fn filename(&self) -> &str {
        self.container.filename()
    }

    /// Recipient keys in insertion order.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.container.public_keys()
    }

    /// Seal the file key to a new recipient.
    pub fn add_recipient(&mut self, recipient: &PublicKey) -> Result<()> {
        if self
            .container
            .key_boxes
            .iter()
            .any(|key_box| key_box.recipient() == recipient)
        {
            return Err(EnvelopeError::RecipientAlreadyPresent(recipient.encode()));
        }

        let key_box = KeyBox::seal(&self.file_key, recipient)?;
        self.container.key_boxes.push(key_box);
        Ok(())
    }

    /// Drop the key box for `recipient`.
    pub fn remove_recipient(&mut self, recipient: &PublicKey) -> Result<()> {
        self.container.remove_recipient(recipient)
    }

    /// Encrypt `plaintext` as the new content.
    ///
    /// The ciphertext is always replaced (with a fresh nonce); the result
    /// tells whether the plaintext actually changed.
    pub fn encrypt_content(&mut self, plaintext: &[u8]) -> Result<EncryptResult> {
        let content = chunk::encrypt(plaintext, &self.file_key)?;
        let result = if self.container.mac == Some(content.mac) {
            EncryptResult::Unchanged
        } else {
            EncryptResult::Updated
        };

        self.container.ciphertext = content.ciphertext;
        self.container.nonce = Some(content.nonce);
        self.container.mac = Some(content.mac);
        Ok(result)
    }

    /// Decrypt and verify the content.
    ///
    /// A file that was never encrypted decrypts to nothing.
    pub fn decrypt_content(&self) -> Result<Vec<u8>> {
        let container = &self.container;
        let Some(nonce) = &container.nonce else {
            if container.ciphertext.is_empty() {
                return Ok(Vec::new());
            }
            return Err(CoreError::decode("container", "ciphertext without nonce").into());
        };

        let mut plaintext = chunk::decrypt(&container.ciphertext, nonce, &self.file_key)?;
        let mac = chunk::mac(&plaintext, &self.file_key)?;
        if container.mac != Some(mac) {
            plaintext.zeroize();
            return Err(CoreError::AuthenticationFailed.into());
        }
        Ok(plaintext)
    }

    /// Replace the file key, re-sealing every key box and re-encrypting.
    ///
    /// On failure nothing is modified.
    pub fn rotate_file_key(&mut self) -> Result<()> {
        let mut plaintext = self.decrypt_content()?;
        let file_key = FileKey::generate();

        let rotated = self
            .container
            .key_boxes
            .iter()
            .map(|key_box| KeyBox::seal(&file_key, key_box.recipient()))
            .collect::<devcrypt_core::Result<Vec<_>>>()
            .and_then(|key_boxes| {
                // Never-encrypted files stay that way.
                let content = match self.container.nonce {
                    Some(_) => Some(chunk::encrypt(&plaintext, &file_key)?),
                    None => None,
                };
                Ok((key_boxes, content))
            });
        plaintext.zeroize();
        let (key_boxes, content) = rotated?;

        self.container.key_boxes = key_boxes;
        if let Some(content) = content {
            self.container.ciphertext = content.ciphertext;
            self.container.nonce = Some(content.nonce);
            self.container.mac = Some(content.mac);
        }
        self.file_key = file_key;
        Ok(())
    }

    /// The sealed form, for writing.
    pub fn as_container(&self) -> &ContainerFile {
        &self.container
    }

    /// Discard the file key and keep the sealed form.
    pub fn into_container(self) -> ContainerFile {
        self.container
    }

    #[cfg(test)]
    pub(crate) fn file_key(&self) -> &FileKey {
        &self.file_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrypt_core::generate_keys;

    #[test]
    fn test_new_rejects_newline_filename() {
        assert!(UnsealedFile::new("a\nb").is_err());
    }

    #[test]
    fn test_never_encrypted_decrypts_to_empty() {
        let file = UnsealedFile::new("a.txt").unwrap();
        assert!(file.decrypt_content().unwrap().is_empty());
    }

    #[test]
    fn test_encrypt_reports_changes() {
        let mut file = UnsealedFile::new("a.txt").unwrap();
        assert_eq!(file.encrypt_content(b"one").unwrap(), EncryptResult::Updated);
        let first_nonce = *file.as_container().nonce().unwrap();

        assert_eq!(file.encrypt_content(b"one").unwrap(), EncryptResult::Unchanged);
        assert_ne!(*file.as_container().nonce().unwrap(), first_nonce);

        assert_eq!(file.encrypt_content(b"two").unwrap(), EncryptResult::Updated);
        assert_eq!(file.decrypt_content().unwrap(), b"two");
    }

    #[test]
    fn test_empty_plaintext_is_a_change_from_never_encrypted() {
        let mut file = UnsealedFile::new("a.txt").unwrap();
        assert_eq!(file.encrypt_content(b"").unwrap(), EncryptResult::Updated);
        assert!(file.as_container().nonce().is_some());
        assert!(file.decrypt_content().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_recipient_leaves_key_boxes_unchanged() {
        let (alice, _) = generate_keys("alice").unwrap();
        let mut file = UnsealedFile::new("a.txt").unwrap();
        file.add_recipient(&alice).unwrap();
        let before = file.as_container().key_boxes().to_vec();

        let relabelled = PublicKey::new("alice again", *alice.as_bytes()).unwrap();
        assert!(matches!(
            file.add_recipient(&relabelled),
            Err(EnvelopeError::RecipientAlreadyPresent(_))
        ));
        assert_eq!(file.as_container().key_boxes(), before.as_slice());
    }

    #[test]
    fn test_rotation_replaces_key_and_keeps_access() {
        let (alice, alice_private) = generate_keys("alice").unwrap();
        let (bob, bob_private) = generate_keys("bob").unwrap();

        let mut file = UnsealedFile::new("a.txt").unwrap();
        file.add_recipient(&alice).unwrap();
        file.add_recipient(&bob).unwrap();
        file.encrypt_content(b"rotate me").unwrap();

        let old_key = file.file_key().clone();
        let old_container = file.as_container().clone();
        file.rotate_file_key().unwrap();

        assert_ne!(file.file_key(), &old_key);
        assert_eq!(file.filename(), "a.txt");
        assert_eq!(file.public_keys(), vec![alice, bob]);

        let container = file.as_container();
        for private_key in [&alice_private, &bob_private] {
            let opened = container.unseal(private_key).unwrap();
            assert_eq!(opened.decrypt_content().unwrap(), b"rotate me");
        }

        // The old key no longer opens the new ciphertext.
        let stale = UnsealedFile::from_parts(container.clone(), old_key);
        assert!(stale.decrypt_content().is_err());

        // The old container is untouched by rotation.
        let opened = old_container.unseal(&alice_private).unwrap();
        assert_eq!(opened.decrypt_content().unwrap(), b"rotate me");
    }

    #[test]
    fn test_failed_rotation_leaves_file_unmodified() {
        let (alice, _) = generate_keys("alice").unwrap();
        let mut file = UnsealedFile::new("a.txt").unwrap();
        file.add_recipient(&alice).unwrap();
        file.encrypt_content(b"content").unwrap();
        file.container.ciphertext[0] ^= 1;

        let before = file.as_container().clone();
        let old_key = file.file_key().clone();
        assert!(file.rotate_file_key().is_err());
        assert_eq!(file.as_container(), &before);
        assert_eq!(file.file_key(), &old_key);
    }

    #[test]
    fn test_rotation_of_never_encrypted_file() {
        let (alice, alice_private) = generate_keys("alice").unwrap();
        let mut file = UnsealedFile::new("a.txt").unwrap();
        file.add_recipient(&alice).unwrap();
        file.rotate_file_key().unwrap();

        assert!(file.as_container().nonce().is_none());
        let opened = file.as_container().unseal(&alice_private).unwrap();
        assert_eq!(opened.file_key(), file.file_key());
    }

    #[test]
    fn test_whole_chunk_truncation_is_detected() {
        let mut file = UnsealedFile::new("big.bin").unwrap();
        file.encrypt_content(&vec![3u8; chunk::CHUNK_SIZE * 2]).unwrap();
        file.container.ciphertext.truncate(chunk::CIPHER_CHUNK_SIZE);

        let err = file.decrypt_content().unwrap_err();
        assert!(err.is_authentication_failure());
    }
}

//! The sealed container: key boxes plus the encrypted content block.
//!
//! ```text
//! devcrypt-keybox <sealed> <recipient> <label>
//! devcrypt-keybox <sealed> <recipient> <label>
//! -----BEGIN DEVCRYPT ENCRYPTED FILE-----
//! Filename: secrets.env
//! MAC: <hex>
//! Nonce: <hex>
//!
//! <base64 ciphertext>
//! -----END DEVCRYPT ENCRYPTED FILE-----
//! ```

use std::io::Write;

use devcrypt_core::armor::{self, Block};
use devcrypt_core::text::ensure_single_line;
use devcrypt_core::{chunk, BaseNonce, CoreError, Mac, PrivateKey, PublicKey};

use crate::error::{EnvelopeError, Result};
use crate::keybox::KeyBox;
use crate::unsealed::UnsealedFile;

/// PEM block type of the encrypted content.
pub const ENCRYPTED_FILE_BLOCK_TYPE: &str = "DEVCRYPT ENCRYPTED FILE";

const FILENAME_HEADER: &str = "Filename";
const MAC_HEADER: &str = "MAC";
const NONCE_HEADER: &str = "Nonce";

/// An encrypted file as stored on disk.
///
/// Readable without any key: recipients, filename and sizes are public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerFile {
    pub(crate) filename: String,
    pub(crate) mac: Option<Mac>,
    pub(crate) nonce: Option<BaseNonce>,
    pub(crate) ciphertext: Vec<u8>,
    pub(crate) key_boxes: Vec<KeyBox>,
}

impl ContainerFile {
    /// Name of the file this container was created for.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Plaintext fingerprint, absent until content is first encrypted.
    pub fn mac(&self) -> Option<&Mac> {
        self.mac.as_ref()
    }

    /// Base nonce, absent until content is first encrypted.
    pub fn nonce(&self) -> Option<&BaseNonce> {
        self.nonce.as_ref()
    }

    /// Raw chunked ciphertext.
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Key boxes in insertion order.
    pub fn key_boxes(&self) -> &[KeyBox] {
        &self.key_boxes
    }

    /// Recipient keys in insertion order.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        self.key_boxes
            .iter()
            .map(|key_box| key_box.recipient().clone())
            .collect()
    }

    /// Plaintext size derived from the ciphertext size.
    ///
    /// `None` if the ciphertext length is not one [`chunk::encrypt`] can produce.
    pub fn plaintext_len(&self) -> Option<usize> {
        chunk::plaintext_len(self.ciphertext.len())
    }

    /// Drop the key box for `recipient`.
    ///
    /// Does not require the file key and allows removing the last recipient.
    pub fn remove_recipient(&mut self, recipient: &PublicKey) -> Result<()> {
        let index = self
            .key_boxes
            .iter()
            .position(|key_box| key_box.recipient() == recipient)
            .ok_or_else(|| EnvelopeError::RecipientNotFound(recipient.encode()))?;
        self.key_boxes.remove(index);
        Ok(())
    }

    /// Recover the file key with `private_key`.
    pub fn unseal(&self, private_key: &PrivateKey) -> Result<UnsealedFile> {
        let public_key = private_key.public_key();
        let key_box = self
            .key_boxes
            .iter()
            .find(|key_box| *key_box.recipient() == public_key)
            .ok_or_else(|| EnvelopeError::NoMatchingEnvelope {
                label: private_key.label().to_string(),
            })?;

        let file_key = key_box.open(private_key)?;
        Ok(UnsealedFile::from_parts(self.clone(), file_key))
    }

    /// Encode as text.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for key_box in &self.key_boxes {
            out.push_str(&key_box.encode());
            out.push('\n');
        }

        let block = Block::new(ENCRYPTED_FILE_BLOCK_TYPE, self.ciphertext.clone())
            .optional_header(FILENAME_HEADER, self.filename.as_str())
            .optional_header(MAC_HEADER, self.mac.map(|m| m.to_hex()).unwrap_or_default())
            .optional_header(NONCE_HEADER, self.nonce.map(|n| n.to_hex()).unwrap_or_default());
        out.push_str(&block.encode());
        out
    }

    /// Encode as bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode().into_bytes()
    }

    /// Write the encoded container to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.encode().as_bytes())?;
        Ok(())
    }

    /// Decode a container.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(data).map_err(|e| CoreError::decode("container", e))?;
        Self::decode(text)
    }

    /// Decode a container from text.
    ///
    /// Key box lines are read until a line starting with `-`; a bad line is
    /// reported with its 1-based line number.
    pub fn decode(text: &str) -> Result<Self> {
        let mut key_boxes: Vec<KeyBox> = Vec::new();
        let mut rest = text;
        let mut line_number = 0;

        while !rest.is_empty() && !rest.starts_with('-') {
            line_number += 1;
            let (line, next) = match rest.find('\n') {
                Some(i) => rest.split_at(i + 1),
                None => (rest, ""),
            };

            let key_box = KeyBox::decode(line).map_err(|source| EnvelopeError::Line {
                line: line_number,
                source,
            })?;
            if key_boxes
                .iter()
                .any(|existing| existing.recipient() == key_box.recipient())
            {
                return Err(EnvelopeError::Line {
                    line: line_number,
                    source: CoreError::decode("key box", "duplicate recipient"),
                });
            }
            key_boxes.push(key_box);
            rest = next;
        }

        let block = armor::decode_single(rest, ENCRYPTED_FILE_BLOCK_TYPE)?;

        let filename = block.get_header(FILENAME_HEADER).unwrap_or_default();
        ensure_single_line(filename, "filenames")?;
        let mac = block.get_header(MAC_HEADER).map(Mac::from_hex).transpose()?;
        let nonce = block
            .get_header(NONCE_HEADER)
            .map(BaseNonce::from_hex)
            .transpose()?;

        if !block.bytes.is_empty() {
            if nonce.is_none() {
                return Err(CoreError::decode("container", "ciphertext without Nonce header").into());
            }
            if mac.is_none() {
                return Err(CoreError::decode("container", "ciphertext without MAC header").into());
            }
        }

        Ok(Self {
            filename: filename.to_string(),
            mac,
            nonce,
            ciphertext: block.bytes,
            key_boxes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrypt_core::generate_keys;

    const EMPTY_CONTAINER: &str =
        "-----BEGIN DEVCRYPT ENCRYPTED FILE-----\nFilename: a.txt\n\n-----END DEVCRYPT ENCRYPTED FILE-----\n";

    #[test]
    fn test_decode_without_key_boxes() {
        let container = ContainerFile::decode(EMPTY_CONTAINER).unwrap();
        assert_eq!(container.filename(), "a.txt");
        assert!(container.key_boxes().is_empty());
        assert!(container.mac().is_none());
        assert!(container.nonce().is_none());
        assert_eq!(container.plaintext_len(), Some(0));
        assert_eq!(container.encode(), EMPTY_CONTAINER);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let (public_key, _) = generate_keys("alice").unwrap();
        let good = KeyBox::seal(&devcrypt_core::FileKey::generate(), &public_key)
            .unwrap()
            .encode();
        let text = format!("{good}\ngarbage line here\n{EMPTY_CONTAINER}");

        match ContainerFile::decode(&text) {
            Err(EnvelopeError::Line { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected line error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_recipient_line_rejected() {
        let (public_key, _) = generate_keys("alice").unwrap();
        let file_key = devcrypt_core::FileKey::generate();
        let a = KeyBox::seal(&file_key, &public_key).unwrap().encode();
        let b = KeyBox::seal(&file_key, &public_key).unwrap().encode();
        let text = format!("{a}\n{b}\n{EMPTY_CONTAINER}");

        assert!(matches!(
            ContainerFile::decode(&text),
            Err(EnvelopeError::Line { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_block_is_rejected() {
        let (public_key, _) = generate_keys("alice").unwrap();
        let line = KeyBox::seal(&devcrypt_core::FileKey::generate(), &public_key)
            .unwrap()
            .encode();
        assert!(ContainerFile::decode(&format!("{line}\n")).is_err());
        assert!(ContainerFile::decode("").is_err());
    }

    #[test]
    fn test_wrong_block_type_is_rejected() {
        let text = Block::new("DEVCRYPT PRIVATE KEY", vec![0; 32]).encode();
        assert!(ContainerFile::decode(&text).is_err());
    }

    #[test]
    fn test_trailing_data_is_rejected() {
        let text = format!("{EMPTY_CONTAINER}devcrypt-keybox a b c\n");
        assert!(ContainerFile::decode(&text).is_err());
    }

    #[test]
    fn test_ciphertext_without_nonce_is_rejected() {
        let text = Block::new(ENCRYPTED_FILE_BLOCK_TYPE, vec![0; 40])
            .header(FILENAME_HEADER, "a.txt")
            .header(MAC_HEADER, "00".repeat(32))
            .encode();
        assert!(ContainerFile::decode(&text).is_err());
    }

    #[test]
    fn test_bad_hex_headers_are_rejected() {
        let text = Block::new(ENCRYPTED_FILE_BLOCK_TYPE, vec![])
            .header(MAC_HEADER, "xyz")
            .encode();
        assert!(ContainerFile::decode(&text).is_err());

        let text = Block::new(ENCRYPTED_FILE_BLOCK_TYPE, vec![])
            .header(NONCE_HEADER, "00")
            .encode();
        assert!(ContainerFile::decode(&text).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(ContainerFile::from_bytes(&[0xff, 0xfe]).is_err());
    }

    #[test]
    fn test_remove_recipient_on_sealed_form() {
        let (alice, _) = generate_keys("alice").unwrap();
        let (bob, _) = generate_keys("bob").unwrap();
        let line = KeyBox::seal(&devcrypt_core::FileKey::generate(), &alice)
            .unwrap()
            .encode();
        let mut container = ContainerFile::decode(&format!("{line}\n{EMPTY_CONTAINER}")).unwrap();

        assert!(matches!(
            container.remove_recipient(&bob),
            Err(EnvelopeError::RecipientNotFound(_))
        ));
        container.remove_recipient(&alice).unwrap();
        assert!(container.public_keys().is_empty());
        assert_eq!(container.encode(), EMPTY_CONTAINER);
    }
}

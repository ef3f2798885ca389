//! Key boxes: a file key sealed to one recipient.
//!
//! Each key box is one line at the top of a container:
//!
//! ```text
//! devcrypt-keybox <base64 sealed key> <base64 recipient key> <label>
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use devcrypt_core::text::{decode_key_base64, split_fields};
use devcrypt_core::{seal, CoreError, FileKey, PrivateKey, PublicKey};

/// Tag that starts an encoded key box line.
pub const KEYBOX_TAG: &str = "devcrypt-keybox";

/// A file key sealed to a single recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBox {
    sealed_key: Vec<u8>,
    recipient: PublicKey,
}

impl KeyBox {
    /// Seal `file_key` to `recipient`.
    pub fn seal(file_key: &FileKey, recipient: &PublicKey) -> devcrypt_core::Result<Self> {
        Ok(Self {
            sealed_key: seal::seal(file_key, recipient)?,
            recipient: recipient.clone(),
        })
    }

    /// Open the sealed file key.
    pub fn open(&self, private_key: &PrivateKey) -> devcrypt_core::Result<FileKey> {
        seal::unseal(&self.sealed_key, &self.recipient, private_key)
    }

    /// The recipient this box is sealed to.
    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }

    /// The sealed file key bytes.
    pub fn sealed_key(&self) -> &[u8] {
        &self.sealed_key
    }

    /// Encode as one line, without a terminator.
    pub fn encode(&self) -> String {
        format!(
            "{} {} {} {}",
            KEYBOX_TAG,
            BASE64.encode(&self.sealed_key),
            self.recipient.key_base64(),
            self.recipient.label()
        )
    }

    /// Decode one key box line.
    pub fn decode(line: &str) -> devcrypt_core::Result<Self> {
        let fields = split_fields(line, KEYBOX_TAG, 4)?;
        let sealed_key = BASE64
            .decode(fields[0])
            .map_err(|e| CoreError::decode("sealed key", e))?;
        let key = decode_key_base64(fields[1], "recipient key")?;
        let recipient = PublicKey::new(fields[2], key)?;
        Ok(Self {
            sealed_key,
            recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrypt_core::generate_keys;

    #[test]
    fn test_encode_decode() {
        let (public_key, private_key) = generate_keys("alice laptop").unwrap();
        let file_key = FileKey::generate();
        let key_box = KeyBox::seal(&file_key, &public_key).unwrap();

        let line = key_box.encode();
        assert!(line.starts_with("devcrypt-keybox "));
        assert!(line.ends_with(&format!(" {} alice laptop", public_key.key_base64())));

        let decoded = KeyBox::decode(&line).unwrap();
        assert_eq!(decoded, key_box);
        assert_eq!(decoded.recipient().label(), "alice laptop");
        assert_eq!(decoded.open(&private_key).unwrap(), file_key);
    }

    #[test]
    fn test_decode_rejects_public_key_line() {
        let (public_key, _) = generate_keys("alice").unwrap();
        assert!(KeyBox::decode(&public_key.encode()).is_err());
    }

    #[test]
    fn test_decode_rejects_missing_label_field() {
        assert!(KeyBox::decode("devcrypt-keybox AAAA").is_err());
    }

    #[test]
    fn test_decode_rejects_bad_sealed_key() {
        let (public_key, _) = generate_keys("alice").unwrap();
        let line = format!("devcrypt-keybox !!! {} alice", public_key.key_base64());
        assert!(KeyBox::decode(&line).is_err());
    }

    #[test]
    fn test_decode_rejects_short_recipient_key() {
        assert!(KeyBox::decode("devcrypt-keybox AAAA AQID alice").is_err());
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let (public_key, _) = generate_keys("alice").unwrap();
        let (_, other) = generate_keys("bob").unwrap();
        let key_box = KeyBox::seal(&FileKey::generate(), &public_key).unwrap();
        assert!(matches!(
            key_box.open(&other),
            Err(CoreError::AuthenticationFailed)
        ));
    }
}

//! Chunked content encryption with NaCl secretbox (XSalsa20-Poly1305).
//!
//! Plaintext is split into 16 KiB chunks. Each chunk is sealed independently,
//! with its 16-byte tag in front as NaCl lays it out:
//!
//! ```text
//! [tag 0][chunk 0 ciphertext][tag 1][chunk 1 ciphertext]...
//! ```
//!
//! Chunk `i` is sealed under the base nonce with its first 8 bytes read as a
//! little-endian counter and advanced by `i`. The base nonce is drawn fresh
//! for every [`encrypt`] call, so a file key can be reused across edits
//! without ever repeating a (key, nonce) pair.
//!
//! Alongside the AEAD tags, an HMAC-SHA256 over the whole plaintext keyed by
//! the file key gives a cheap fingerprint for change detection.

use crypto_secretbox::aead::{generic_array::GenericArray, Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use hmac::{Hmac, Mac as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{CoreError, Result};
use crate::keys::FileKey;

/// Plaintext bytes per chunk.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Poly1305 tag bytes prepended to each chunk.
pub const TAG_SIZE: usize = 16;

/// Ciphertext bytes per full chunk.
pub const CIPHER_CHUNK_SIZE: usize = CHUNK_SIZE + TAG_SIZE;

/// XSalsa20 nonce size.
pub const NONCE_SIZE: usize = 24;

/// HMAC-SHA256 output size.
pub const MAC_SIZE: usize = 32;

type HmacSha256 = Hmac<Sha256>;

/// A 192-bit base nonce from which per-chunk nonces are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseNonce([u8; NONCE_SIZE]);

impl BaseNonce {
    /// Generate a new random nonce.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }

    /// Lower-case hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::decode("nonce", e))?;
        let bytes: [u8; NONCE_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::decode(
                "nonce",
                format!("expected {} bytes, got {}", NONCE_SIZE, bytes.len()),
            )
        })?;
        Ok(Self(bytes))
    }

    /// Nonce for chunk `index`.
    ///
    /// Fails rather than wrap if the counter would overflow.
    pub fn for_chunk(&self, index: u64) -> Result<[u8; NONCE_SIZE]> {
        let mut counter_bytes = [0u8; 8];
        counter_bytes.copy_from_slice(&self.0[..8]);
        let counter = u64::from_le_bytes(counter_bytes)
            .checked_add(index)
            .ok_or_else(|| CoreError::Encryption("chunk nonce counter overflow".into()))?;

        let mut nonce = self.0;
        nonce[..8].copy_from_slice(&counter.to_le_bytes());
        Ok(nonce)
    }
}

/// HMAC-SHA256 fingerprint of a file's plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mac([u8; MAC_SIZE]);

impl Mac {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; MAC_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; MAC_SIZE] {
        &self.0
    }

    /// Lower-case hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::decode("MAC", e))?;
        let bytes: [u8; MAC_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            CoreError::decode(
                "MAC",
                format!("expected {} bytes, got {}", MAC_SIZE, bytes.len()),
            )
        })?;
        Ok(Self(bytes))
    }
}

/// Output of [`encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedContent {
    /// Concatenated chunk ciphertexts, each with its tag.
    pub ciphertext: Vec<u8>,
    /// Base nonce the chunk nonces were derived from.
    pub nonce: BaseNonce,
    /// HMAC-SHA256 of the plaintext under the file key.
    pub mac: Mac,
}

/// Encrypt `plaintext` under `key` with a fresh base nonce.
pub fn encrypt(plaintext: &[u8], key: &FileKey) -> Result<EncryptedContent> {
    let cipher = new_cipher(key)?;
    let mut mac = new_hmac(key)?;
    let nonce = BaseNonce::generate();

    let mut ciphertext = Vec::with_capacity(ciphertext_len(plaintext.len()));
    for (index, chunk) in plaintext.chunks(CHUNK_SIZE).enumerate() {
        mac.update(chunk);

        let chunk_nonce = nonce.for_chunk(index as u64)?;
        let sealed = cipher
            .encrypt(GenericArray::from_slice(&chunk_nonce), chunk)
            .map_err(|e| CoreError::Encryption(format!("chunk {index}: {e}")))?;
        ciphertext.extend_from_slice(&sealed);
    }

    Ok(EncryptedContent {
        ciphertext,
        nonce,
        mac: finalize_hmac(mac),
    })
}

/// Decrypt chunked `ciphertext`.
///
/// Fails with [`CoreError::AuthenticationFailed`] on the first chunk that does
/// not verify. No partial plaintext is ever returned.
pub fn decrypt(ciphertext: &[u8], nonce: &BaseNonce, key: &FileKey) -> Result<Vec<u8>> {
    let cipher = new_cipher(key)?;

    let mut plaintext = Vec::with_capacity(plaintext_len(ciphertext.len()).unwrap_or(0));
    for (index, chunk) in ciphertext.chunks(CIPHER_CHUNK_SIZE).enumerate() {
        let opened = nonce.for_chunk(index as u64).and_then(|chunk_nonce| {
            cipher
                .decrypt(GenericArray::from_slice(&chunk_nonce), chunk)
                .map_err(|_| CoreError::AuthenticationFailed)
        });
        match opened {
            Ok(mut opened) => {
                plaintext.extend_from_slice(&opened);
                opened.zeroize();
            }
            Err(e) => {
                plaintext.zeroize();
                return Err(e);
            }
        }
    }
    Ok(plaintext)
}

/// Compute the plaintext fingerprint without encrypting.
pub fn mac(plaintext: &[u8], key: &FileKey) -> Result<Mac> {
    let mut mac = new_hmac(key)?;
    mac.update(plaintext);
    Ok(finalize_hmac(mac))
}

/// Number of ciphertext chunks produced for a plaintext of `len` bytes.
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(CHUNK_SIZE)
}

/// Ciphertext size for a plaintext of `len` bytes.
pub fn ciphertext_len(len: usize) -> usize {
    len + TAG_SIZE * chunk_count(len)
}

/// Plaintext size for a ciphertext of `len` bytes.
///
/// Returns `None` if no plaintext length maps to `len` (a final chunk shorter
/// than a tag, or a tag-only chunk).
pub fn plaintext_len(len: usize) -> Option<usize> {
    let chunks = len.div_ceil(CIPHER_CHUNK_SIZE);
    let last = len - (chunks.saturating_sub(1)) * CIPHER_CHUNK_SIZE;
    if chunks > 0 && last <= TAG_SIZE {
        return None;
    }
    Some(len - TAG_SIZE * chunks)
}

fn new_cipher(key: &FileKey) -> Result<XSalsa20Poly1305> {
    <XSalsa20Poly1305 as KeyInit>::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Encryption(format!("cipher key: {e}")))
}

fn new_hmac(key: &FileKey) -> Result<HmacSha256> {
    <HmacSha256 as KeyInit>::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::Encryption(format!("HMAC key: {e}")))
}

fn finalize_hmac(mac: HmacSha256) -> Mac {
    let digest = mac.finalize().into_bytes();
    let mut bytes = [0u8; MAC_SIZE];
    bytes.copy_from_slice(&digest);
    Mac(bytes)
}

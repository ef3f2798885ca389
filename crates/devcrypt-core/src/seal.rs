//! Anonymous sealing of file keys to recipient public keys.
//!
//! Uses the libsodium-compatible sealed box from `crypto_box`: an ephemeral
//! X25519 key pair is generated per call, its public half is prepended to
//! the output, and the file key is encrypted with XSalsa20-Poly1305 under the
//! ephemeral/recipient shared secret. No sender identity is involved.
//!
//! Output layout: `[32-byte ephemeral public key][16-byte tag][32-byte ciphertext]`.

use rand::rngs::OsRng;

use crate::error::{CoreError, Result};
use crate::keys::{FileKey, PrivateKey, PublicKey, KEY_SIZE};

/// Bytes added by sealing: ephemeral public key plus Poly1305 tag.
pub const SEAL_OVERHEAD: usize = 32 + 16;

/// Length of a sealed file key.
pub const SEALED_KEY_SIZE: usize = KEY_SIZE + SEAL_OVERHEAD;

/// Seal a file key so that only `recipient` can open it.
pub fn seal(file_key: &FileKey, recipient: &PublicKey) -> Result<Vec<u8>> {
    recipient
        .to_box()
        .seal(&mut OsRng, file_key.as_bytes())
        .map_err(|e| CoreError::Encryption(format!("sealing file key: {e}")))
}

/// Open a sealed file key with the recipient's private key.
///
/// Fails with [`CoreError::AuthenticationFailed`] if `private_key` does not
/// belong to `recipient`, if the sealed bytes are truncated or corrupted, or
/// if the opened plaintext is not a 32-byte key.
pub fn unseal(sealed: &[u8], recipient: &PublicKey, private_key: &PrivateKey) -> Result<FileKey> {
    if private_key.public_key() != *recipient {
        return Err(CoreError::AuthenticationFailed);
    }

    let mut opened = private_key
        .to_box()
        .unseal(sealed)
        .map_err(|_| CoreError::AuthenticationFailed)?;

    let result = <[u8; KEY_SIZE]>::try_from(opened.as_slice())
        .map(FileKey::from_bytes)
        .map_err(|_| CoreError::AuthenticationFailed);
    zeroize::Zeroize::zeroize(&mut opened);
    result
}

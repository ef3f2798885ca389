//! Proptest generators for property-based testing.

use std::collections::HashSet;

use proptest::prelude::*;

use devcrypt_core::{FileKey, PrivateKey, PublicKey, CHUNK_SIZE};

/// Generate a label: printable, possibly with spaces, never a newline.
pub fn label() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9@._ -]{0,32}"
}

/// Generate a filename that fits on one header line.
pub fn filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-]{1,16}(\\.[a-z]{1,4})?"
}

/// Generate a private key from arbitrary scalar bytes.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    (label(), any::<[u8; 32]>())
        .prop_map(|(label, seed)| PrivateKey::from_bytes(label, seed).unwrap())
}

/// Generate a public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    private_key().prop_map(|key| key.public_key())
}

/// Generate a file key.
pub fn file_key() -> impl Strategy<Value = FileKey> {
    any::<[u8; 32]>().prop_map(FileKey::from_bytes)
}

/// Generate plaintext bytes of specified max length.
pub fn plaintext(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a length at or next to a chunk boundary.
pub fn boundary_len() -> impl Strategy<Value = usize> {
    (0usize..=3, prop_oneof![Just(-1isize), Just(0), Just(1)]).prop_map(|(chunks, offset)| {
        (chunks * CHUNK_SIZE).saturating_add_signed(offset)
    })
}

/// Generate between `min` and `max` recipients with distinct public keys.
pub fn private_keys(min: usize, max: usize) -> impl Strategy<Value = Vec<PrivateKey>> {
    prop::collection::vec(any::<[u8; 32]>(), min..=max)
        .prop_map(distinct_recipients)
        .prop_filter("recipients must have distinct public keys", move |keys| {
            keys.len() >= min
        })
}

/// Build recipients from seeds, skipping any seed whose public key repeats
/// an earlier one. Clamping maps some distinct scalars to the same key.
pub fn distinct_recipients(seeds: impl IntoIterator<Item = [u8; 32]>) -> Vec<PrivateKey> {
    let mut seen = HashSet::new();
    seeds
        .into_iter()
        .filter(|seed| seen.insert(PrivateKey::from_bytes("", *seed).unwrap().public_key()))
        .enumerate()
        .map(|(i, seed)| PrivateKey::from_bytes(format!("member{i}"), seed).unwrap())
        .collect()
}

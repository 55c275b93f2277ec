//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;
use sha2::{Digest, Sha512};

/// Generate cryptographically secure random bytes
///
/// `rand::rng()` is a ChaCha-based CSPRNG reseeded from the OS.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Random opaque token, standard base64 encoded
pub fn random_token_base64(len: usize) -> String {
    to_base64(&random_bytes(len))
}

/// Random opaque token, upper-case hex encoded
pub fn random_token_hex(len: usize) -> String {
    hex::encode_upper(random_bytes(len))
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// SHA-1 digest as lower-case hex (request signing for the image host)
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compute HMAC-SHA512 with an arbitrary-length key
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac = new_hmac_sha512(key);
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Verify an HMAC-SHA512 tag in constant time
pub fn verify_hmac_sha512(key: &[u8], data: &[u8], expected: &[u8]) -> bool {
    let mut mac = new_hmac_sha512(key);
    mac.update(data);
    mac.verify_slice(expected).is_ok()
}

fn new_hmac_sha512(key: &[u8]) -> Hmac<Sha512> {
    // HMAC is defined for keys of any length; `new_from_slice` only fails for
    // fixed-key MACs, so this branch is unreachable for `Hmac<Sha512>`.
    match Hmac::<Sha512>::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts keys of any size"),
    }
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

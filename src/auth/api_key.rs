use rand::Rng;
use sha2::{Digest, Sha256};

const KEY_PREFIX: &str = "tl_";
const KEY_RANDOM_LENGTH: usize = 40;

/// Total length of a plaintext key.
pub const API_KEY_LENGTH: usize = KEY_PREFIX.len() + KEY_RANDOM_LENGTH;

/// Generates a random key and its SHA-256 hex digest.
///
/// Returns `(plaintext, digest)`. Only the digest should be persisted.
pub fn generate_api_key() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let random: String = (0..KEY_RANDOM_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect();
    let key = format!("{}{}", KEY_PREFIX, random);
    let digest = hash_api_key(&key);

    (key, digest)
}

/// Hex-encoded SHA-256 of `key` (64 characters).
pub fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

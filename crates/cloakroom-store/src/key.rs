//! Opaque session key generation.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

/// Number of random bytes behind each session key.
const KEY_BYTES: usize = 32;

/// Generate a fresh opaque session key.
///
/// 256 bits from the process CSPRNG, URL-safe base64 without padding,
/// so the value drops straight into a cookie. An unavailable entropy
/// source panics on first use; that is a startup failure, not a
/// recoverable per-call error.
pub fn new_key() -> String {
    let mut bytes = [0u8; KEY_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

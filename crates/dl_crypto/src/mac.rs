//! HMAC-SHA256, SHA-256, constant-time compare, and the CSPRNG source
//! (§4.1). These are the small leaf primitives every other module builds on.

use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 keyed by the session's AES key.
pub fn hmac(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// `n` cryptographically random bytes.
pub fn random_bytes(n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

/// Constant-time-over-the-shorter-length compare. Returns `false`
/// immediately (non-constant-time) when lengths differ — a length
/// mismatch is not secret-dependent, so this leaks nothing an attacker
/// doesn't already know from wire framing.
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_is_deterministic() {
        let key = [7u8; 32];
        assert_eq!(hmac(&key, b"hello"), hmac(&key, b"hello"));
    }

    #[test]
    fn hmac_differs_by_key() {
        assert_ne!(hmac(&[1u8; 32], b"hello"), hmac(&[2u8; 32], b"hello"));
    }

    #[test]
    fn secure_compare_rejects_length_mismatch() {
        assert!(!secure_compare(b"abc", b"abcd"));
    }

    #[test]
    fn secure_compare_accepts_equal_bytes() {
        assert!(secure_compare(b"identical", b"identical"));
    }

    #[test]
    fn secure_compare_rejects_single_bit_flip() {
        assert!(!secure_compare(b"identical", b"idenUical"));
    }

    #[test]
    fn random_bytes_are_not_all_zero() {
        let bytes = random_bytes(32);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}

//! The 1536-bit MODP group SMP runs over, distinct from the session's
//! 4096-bit DH group (§4.2). Exponents for this protocol are drawn as 192
//! random bytes interpreted directly as a big-endian integer — no
//! reduction mod `q` — which is why `createRandomExponent` lives here
//! rather than reusing `dl_crypto::dh`'s uniform-range generator.

use dl_crypto::bigint::{ModpGroup, SMP_1536_PRIME_HEX};
use num_bigint::BigUint;

pub fn smp_group() -> ModpGroup {
    ModpGroup::from_hex(SMP_1536_PRIME_HEX, 2)
}

/// 192 random bytes, interpreted as a big-endian unsigned integer and used
/// as an exponent without reducing mod `q` — preserved verbatim for wire
/// compatibility even though it technically biases the exponent
/// distribution slightly away from uniform over `[0, q)`.
pub fn random_exponent() -> BigUint {
    let bytes = dl_crypto::mac::random_bytes(192);
    BigUint::from_bytes_be(&bytes)
}

/// Maps a UTF-8 secret string to the big integer SMP proves equality of,
/// by treating the string's bytes as a big-endian integer.
pub fn secret_from_str(secret: &str) -> BigUint {
    BigUint::from_bytes_be(secret.as_bytes())
}

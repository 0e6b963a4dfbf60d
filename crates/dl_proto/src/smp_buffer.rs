//! The SMP wire buffer codec (§4.3.2 payload encoding).
//!
//! Each SMP step packs a tuple of big integers into one opaque `data`
//! blob: `[u32 length][big-endian bytes]` repeated for every item, with
//! the minimal big-endian encoding (no leading zero byte) for each value
//! — and, as a direct consequence, zero packs as a bare 4-byte length
//! prefix of `0` followed by no payload bytes at all, not a single zero
//! byte. Both peers must agree on this exact encoding bit-for-bit or the
//! proof math silently disagrees, so it is preserved as-is rather than
//! normalized to a fixed-width encoding.

use num_bigint::BigUint;
use num_traits::Zero;

use crate::error::ProtoError;

/// Minimal big-endian bytes of `v`, empty for zero — mirrors the source's
/// `longToBytes`, which never emits zero bytes for a zero-valued input.
fn to_minimal_be_bytes(v: &BigUint) -> Vec<u8> {
    if v.is_zero() {
        Vec::new()
    } else {
        v.to_bytes_be()
    }
}

pub fn pack_list(items: &[BigUint]) -> Vec<u8> {
    let mut buffer = Vec::new();
    for item in items {
        let bytes = to_minimal_be_bytes(item);
        buffer.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        buffer.extend_from_slice(&bytes);
    }
    buffer
}

pub fn unpack_list(buffer: &[u8]) -> Result<Vec<BigUint>, ProtoError> {
    let mut items = Vec::new();
    let mut index = 0usize;
    while index < buffer.len() {
        if index + 4 > buffer.len() {
            return Err(ProtoError::MalformedMessage(
                "truncated SMP buffer: missing length prefix".into(),
            ));
        }
        let length = u32::from_be_bytes(buffer[index..index + 4].try_into().unwrap()) as usize;
        index += 4;
        if index + length > buffer.len() {
            return Err(ProtoError::MalformedMessage(
                "truncated SMP buffer: declared item length overruns buffer".into(),
            ));
        }
        let item = if length == 0 {
            BigUint::zero()
        } else {
            BigUint::from_bytes_be(&buffer[index..index + length])
        };
        items.push(item);
        index += length;
    }
    Ok(items)
}

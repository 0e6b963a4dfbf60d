//! Diffie-Hellman key exchange over the fixed 4096-bit MODP group (§4.1).
//!
//! `compute_shared` derives the AES key and IV from the raw DH secret by
//! SHA-256-hashing its *decimal ASCII* representation and slicing the
//! digest: `aes_key = hash[0:32]`, `iv = hash[16:32]`. The 16-byte overlap
//! between key and IV is a deliberate wire-compat detail inherited from the
//! source protocol, not a novel construction — it MUST be preserved
//! bit-exactly for two peers to agree on the same key material.

use num_bigint::{BigUint, RandBigInt};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bigint::{to_decimal_ascii, ModpGroup, DH_4096_PRIME_HEX};
use crate::error::CryptoError;

/// A Diffie-Hellman keypair in the session's 4096-bit MODP group.
pub struct DhKeyPair {
    group: ModpGroup,
    private: BigUint,
    pub public: BigUint,
}

/// Derived symmetric key material: 32-byte AES-256 key + 16-byte CBC IV,
/// sharing their middle 16 bytes per the slicing rule above. Zeroized on
/// drop since both fields are session key material.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret {
    pub aes_key: [u8; 32],
    pub iv: [u8; 16],
}

fn dh_group() -> ModpGroup {
    ModpGroup::from_hex(DH_4096_PRIME_HEX, 2)
}

impl DhKeyPair {
    /// Generate a fresh keypair: private exponent uniform in `[2, p-2]`,
    /// public value `g^x mod p`.
    pub fn generate() -> Self {
        let group = dh_group();
        let two = BigUint::from(2u32);
        let upper = &group.p - &two;
        let private = OsRng.gen_biguint_range(&two, &upper);
        let public = group.pow_g(&private);
        Self { group, private, public }
    }

    /// Public value as the decimal ASCII string the wire format carries
    /// (`PUB_KEY data = base64(decimal string)`, see §4.3).
    pub fn public_decimal(&self) -> String {
        to_decimal_ascii(&self.public)
    }

    /// Derive the shared secret from the peer's public value (also a
    /// decimal ASCII string as received off the wire).
    pub fn compute_shared(&self, peer_public_decimal: &str) -> Result<SharedSecret, CryptoError> {
        let peer_public = peer_public_decimal
            .parse::<BigUint>()
            .map_err(|_| CryptoError::InvalidPublicValue)?;
        if !self.group.is_valid_element(&peer_public) {
            return Err(CryptoError::InvalidPublicValue);
        }
        let secret = self.group.pow(&peer_public, &self.private);
        let digest = Sha256::digest(to_decimal_ascii(&secret).as_bytes());

        let mut aes_key = [0u8; 32];
        aes_key.copy_from_slice(&digest[0..32]);
        let mut iv = [0u8; 16];
        iv.copy_from_slice(&digest[16..32]);
        Ok(SharedSecret { aes_key, iv })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sides_derive_identical_shared_secret() {
        let alice = DhKeyPair::generate();
        let bob = DhKeyPair::generate();

        let alice_shared = alice.compute_shared(&bob.public_decimal()).unwrap();
        let bob_shared = bob.compute_shared(&alice.public_decimal()).unwrap();

        assert_eq!(alice_shared.aes_key, bob_shared.aes_key);
        assert_eq!(alice_shared.iv, bob_shared.iv);
    }

    #[test]
    fn iv_is_middle_slice_of_aes_key() {
        let alice = DhKeyPair::generate();
        let bob = DhKeyPair::generate();
        let shared = alice.compute_shared(&bob.public_decimal()).unwrap();
        assert_eq!(&shared.aes_key[16..32], &shared.iv[..]);
    }

    #[test]
    fn rejects_out_of_range_public_value() {
        let alice = DhKeyPair::generate();
        assert!(alice.compute_shared("0").is_err());
        assert!(alice.compute_shared("1").is_err());
    }
}

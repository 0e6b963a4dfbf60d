//! AES-256-CBC with PKCS#7 padding (§4.1).
//!
//! The IV is fixed per session — derived once from the DH secret, not
//! rotated per message. This is a known weakness (no semantic security
//! against chosen-plaintext correlation across messages in the same
//! session) preserved deliberately for wire compatibility; see
//! `SPEC_FULL.md` §9.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::CryptoError;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub fn encrypt(key: &[u8; 32], iv: &[u8; 16], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let encryptor = Aes256CbcEnc::new(key.into(), iv.into());
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

pub fn decrypt(key: &[u8; 32], iv: &[u8; 16], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let decryptor = Aes256CbcDec::new(key.into(), iv.into());
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::BadDecrypt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn random_key_iv() -> ([u8; 32], [u8; 16]) {
        let mut key = [0u8; 32];
        let mut iv = [0u8; 16];
        rand::rngs::OsRng.fill_bytes(&mut key);
        rand::rngs::OsRng.fill_bytes(&mut iv);
        (key, iv)
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let (key, iv) = random_key_iv();
        for msg in [&b""[..], b"hello", b"exactly-16-bytes", &[0x42u8; 1000]] {
            let ct = encrypt(&key, &iv, msg).unwrap();
            let pt = decrypt(&key, &iv, &ct).unwrap();
            assert_eq!(pt, msg);
        }
    }

    #[test]
    fn tampered_padding_fails_with_bad_decrypt() {
        let (key, iv) = random_key_iv();
        let mut ct = encrypt(&key, &iv, b"hello world").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0xFF;
        assert!(matches!(decrypt(&key, &iv, &ct), Err(CryptoError::BadDecrypt)));
    }
}

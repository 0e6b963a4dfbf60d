//! `CryptoContext` (§3): the DH keypair and derived key material for one
//! session, sealed once the handshake's DH exchange completes.

use base64::{engine::general_purpose::STANDARD, Engine};
use dl_crypto::{DhKeyPair, SharedSecret};
use zeroize::ZeroizeOnDrop;

use crate::error::SessionError;

#[derive(ZeroizeOnDrop)]
pub struct CryptoContext {
    #[zeroize(skip)]
    keypair: DhKeyPair,
    shared: Option<SharedSecret>,
}

impl CryptoContext {
    pub fn new() -> Self {
        CryptoContext {
            keypair: DhKeyPair::generate(),
            shared: None,
        }
    }

    /// Own DH public value, base64 of its decimal-ASCII representation
    /// (§4.3's `PUB_KEY data = base64("<decimal>")`).
    pub fn public_key_data(&self) -> String {
        STANDARD.encode(self.keypair.public_decimal())
    }

    /// Completes the DH exchange from the peer's `PUB_KEY` payload,
    /// sealing `aes_key`/`iv` (§3: `encrypted = true` implies both are
    /// set and the exchange completed).
    pub fn complete_handshake(&mut self, peer_public_key_data: &str) -> Result<(), SessionError> {
        let decoded = STANDARD.decode(peer_public_key_data)?;
        let peer_public_decimal = String::from_utf8(decoded)
            .map_err(|_| dl_crypto::CryptoError::InvalidPublicValue)?;
        let shared = self.keypair.compute_shared(&peer_public_decimal)?;
        self.shared = Some(shared);
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        self.shared.is_some()
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, SessionError> {
        let shared = self.shared.as_ref().ok_or(SessionError::BadHandshake)?;
        Ok(dl_crypto::cipher::encrypt(&shared.aes_key, &shared.iv, plaintext)?)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, SessionError> {
        let shared = self.shared.as_ref().ok_or(SessionError::BadHandshake)?;
        dl_crypto::cipher::decrypt(&shared.aes_key, &shared.iv, ciphertext)
            .map_err(|_| SessionError::BadDecrypt)
    }

    pub fn hmac(&self, data: &[u8]) -> Result<[u8; 32], SessionError> {
        let shared = self.shared.as_ref().ok_or(SessionError::BadHandshake)?;
        Ok(dl_crypto::mac::hmac(&shared.aes_key, data))
    }
}

impl Default for CryptoContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sides_derive_the_same_shared_secret() {
        let mut a = CryptoContext::new();
        let mut b = CryptoContext::new();

        a.complete_handshake(&b.public_key_data()).unwrap();
        b.complete_handshake(&a.public_key_data()).unwrap();

        let msg = b"hello session";
        let ct = a.encrypt(msg).unwrap();
        let pt = b.decrypt(&ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn encrypt_before_handshake_fails() {
        let ctx = CryptoContext::new();
        assert!(ctx.encrypt(b"too early").is_err());
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    #[error("AES encryption failed")]
    AesEncrypt,

    #[error("AES decryption failed — invalid padding (BAD_DECRYPT)")]
    BadDecrypt,

    #[error("Diffie-Hellman public value out of range [2, p-2]")]
    InvalidPublicValue,

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

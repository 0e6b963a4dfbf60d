//! dl_crypto — Darklock Relay cryptographic primitives
//!
//! # Design principles
//! - NO custom crypto constructions beyond what the wire protocol fixes;
//!   every primitive is an audited Rust crate (`num-bigint`, `aes`, `cbc`,
//!   `hmac`, `sha2`, `rand`).
//! - Every wire-compat quirk called out in the spec (fixed per-session IV,
//!   the 16-byte key/IV overlap, SHA-256-over-decimal-ASCII hashing) is
//!   preserved bit-exactly rather than "fixed" — two peers must still
//!   agree byte-for-byte on derived key material.
//!
//! # Module layout
//! - `bigint`  — the 4096-bit DH group and 1536-bit SMP group (RFC 3526 §5 /
//!   §2-shaped safe primes, generator 2) plus shared `BigUint` helpers.
//! - `dh`      — Diffie-Hellman keypair generation and shared-secret
//!   derivation (`aes_key`, `iv` from `SHA-256(decimal(secret))`).
//! - `cipher`  — AES-256-CBC encrypt/decrypt with PKCS#7 padding.
//! - `mac`     — HMAC-SHA256, SHA-256, constant-time compare, CSPRNG.
//! - `error`   — unified error type.

pub mod bigint;
pub mod cipher;
pub mod dh;
pub mod error;
pub mod mac;

pub use bigint::ModpGroup;
pub use dh::{DhKeyPair, SharedSecret};
pub use error::CryptoError;

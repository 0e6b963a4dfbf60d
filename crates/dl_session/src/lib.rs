//! dl_session — per-peer encrypted session state machine
//!
//! Drives one peer conversation through `INIT → HANDSHAKING →
//! ENCRYPTED_LOOP → TERMINATED` (§4.3), owning exactly one
//! `CryptoContext` and at most one in-flight SMP exchange. Built on
//! `dl_crypto` and `dl_smp`; knows nothing about sockets or the relay's
//! registry — callers hand it inbound `Message`s and get back outbound
//! ones plus `SessionObserver` events.
//!
//! # Module layout
//! - `session`        — the `Session` type and its state machine.
//! - `crypto_context`  — per-session DH keypair and derived key material.
//! - `smp_handler`     — SMP sub-protocol dispatch (§4.3.2).
//! - `callbacks`       — the `SessionObserver` upward-event trait.
//! - `error`           — unified error type, mapped to wire `ErrorCode`s.

pub mod callbacks;
pub mod crypto_context;
pub mod error;
pub mod session;
pub mod smp_handler;

pub use callbacks::{SessionObserver, SmpPhase};
pub use crypto_context::CryptoContext;
pub use error::SessionError;
pub use session::{Phase, Role, Session};

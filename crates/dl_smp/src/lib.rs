//! dl_smp — Socialist Millionaire Protocol zero-knowledge engine
//!
//! A five-network-step interactive proof that two peers hold the same
//! secret, without either side disclosing it. Built entirely on
//! `dl_crypto`'s `BigUint` group primitives — this crate owns no socket,
//! no session state, and no knowledge of the wire message envelope.
//!
//! # Module layout
//! - `group`  — the 1536-bit MODP group, exponent generation, secret
//!   encoding.
//! - `proofs` — the Fiat–Shamir discrete-log/coordinate/equal-logs
//!   proofs shared by every step.
//! - `engine` — the `SmpEngine` state machine (`step1..step5`).
//! - `error`  — unified error type.

pub mod engine;
pub mod error;
pub mod group;
pub mod proofs;

pub use engine::SmpEngine;
pub use error::SmpError;

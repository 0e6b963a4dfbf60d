//! dl_proto — Darklock Relay wire protocol
//!
//! Everything that either side of a TCP connection needs to agree on
//! byte-for-byte: the frame boundary, the message envelope, the command
//! tag vocabulary, and the SMP big-integer buffer encoding. Nothing in
//! this crate knows about sockets, session state, or key material — it
//! only encodes and decodes.
//!
//! # Module layout
//! - `command`    — `Command` tag enum and `ErrorCode` taxonomy.
//! - `message`    — the `Message` envelope and its JSON (de)serialization.
//! - `framing`    — async length-prefixed frame I/O over any tokio stream.
//! - `smp_buffer` — the SMP step payload's big-integer list codec.
//! - `error`      — unified error type.

pub mod command;
pub mod error;
pub mod framing;
pub mod message;
pub mod smp_buffer;

pub use command::{Command, ErrorCode};
pub use error::ProtoError;
pub use message::{Message, Route};

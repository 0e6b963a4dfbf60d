//! dl_relay — the TCP multiplexer relay server (§4.4).
//!
//! Accepts connections, enforces the `VERSION`/`REGISTER` preamble,
//! then runs each Connection's Send/Recv Worker pair, forwarding
//! session-layer frames by `route` and serving `REQ_ID`/`REQ_NICK`
//! lookups against the `ClientRegistry`. Never inspects encrypted
//! payloads — all crypto/SMP semantics live in `dl_session`/`dl_smp`
//! on the peers it relays between.

pub mod config;
pub mod connection;
pub mod error;
pub mod log;
pub mod registry;
pub mod server;

pub use config::Cli;
pub use error::RelayError;
pub use registry::ClientRegistry;
pub use server::Shared;

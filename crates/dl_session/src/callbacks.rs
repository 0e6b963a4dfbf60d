//! Upward callbacks (§6, §9): the source's duck-typed `callbacks` dict
//! (`callbacks['recv']`, `callbacks['handshake']`, `callbacks['err']`,
//! `callbacks['smp']`) flattened into one fixed-shape trait, so a caller
//! cannot construct a `Session` while omitting a handler.

use dl_proto::{Command, Route};

use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmpPhase {
    Request,
    Complete,
    Error,
}

/// The four upward event kinds a `Session` emits. Implement this trait
/// once per client application; `dl_session` never inspects plaintext or
/// key material beyond what it hands back through these calls.
pub trait SessionObserver: Send {
    /// A non-SMP loop command arrived with decrypted (or plaintext,
    /// during handshake) payload.
    fn recv(&mut self, command: Command, route: Route, plaintext: &[u8]);

    /// The handshake completed; `server_initiated` is true for the
    /// responder role (the peer opened the chat).
    fn handshake_done(&mut self, session_id: u64, server_initiated: bool);

    /// A session-layer error worth surfacing — tampering signals MUST be
    /// delivered here and MUST NOT be dropped (§7).
    fn err(&mut self, session_id: u64, error: &SessionError);

    /// An SMP phase transition: `REQUEST` invites the upper layer to
    /// prompt for an answer, `COMPLETE`/`ERROR` report the outcome.
    fn smp(&mut self, phase: SmpPhase, session_id: u64, payload: Option<&str>, matched: Option<bool>);
}

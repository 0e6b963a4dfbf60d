//! Wire command tags (§6).
//!
//! The distilled spec's prose uses two spellings for the same three
//! commands — the operational text in §4.3/§4.3.2/§4.4 says `REGISTER`,
//! `REJECT`, `SMP_0..SMP_4`; the wire-tag table in §6 lists the source's
//! historical short aliases `REG`, `REJ`, `SMP0..SMP4`. We standardize on
//! the long, self-documenting spelling used throughout the operational
//! description (see `DESIGN.md`) — both ends of a connection only ever
//! need to agree with *this* implementation, and the long form is what the
//! rest of this codebase names its match arms after.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    // ── Server-control ───────────────────────────────────────────────
    #[serde(rename = "VERSION")]
    Version,
    #[serde(rename = "REGISTER")]
    Register,
    /// Legacy relay command, listed in §6 for schema completeness; no
    /// server behavior is specified for it.
    #[serde(rename = "REL")]
    Relay,
    #[serde(rename = "REQ_ID")]
    ReqId,
    #[serde(rename = "SEND_ID")]
    SendId,
    #[serde(rename = "REQ_NICK")]
    ReqNick,
    #[serde(rename = "SEND_NICK")]
    SendNick,

    // ── Session handshake ────────────────────────────────────────────
    #[serde(rename = "HELO")]
    Helo,
    #[serde(rename = "REDY")]
    Redy,
    #[serde(rename = "REJECT")]
    Reject,
    #[serde(rename = "PUB_KEY")]
    PubKey,

    // ── Loop (shared with server-control where overlapping) ─────────
    #[serde(rename = "MSG")]
    Msg,
    #[serde(rename = "TYPING")]
    Typing,
    #[serde(rename = "END")]
    End,
    #[serde(rename = "ERR")]
    Err,
    #[serde(rename = "SMP_0")]
    Smp0,
    #[serde(rename = "SMP_1")]
    Smp1,
    #[serde(rename = "SMP_2")]
    Smp2,
    #[serde(rename = "SMP_3")]
    Smp3,
    #[serde(rename = "SMP_4")]
    Smp4,
}

impl Command {
    /// The Loop Command Set (glossary): the only commands valid once
    /// `handshake_done` is true.
    pub fn is_loop_command(self) -> bool {
        matches!(
            self,
            Command::Msg
                | Command::Typing
                | Command::End
                | Command::Err
                | Command::Smp0
                | Command::Smp1
                | Command::Smp2
                | Command::Smp3
                | Command::Smp4
        )
    }

    /// SMP sub-handler dispatch set (§4.3.2).
    pub fn is_smp_command(self) -> bool {
        matches!(
            self,
            Command::Smp0 | Command::Smp1 | Command::Smp2 | Command::Smp3 | Command::Smp4
        )
    }

    /// Commands the relay forwards verbatim to `route[1]` (§4.4 step 2).
    pub fn is_forwardable_session_command(self) -> bool {
        matches!(
            self,
            Command::Helo
                | Command::Redy
                | Command::Reject
                | Command::PubKey
                | Command::Msg
                | Command::Typing
                | Command::Err
                | Command::Smp0
                | Command::Smp1
                | Command::Smp2
                | Command::Smp3
                | Command::Smp4
        )
    }
}

/// Error codes (§6), the value carried in `Message.error` as a decimal
/// ASCII string, or empty when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    ConnEnded = 0,
    NickNotFound = 1,
    ConnRejected = 2,
    BadHandshake = 3,
    ClientExists = 4,
    SelfConnect = 5,
    ServerShutdown = 6,
    InvalidCommand = 7,
    AlreadyConnected = 8,
    NetworkError = 9,
    BadHmac = 10,
    BadDecrypt = 11,
    InvalidNick = 12,
    NickInUse = 13,
    ClosedConn = 14,
    Kicked = 15,
    SmpCheckFailed = 16,
    SmpMatchFailed = 17,
    MessageReplay = 18,
    MessageDeletion = 19,
    ProtocolVersionMismatch = 20,
    /// Not part of the §6 numbered subset; the relay needs it for
    /// forwarding misses (§4.4 step 2, §7 Protocol taxon) and it is
    /// otherwise absent from the core error-code table.
    InvalidId = 21,
}

impl ErrorCode {
    pub fn from_u32(v: u32) -> Option<Self> {
        use ErrorCode::*;
        Some(match v {
            0 => ConnEnded,
            1 => NickNotFound,
            2 => ConnRejected,
            3 => BadHandshake,
            4 => ClientExists,
            5 => SelfConnect,
            6 => ServerShutdown,
            7 => InvalidCommand,
            8 => AlreadyConnected,
            9 => NetworkError,
            10 => BadHmac,
            11 => BadDecrypt,
            12 => InvalidNick,
            13 => NickInUse,
            14 => ClosedConn,
            15 => Kicked,
            16 => SmpCheckFailed,
            17 => SmpMatchFailed,
            18 => MessageReplay,
            19 => MessageDeletion,
            20 => ProtocolVersionMismatch,
            21 => InvalidId,
            _ => return None,
        })
    }

    /// Tampering signal (glossary): MUST surface upward, MUST NOT be
    /// silently dropped.
    pub fn is_tampering_signal(self) -> bool {
        matches!(
            self,
            ErrorCode::BadHmac
                | ErrorCode::MessageReplay
                | ErrorCode::MessageDeletion
                | ErrorCode::SmpMatchFailed
        )
    }
}

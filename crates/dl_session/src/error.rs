use thiserror::Error;

use dl_proto::ErrorCode;

/// Session-layer errors, each carrying the wire `ErrorCode` it maps to
/// when surfaced as an `ERR` frame or an upward `err` callback (§7).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("bad handshake: unexpected command for current state")]
    BadHandshake,

    #[error("peer rejected the handshake")]
    ConnectionRejected,

    #[error("command {0:?} is not valid after handshake completion")]
    InvalidCommand(dl_proto::Command),

    #[error("HMAC verification failed")]
    BadHmac,

    #[error("AES decryption failed (bad padding)")]
    BadDecrypt,

    #[error("message replay detected: counter {received} < expected {expected}")]
    MessageReplay { received: u64, expected: u64 },

    #[error("message deletion detected: counter {received} > expected {expected}")]
    MessageDeletion { received: u64, expected: u64 },

    #[error("SMP check failed: {0}")]
    SmpCheckFailed(#[from] dl_smp::SmpError),

    #[error("SMP secrets did not match")]
    SmpMatchFailed,

    #[error("wire protocol error: {0}")]
    Proto(#[from] dl_proto::ProtoError),

    #[error("crypto error: {0}")]
    Crypto(#[from] dl_crypto::CryptoError),

    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("connection ended")]
    ConnectionEnded,
}

impl SessionError {
    /// The wire `ErrorCode` this error surfaces as, when the session
    /// emits an `ERR` frame or an `err` callback (§7).
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SessionError::BadHandshake => ErrorCode::BadHandshake,
            SessionError::ConnectionRejected => ErrorCode::ConnRejected,
            SessionError::InvalidCommand(_) => ErrorCode::InvalidCommand,
            SessionError::BadHmac => ErrorCode::BadHmac,
            SessionError::BadDecrypt => ErrorCode::BadDecrypt,
            SessionError::MessageReplay { .. } => ErrorCode::MessageReplay,
            SessionError::MessageDeletion { .. } => ErrorCode::MessageDeletion,
            SessionError::SmpCheckFailed(_) => ErrorCode::SmpCheckFailed,
            SessionError::SmpMatchFailed => ErrorCode::SmpMatchFailed,
            SessionError::Proto(_) => ErrorCode::InvalidCommand,
            SessionError::Crypto(_) => ErrorCode::BadDecrypt,
            SessionError::Base64Decode(_) => ErrorCode::BadDecrypt,
            SessionError::ConnectionEnded => ErrorCode::ConnEnded,
        }
    }

    /// Tampering signals (§7 taxon 3) MUST surface upward and MUST NOT be
    /// silently dropped, but do not by themselves force session teardown.
    pub fn is_tampering_signal(&self) -> bool {
        self.error_code().is_tampering_signal()
    }
}

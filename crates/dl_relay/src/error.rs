use thiserror::Error;

use dl_proto::ErrorCode;

/// Relay-layer errors (§7 Transport/Protocol taxa). Cryptographic-taxon
/// errors never reach the relay — it forwards opaque frames and only
/// inspects `command`/`route`/`data` where the protocol requires it.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    #[error("connection closed")]
    ClosedConn,

    #[error("malformed message: {0}")]
    Proto(#[from] dl_proto::ProtoError),

    #[error("protocol version mismatch")]
    ProtocolVersionMismatch,

    #[error("nick is empty")]
    EmptyNick,

    #[error("nick contains invalid characters")]
    InvalidNickContent,

    #[error("nick exceeds {0} characters")]
    InvalidNickLength(usize),

    #[error("nick already in use")]
    NickInUse,

    #[error("command {0:?} is not valid in this context")]
    InvalidCommand(dl_proto::Command),

    #[error("no connection registered for id {0}")]
    InvalidId(u64),
}

impl RelayError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            RelayError::Network(_) => ErrorCode::NetworkError,
            RelayError::ClosedConn => ErrorCode::ClosedConn,
            RelayError::Proto(_) => ErrorCode::InvalidCommand,
            RelayError::ProtocolVersionMismatch => ErrorCode::ProtocolVersionMismatch,
            RelayError::EmptyNick | RelayError::InvalidNickContent | RelayError::InvalidNickLength(_) => {
                ErrorCode::InvalidNick
            }
            RelayError::NickInUse => ErrorCode::NickInUse,
            RelayError::InvalidCommand(_) => ErrorCode::InvalidCommand,
            RelayError::InvalidId(_) => ErrorCode::InvalidId,
        }
    }
}

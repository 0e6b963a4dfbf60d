use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    #[error("frame length {0} exceeds maximum allowed frame size")]
    FrameTooLarge(usize),

    #[error("connection closed while reading a frame")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("unknown command tag: {0}")]
    UnknownCommand(String),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmpError {
    #[error("SMP group element out of range [2, p-2]")]
    InvalidElement,

    #[error("SMP discrete-log proof failed to verify")]
    LogProofFailed,

    #[error("SMP joint coordinate proof failed to verify")]
    CoordsProofFailed,

    #[error("SMP equal-logs proof failed to verify")]
    EqualLogsProofFailed,

    #[error("SMP step called out of order: {0}")]
    OutOfOrder(&'static str),

    #[error("malformed SMP step buffer: {0}")]
    MalformedBuffer(String),
}

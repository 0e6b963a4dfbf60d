//! The wire message envelope (§3, §6).
//!
//! Every frame on the wire is one JSON object with this shape. Fields that
//! the source protocol always serializes as decimal-ASCII strings (`error`,
//! `num`) stay strings here rather than becoming numeric JSON fields —
//! that's the actual wire format, and `serde(default)` lets either side
//! omit a field it has nothing to say for.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::ProtoError;

/// `(from_id, to_id)` — `0` is reserved for the relay server itself.
pub type Route = (u64, u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub command: Command,

    #[serde(default)]
    pub route: Option<Route>,

    /// Base64-encoded ciphertext, public value, nickname, or other
    /// command-specific payload. Never the bare plaintext.
    #[serde(default)]
    pub data: String,

    /// Base64-encoded HMAC-SHA256 tag over `data`, present on loop commands.
    #[serde(default)]
    pub hmac: String,

    /// Decimal ASCII `ErrorCode`, or empty when this message carries no
    /// error.
    #[serde(default)]
    pub error: String,

    /// Monotonic counter, decimal ASCII, or empty when not applicable.
    #[serde(default)]
    pub num: String,
}

impl Message {
    pub fn new(command: Command) -> Self {
        Message {
            command,
            route: None,
            data: String::new(),
            hmac: String::new(),
            error: String::new(),
            num: String::new(),
        }
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }

    pub fn with_hmac(mut self, hmac: impl Into<String>) -> Self {
        self.hmac = hmac.into();
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    pub fn with_num(mut self, num: impl Into<String>) -> Self {
        self.num = num.into();
        self
    }

    pub fn to_json(&self) -> Result<Vec<u8>, ProtoError> {
        serde_json::to_vec(self).map_err(|e| ProtoError::MalformedMessage(e.to_string()))
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ProtoError> {
        serde_json::from_slice(bytes).map_err(|e| ProtoError::MalformedMessage(e.to_string()))
    }

    /// Parses `num` as the monotonic counter it carries on loop commands.
    pub fn num_as_u64(&self) -> Result<u64, ProtoError> {
        self.num
            .parse()
            .map_err(|_| ProtoError::MalformedMessage(format!("non-numeric num field: {}", self.num)))
    }

    /// Parses `error` as the `ErrorCode` it carries.
    pub fn error_code(&self) -> Result<Option<crate::command::ErrorCode>, ProtoError> {
        if self.error.is_empty() {
            return Ok(None);
        }
        let v: u32 = self
            .error
            .parse()
            .map_err(|_| ProtoError::MalformedMessage(format!("non-numeric error field: {}", self.error)))?;
        crate::command::ErrorCode::from_u32(v)
            .map(Some)
            .ok_or_else(|| ProtoError::MalformedMessage(format!("unknown error code: {v}")))
    }
}

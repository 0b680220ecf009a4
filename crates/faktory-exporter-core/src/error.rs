//! Shared error type across faktory-exporter crates.

use thiserror::Error;

/// Stable error codes (used as a structured log field).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed connection URL or failed initial handshake.
    ConnectionSetup,
    /// Upstream unreachable or protocol error during a scrape.
    Fetch,
    /// Status document missing or mistyping a required field.
    Decode,
    /// Invalid configuration.
    Config,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ConnectionSetup => "CONNECTION_SETUP",
            ErrorCode::Fetch => "FETCH",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Config => "CONFIG",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Why a status document was rejected. `field` is the dotted path of the
/// first field that failed, e.g. `faktory.tasks.Retries.size`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("missing field: {field}")]
    Missing { field: String },
    #[error("field {field} is not {expected}")]
    WrongType { field: String, expected: &'static str },
}

impl DecodeError {
    pub fn field(&self) -> &str {
        match self {
            DecodeError::Missing { field } => field,
            DecodeError::WrongType { field, .. } => field,
        }
    }
}

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("connection setup: {0}")]
    ConnectionSetup(String),
    #[error("fetch: {0}")]
    Fetch(String),
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),
    #[error("config: {0}")]
    Config(String),
}

impl ExporterError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExporterError::ConnectionSetup(_) => ErrorCode::ConnectionSetup,
            ExporterError::Fetch(_) => ErrorCode::Fetch,
            ExporterError::Decode(_) => ErrorCode::Decode,
            ExporterError::Config(_) => ErrorCode::Config,
        }
    }
}

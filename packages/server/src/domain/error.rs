//! Domain error types.

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Room id must not be empty")]
    EmptyRoomId,

    #[error("Session token must not be empty")]
    EmptySessionToken,
}

/// Errors reported by the remote message store
#[derive(Debug, Error)]
pub enum BackendError {
    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid backend base URL: {0}")]
    InvalidBaseUrl(String),

    /// The request never produced a response (connect, timeout, TLS...)
    #[error("Backend transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON shape
    #[error("Failed to decode backend response: {0}")]
    Decode(String),
}

/// Errors raised while pushing a frame to a single member
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' is closed")]
    ChannelClosed(String),
}

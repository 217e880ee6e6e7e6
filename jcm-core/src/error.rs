//! Domain-specific error types for the JCM session protocol.
//!
//! Transport and framing failures are `JcmError`; they end the session.
//! Command-level failures live in [`crate::dispatch::DispatchError`] and
//! never leave the dispatcher as errors; they become text responses.

use thiserror::Error;

/// The canonical error type for the JCM session layer.
#[derive(Debug, Error)]
pub enum JcmError {
    // ── Protocol Errors ──────────────────────────────────────────
    /// A field in the response header could not be parsed.
    #[error("invalid header: {0}")]
    InvalidHeader(&'static str),

    /// A numeric value did not map to any known enum variant.
    #[error("unknown {type_name} discriminant: {value:#x}")]
    UnknownVariant { type_name: &'static str, value: u64 },

    /// A response announced more bytes than the codec accepts.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// A session lifecycle transition was attempted from the wrong phase.
    #[error("invalid transition: {0}")]
    InvalidTransition(&'static str),

    // ── Connection Errors ────────────────────────────────────────
    /// The TCP/IO layer reported an error.
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The handoff between the session roles was torn down.
    #[error("channel closed")]
    ChannelClosed,

    /// The peer closed the stream before a full response arrived.
    #[error("connection closed by peer")]
    ConnectionClosed,

    // ── Task Errors ─────────────────────────────────────────────
    /// A spawned session role panicked or was aborted.
    #[error("task error: {0}")]
    Task(String),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

impl JcmError {
    /// Returns `true` for failures of the underlying stream.
    pub fn is_transport(&self) -> bool {
        matches!(self, JcmError::Connection(_) | JcmError::ConnectionClosed)
    }
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for JcmError {
    fn from(s: String) -> Self {
        JcmError::Other(s)
    }
}

impl From<&str> for JcmError {
    fn from(s: &str) -> Self {
        JcmError::Other(s.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for JcmError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        JcmError::ChannelClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for JcmError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        JcmError::ChannelClosed
    }
}

impl From<tokio::task::JoinError> for JcmError {
    fn from(e: tokio::task::JoinError) -> Self {
        JcmError::Task(e.to_string())
    }
}

//! Recoverable command failures.
//!
//! None of these end a session. Each one becomes a text response and the
//! client may send the next command straight away.

use thiserror::Error;

use super::strings;
use crate::response::Response;

/// A numeric argument that failed to convert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    /// A character is not a digit of the expected base.
    #[error("'{token}' is not a base-{radix} number")]
    Invalid { token: String, radix: u32 },

    /// Well-formed, but does not fit in 32 bits.
    #[error("'{token}' is out of range")]
    OutOfRange { token: String },
}

/// Why a command produced an error reply instead of running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The line held no tokens.
    #[error("empty command")]
    Empty,

    /// Malformed or under-specified command; carries the usage text.
    #[error("usage error: {0}")]
    Usage(&'static str),

    /// A numeric argument failed to parse; no device call was made.
    #[error("numeric argument rejected: {source}")]
    Numeric {
        #[source]
        source: NumericError,
        usage: &'static str,
    },

    /// Unrecognised verb at some routing level.
    #[error("unknown command: {0}")]
    UnknownCommand(&'static str),
}

impl DispatchError {
    pub fn numeric(source: NumericError, usage: &'static str) -> Self {
        DispatchError::Numeric { source, usage }
    }

    /// Short category name for log lines.
    pub fn category(&self) -> &'static str {
        match self {
            DispatchError::Empty | DispatchError::Usage(_) => "usage",
            DispatchError::Numeric { .. } => "numeric",
            DispatchError::UnknownCommand(_) => "unknown",
        }
    }

    /// The text reply sent in place of a result.
    pub fn into_response(self) -> Response {
        let text = match self {
            DispatchError::Empty => strings::EMPTY_COMMAND,
            DispatchError::Usage(usage) => usage,
            DispatchError::Numeric {
                source: NumericError::OutOfRange { .. },
                ..
            } => strings::OUT_OF_RANGE,
            DispatchError::Numeric { usage, .. } => usage,
            DispatchError::UnknownCommand(text) => text,
        };
        Response::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_has_its_own_text() {
        let invalid = DispatchError::numeric(
            NumericError::Invalid {
                token: "zz".into(),
                radix: 16,
            },
            strings::WRITE_INVALID_ARGS,
        );
        let range = DispatchError::numeric(
            NumericError::OutOfRange {
                token: "123456789".into(),
            },
            strings::WRITE_INVALID_ARGS,
        );
        assert_eq!(
            invalid.into_response().as_text(),
            Some(strings::WRITE_INVALID_ARGS)
        );
        assert_eq!(range.into_response().as_text(), Some(strings::OUT_OF_RANGE));
    }

    #[test]
    fn categories() {
        assert_eq!(DispatchError::Empty.category(), "usage");
        assert_eq!(DispatchError::UnknownCommand("x").category(), "unknown");
    }
}

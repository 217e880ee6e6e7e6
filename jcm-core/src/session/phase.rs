//! Lifecycle of one accepted connection.

use std::time::{Duration, Instant};

use crate::error::JcmError;

/// The current phase of a client session.
///
/// ```text
///  Accepted ──► Serving ──► Terminating ──► Closed
///      │           │                          ▲
///      └───────────┴──── force_close ─────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Socket accepted, roles not yet started.
    #[default]
    Accepted,

    /// Receiver and transmitter are running.
    Serving {
        since: Instant,
    },

    /// The termination flag is raised; roles are winding down.
    Terminating {
        served: Duration,
    },

    /// Socket closed. Terminal.
    Closed,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
            Self::Serving { .. } => write!(f, "Serving"),
            Self::Terminating { .. } => write!(f, "Terminating"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

impl SessionPhase {
    pub fn is_serving(&self) -> bool {
        matches!(self, Self::Serving { .. })
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Time spent serving so far, or in total once terminating.
    pub fn served_duration(&self) -> Option<Duration> {
        match self {
            Self::Serving { since } => Some(since.elapsed()),
            Self::Terminating { served } => Some(*served),
            _ => None,
        }
    }

    /// Valid from: `Accepted`.
    pub fn start(&mut self) -> Result<(), JcmError> {
        match self {
            Self::Accepted => {
                *self = Self::Serving {
                    since: Instant::now(),
                };
                Ok(())
            }
            _ => Err(JcmError::InvalidTransition(
                "cannot start: session not in Accepted state",
            )),
        }
    }

    /// Valid from: `Serving`.
    pub fn terminate(&mut self) -> Result<(), JcmError> {
        match self {
            Self::Serving { since } => {
                *self = Self::Terminating {
                    served: since.elapsed(),
                };
                Ok(())
            }
            _ => Err(JcmError::InvalidTransition(
                "cannot terminate: session not Serving",
            )),
        }
    }

    /// Valid from: `Terminating`.
    pub fn close(&mut self) -> Result<(), JcmError> {
        match self {
            Self::Terminating { .. } => {
                *self = Self::Closed;
                Ok(())
            }
            _ => Err(JcmError::InvalidTransition(
                "cannot close: session not Terminating",
            )),
        }
    }

    /// Jump straight to `Closed`, e.g. when the roles could not be started.
    pub fn force_close(&mut self) {
        *self = Self::Closed;
    }
}

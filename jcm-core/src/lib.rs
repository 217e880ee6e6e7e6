//! # jcm-core
//!
//! Session protocol and command engine for the JCM remote-control server.
//!
//! This crate contains:
//! - **Wire types**: `Response`, `ResponseKind`, `ResponseHeader`
//! - **Codecs**: `CommandCodec` and `ResponseCodec` for framed TCP I/O via `tokio_util`
//! - **Framer**: splits a response into a header frame and bounded payload frames
//! - **Dispatch**: the routing tree that validates commands and calls the device
//! - **Device**: the `Device` facade trait and an in-memory `SimulatedDevice`
//! - **Session**: receiver/transmitter roles joined by a strict handoff
//! - **Network**: the `Listener` accept loop and a `JcmClient`
//! - **Error**: `JcmError`, a `thiserror`-based error hierarchy

pub mod codec;
pub mod command;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod framer;
pub mod header;
pub mod network;
pub mod options;
pub mod response;
pub mod session;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use codec::{CommandCodec, MAX_COMMAND_LEN, MAX_RESPONSE_LEN, ResponseCodec};
pub use command::Command;
pub use device::{Device, Geometry, Register, SimulatedDevice, XadcChannel};
pub use dispatch::{DispatchError, Dispatcher, NumericError, Outcome};
pub use error::JcmError;
pub use framer::{Frame, Framer, MAX_FRAME_SIZE};
pub use header::{HEADER_LENGTH, ResponseHeader};
pub use network::{ConnectionInfo, DEFAULT_BACKLOG, DEFAULT_PORT, JcmClient, Listener};
pub use options::SessionOptions;
pub use response::{Response, ResponseKind};
pub use session::{Session, SessionPhase, SessionState};

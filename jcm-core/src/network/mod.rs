//! TCP plumbing: the server's accept loop and a client for tests and tools.

pub mod client;
pub mod listener;

pub use client::{ConnectionInfo, JcmClient};
pub use listener::{DEFAULT_BACKLOG, DEFAULT_PORT, Listener};

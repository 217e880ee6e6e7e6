//! # jcm-server
//!
//! TCP front end for the JCM command engine. Each client connection gets
//! its own session; commands are line-oriented text, responses are framed
//! text or binary.
//!
//! ## Modes
//!
//! - **Serve** (default): bind, accept and serve until Ctrl-C.
//! - **Info**: `-h`, `-help`, `--help` or `-info` print a description.
//! - **Gen-config**: `--gen-config` prints the default TOML.

pub mod cli;
pub mod config;
pub mod logging;
pub mod service;

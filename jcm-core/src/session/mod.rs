//! One accepted connection, served by two roles.
//!
//! The **receiver** reads command lines, dispatches each one on the
//! blocking pool and hands the result to the **transmitter**, which frames
//! and writes it. The [`handoff`] channel makes the two strictly alternate:
//! a command is not decoded until the previous response is fully written.
//!
//! A shared [`CancellationToken`] is the termination flag. It is raised by
//! `exit`, by end of stream, by any socket error, or by the listener
//! shutting down; either role stops as soon as it sees it.

pub mod handoff;
pub mod phase;

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::codec::{CommandCodec, ResponseCodec};
use crate::command::Command;
use crate::dispatch::{Dispatcher, Outcome, strings};
use crate::error::JcmError;
use crate::framer::Framer;
use crate::options::SessionOptions;
use crate::response::Response;

pub use handoff::{HandoffReceiver, HandoffSender, Transfer, Turn};
pub use phase::SessionPhase;

/// Per-connection state, created on accept and dropped on teardown.
#[derive(Debug)]
pub struct SessionState {
    pub peer: SocketAddr,
    pub options: SessionOptions,
    pub terminated: CancellationToken,
    pub phase: SessionPhase,
}

impl SessionState {
    /// Fresh state: every option off, flag lowered.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            options: SessionOptions::default(),
            terminated: CancellationToken::new(),
            phase: SessionPhase::default(),
        }
    }

    /// Tie the termination flag to an outer token, e.g. server shutdown.
    pub fn with_parent(mut self, parent: &CancellationToken) -> Self {
        self.terminated = parent.child_token();
        self
    }
}

/// An accepted connection waiting to be served.
#[derive(Debug)]
pub struct Session {
    stream: TcpStream,
    state: SessionState,
    dispatcher: Dispatcher,
    framer: Framer,
}

impl Session {
    pub fn new(
        stream: TcpStream,
        state: SessionState,
        dispatcher: Dispatcher,
        framer: Framer,
    ) -> Self {
        Self {
            stream,
            state,
            dispatcher,
            framer,
        }
    }

    /// Serve the connection until it terminates.
    ///
    /// Recoverable command errors never surface here. An `Err` means the
    /// session ended on a transport failure.
    pub async fn run(self) -> Result<(), JcmError> {
        let Session {
            stream,
            mut state,
            dispatcher,
            framer,
        } = self;
        let peer = state.peer;

        state.phase.start()?;
        info!(%peer, "session started");

        let (read_half, write_half) = stream.into_split();
        let (handoff_tx, handoff_rx) = handoff::channel();

        let receiver = Receiver {
            peer,
            reader: FramedRead::new(read_half, CommandCodec::new()),
            dispatcher,
            options: state.options,
            handoff: handoff_tx,
            terminated: state.terminated.clone(),
        };
        let transmitter = Transmitter {
            peer,
            writer: FramedWrite::new(write_half, ResponseCodec::default()),
            framer,
            handoff: handoff_rx,
            last: None,
            terminated: state.terminated.clone(),
        };

        let receiving = tokio::spawn(receiver.run());
        let transmitting = tokio::spawn(transmitter.run());
        let (received, transmitted) = tokio::join!(receiving, transmitting);

        state.terminated.cancel();
        let served = state.phase.served_duration();

        // A write failure also breaks the handoff; report the write failure.
        let result = flatten(transmitted).and(flatten(received));
        if result.is_ok() {
            state.phase.terminate()?;
            state.phase.close()?;
        } else {
            state.phase.force_close();
        }
        match &result {
            Ok(()) => info!(%peer, ?served, "session closed"),
            Err(e) => warn!(%peer, ?served, error = %e, "session closed on error"),
        }
        result
    }
}

fn flatten(joined: Result<Result<(), JcmError>, tokio::task::JoinError>) -> Result<(), JcmError> {
    joined?
}

// ── Receiver ─────────────────────────────────────────────────────

struct Receiver {
    peer: SocketAddr,
    reader: FramedRead<OwnedReadHalf, CommandCodec>,
    dispatcher: Dispatcher,
    options: SessionOptions,
    handoff: HandoffSender,
    terminated: CancellationToken,
}

impl Receiver {
    async fn run(mut self) -> Result<(), JcmError> {
        let _guard = self.terminated.clone().drop_guard();

        loop {
            let line = tokio::select! {
                _ = self.terminated.cancelled() => break,
                next = self.reader.next() => match next {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        warn!(peer = %self.peer, error = %e, "read failed");
                        return Err(e);
                    }
                    None => {
                        debug!(peer = %self.peer, "peer closed the stream");
                        break;
                    }
                },
            };

            let transfer = match self.dispatch(Command::parse(line)).await? {
                Outcome::Reply(response) => Transfer::Fresh(response),
                Outcome::Resend => Transfer::Resend,
                Outcome::Exit => {
                    info!(peer = %self.peer, "client requested exit");
                    break;
                }
            };

            tokio::select! {
                _ = self.terminated.cancelled() => break,
                sent = self.handoff.transfer(transfer) => sent?,
            }
        }
        Ok(())
    }

    /// Run one command on the blocking pool; the device facade blocks.
    async fn dispatch(&mut self, command: Command) -> Result<Outcome, JcmError> {
        debug!(peer = %self.peer, command = command.line(), "command received");
        let dispatcher = self.dispatcher.clone();
        let mut options = self.options;
        let (outcome, options) = tokio::task::spawn_blocking(move || {
            let outcome = dispatcher.dispatch(&command, &mut options);
            (outcome, options)
        })
        .await?;
        self.options = options;
        Ok(outcome)
    }
}

// ── Transmitter ──────────────────────────────────────────────────

struct Transmitter {
    peer: SocketAddr,
    writer: FramedWrite<OwnedWriteHalf, ResponseCodec>,
    framer: Framer,
    handoff: HandoffReceiver,
    /// The most recent fresh response, kept for `resend`.
    last: Option<Response>,
    terminated: CancellationToken,
}

impl Transmitter {
    async fn run(mut self) -> Result<(), JcmError> {
        let _guard = self.terminated.clone().drop_guard();

        let result = loop {
            let turn = tokio::select! {
                _ = self.terminated.cancelled() => break Ok(()),
                turn = self.handoff.next() => match turn {
                    Some(turn) => turn,
                    None => break Ok(()),
                },
            };

            let response = match &turn.transfer {
                Transfer::Fresh(response) => {
                    self.last = Some(response.clone());
                    response.clone()
                }
                Transfer::Resend => match &self.last {
                    Some(last) => last.clone(),
                    None => Response::text(strings::NOTHING_TO_RESEND),
                },
            };

            let sent = tokio::select! {
                _ = self.terminated.cancelled() => break Ok(()),
                sent = self.framer.transmit(&mut self.writer, &response) => sent,
            };
            if let Err(e) = sent {
                warn!(peer = %self.peer, error = %e, "write failed");
                self.terminated.cancel();
                break Err(e);
            }
            turn.complete();
        };

        if let Err(e) = self.writer.close().await {
            debug!(peer = %self.peer, error = %e, "shutdown after session end failed");
        }
        result
    }
}

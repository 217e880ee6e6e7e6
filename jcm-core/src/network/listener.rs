//! Accept loop.
//!
//! Every accepted connection gets its own [`Session`] task with fresh
//! state. Sessions share nothing but the [`Dispatcher`] (and through it the
//! device handle).

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpSocket};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dispatch::Dispatcher;
use crate::error::JcmError;
use crate::framer::Framer;
use crate::session::{Session, SessionState};

/// Port served when none is configured.
pub const DEFAULT_PORT: u16 = 3490;

/// Pending-connection queue length passed to `listen(2)`.
pub const DEFAULT_BACKLOG: u32 = 10;

/// A bound listening socket plus what each session needs.
#[derive(Debug)]
pub struct Listener {
    listener: TcpListener,
    dispatcher: Dispatcher,
    framer: Framer,
    shutdown: CancellationToken,
}

impl Listener {
    /// Bind `addr` with `SO_REUSEADDR` and start listening.
    pub async fn bind(
        addr: SocketAddr,
        backlog: u32,
        dispatcher: Dispatcher,
        framer: Framer,
    ) -> Result<Self, JcmError> {
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(backlog)?;
        info!(addr = %listener.local_addr()?, backlog, "listening");

        Ok(Self {
            listener,
            dispatcher,
            framer,
            shutdown: CancellationToken::new(),
        })
    }

    /// Stop accepting when `token` is cancelled; live sessions end too.
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, JcmError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Accept connections until shut down, then wait for every session.
    ///
    /// A failed `accept` is logged and the loop continues.
    pub async fn run(self) -> Result<(), JcmError> {
        let mut sessions = JoinSet::new();

        loop {
            let accepted = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                accepted = self.listener.accept() => accepted,
                Some(joined) = sessions.join_next(), if !sessions.is_empty() => {
                    reap(joined);
                    continue;
                }
            };

            let (stream, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            };
            if let Err(e) = stream.set_nodelay(true) {
                debug!(%peer, error = %e, "could not disable Nagle");
            }
            info!(%peer, "connection accepted");

            let state = SessionState::new(peer).with_parent(&self.shutdown);
            let session = Session::new(stream, state, self.dispatcher.clone(), self.framer.clone());
            sessions.spawn(session.run());
        }

        info!(sessions = sessions.len(), "listener stopping");
        while let Some(joined) = sessions.join_next().await {
            reap(joined);
        }
        Ok(())
    }
}

/// Session errors are logged by the session itself; only panics are left.
fn reap(joined: Result<Result<(), JcmError>, tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "session task failed");
    }
}

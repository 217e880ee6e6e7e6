//! Turn-taking between a session's receiver and transmitter.
//!
//! The receiver gives up its turn together with the response it produced
//! and gets the turn back only once the transmitter has written every frame
//! of it. The channel holds at most one transfer, so the two roles strictly
//! alternate and the response buffer has exactly one owner at a time.

use tokio::sync::{mpsc, oneshot};

use crate::error::JcmError;
use crate::response::Response;

/// What the transmitter is asked to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// A newly produced response. It replaces the previous one.
    Fresh(Response),
    /// The previous response, again.
    Resend,
}

/// One turn held by the transmitter.
///
/// Dropping it without calling [`Turn::complete`] tells the receiver that
/// the transmitter gave up, which ends the session.
#[derive(Debug)]
pub struct Turn {
    pub transfer: Transfer,
    done: oneshot::Sender<()>,
}

impl Turn {
    /// Hand the turn back to the receiver.
    pub fn complete(self) {
        // The receiver may already be gone; nothing left to hand back to.
        let _ = self.done.send(());
    }
}

/// Receiver side of the handoff.
#[derive(Debug, Clone)]
pub struct HandoffSender {
    tx: mpsc::Sender<Turn>,
}

impl HandoffSender {
    /// Give the turn away and wait until it comes back.
    pub async fn transfer(&self, transfer: Transfer) -> Result<(), JcmError> {
        let (done, returned) = oneshot::channel();
        self.tx.send(Turn { transfer, done }).await?;
        returned.await?;
        Ok(())
    }
}

/// Transmitter side of the handoff.
#[derive(Debug)]
pub struct HandoffReceiver {
    rx: mpsc::Receiver<Turn>,
}

impl HandoffReceiver {
    /// Wait for the next turn. `None` once the receiver is gone.
    pub async fn next(&mut self) -> Option<Turn> {
        self.rx.recv().await
    }
}

pub fn channel() -> (HandoffSender, HandoffReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (HandoffSender { tx }, HandoffReceiver { rx })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[tokio::test]
    async fn transfer_waits_for_completion() {
        let (tx, mut rx) = channel();
        let sent = Arc::new(AtomicBool::new(false));

        let flag = sent.clone();
        let transmitter = tokio::spawn(async move {
            let turn = rx.next().await.expect("turn");
            tokio::task::yield_now().await;
            flag.store(true, Ordering::SeqCst);
            turn.complete();
            turn_payload_len(rx).await
        });

        tx.transfer(Transfer::Fresh(Response::text("hi")))
            .await
            .unwrap();
        assert!(sent.load(Ordering::SeqCst));
        drop(tx);
        assert_eq!(transmitter.await.unwrap(), 0);
    }

    async fn turn_payload_len(mut rx: HandoffReceiver) -> usize {
        let mut total = 0;
        while let Some(turn) = rx.next().await {
            if let Transfer::Fresh(r) = &turn.transfer {
                total += r.len();
            }
            turn.complete();
        }
        total
    }

    #[tokio::test]
    async fn dropped_turn_is_an_error() {
        let (tx, mut rx) = channel();
        let transmitter = tokio::spawn(async move {
            let turn = rx.next().await.expect("turn");
            drop(turn);
        });

        let result = tx.transfer(Transfer::Resend).await;
        assert!(matches!(result, Err(JcmError::ChannelClosed)));
        transmitter.await.unwrap();
    }

    #[tokio::test]
    async fn transfer_fails_without_transmitter() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(matches!(
            tx.transfer(Transfer::Resend).await,
            Err(JcmError::ChannelClosed)
        ));
    }
}

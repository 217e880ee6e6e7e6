//! Response framing: one header frame, then the payload in bounded frames.
//!
//! ```text
//! ┌──────────────┬──────────────────┐
//! │ kind (u32 LE)│ total_len (u32 LE)│   header frame, 8 bytes
//! └──────────────┴──────────────────┘
//! ┌──────────── ≤ M bytes ──────────┐
//! │ payload[0 .. M]                  │   payload frame 1
//! └──────────────────────────────────┘
//!                 ...
//! ┌──────── total_len mod M ────┐
//! │ payload[(n-1)·M .. len]      │       payload frame n (may be short)
//! └──────────────────────────────┘
//! ```
//!
//! Every frame goes out as its own write. A write failure is returned to the
//! caller, which ends the session; nothing is retried.

use std::time::Duration;

use bytes::Bytes;
use futures::{Sink, SinkExt};
use tracing::debug;

use crate::error::JcmError;
use crate::header::ResponseHeader;
use crate::response::Response;

/// Maximum payload bytes per frame in the reference deployment.
pub const MAX_FRAME_SIZE: usize = 1024;

/// One discrete write to the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Header(ResponseHeader),
    Payload(Bytes),
}

/// Splits responses into frames and writes them to a sink.
#[derive(Debug, Clone)]
pub struct Framer {
    max_frame_size: usize,
    settle_delay: Duration,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new(MAX_FRAME_SIZE)
    }
}

impl Framer {
    /// A zero `max_frame_size` is treated as one byte per frame.
    pub fn new(max_frame_size: usize) -> Self {
        Self {
            max_frame_size: max_frame_size.max(1),
            settle_delay: Duration::ZERO,
        }
    }

    /// Pause after the header of multi-frame responses. Older clients read
    /// the header with a separate fixed-size read and need this gap.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    /// Number of payload frames a response of `len` bytes needs.
    pub fn payload_frame_count(&self, len: usize) -> usize {
        len.div_ceil(self.max_frame_size)
    }

    /// The full frame sequence for `response`, header first.
    pub fn frames(&self, response: &Response) -> Result<Vec<Frame>, JcmError> {
        let total = u32::try_from(response.len()).map_err(|_| JcmError::FrameTooLarge {
            size: response.len(),
            max: u32::MAX as usize,
        })?;

        let payload = response.payload();
        let mut frames = Vec::with_capacity(1 + self.payload_frame_count(payload.len()));
        frames.push(Frame::Header(ResponseHeader::new(response.kind(), total)));

        let mut offset = 0;
        while offset < payload.len() {
            let end = (offset + self.max_frame_size).min(payload.len());
            frames.push(Frame::Payload(payload.slice(offset..end)));
            offset = end;
        }
        Ok(frames)
    }

    /// Write `response` to `sink`, flushing after every frame.
    ///
    /// Returns the number of payload frames sent.
    pub async fn transmit<S>(&self, sink: &mut S, response: &Response) -> Result<usize, JcmError>
    where
        S: Sink<Frame, Error = JcmError> + Unpin,
    {
        let frames = self.frames(response)?;
        let payload_frames = frames.len() - 1;
        let multi_frame = response.len() > self.max_frame_size;

        for frame in frames {
            let is_header = matches!(frame, Frame::Header(_));
            sink.send(frame).await?;
            if is_header && multi_frame && !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }
        }

        debug!(
            frames = payload_frames,
            kind = response.kind().label(),
            len = response.len(),
            "response sent"
        );
        Ok(payload_frames)
    }
}

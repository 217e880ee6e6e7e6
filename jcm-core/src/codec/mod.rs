//! `tokio_util` codecs for both directions of a JCM connection.
//!
//! - [`CommandCodec`]: client → server command lines. The server decodes,
//!   the client encodes.
//! - [`ResponseCodec`]: server → client frames. The server encodes one
//!   [`Frame`] per write, the client decodes whole [`Response`]s.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::JcmError;
use crate::framer::Frame;
use crate::header::{HEADER_LENGTH, ResponseHeader};
use crate::response::Response;

/// Longest command accepted in one piece; longer input is cut here.
pub const MAX_COMMAND_LEN: usize = 1023;

/// Upper bound on a decoded response (client side).
pub const MAX_RESPONSE_LEN: usize = 64 * 1024 * 1024;

// ── CommandCodec ─────────────────────────────────────────────────

/// Line codec for commands.
///
/// A line ends at `\n` (a trailing `\r` is dropped). Clients that send bare
/// commands without a terminator are also served: until the first newline
/// is seen, whatever a read delivered is taken as one command. After that
/// the codec waits for the terminator. Either way a command is cut at
/// [`MAX_COMMAND_LEN`] bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandCodec {
    line_mode: bool,
}

impl CommandCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a newline-terminated command has been seen on this stream.
    pub fn is_line_mode(&self) -> bool {
        self.line_mode
    }

    fn take(src: &mut BytesMut, len: usize) -> String {
        let mut line = src.split_to(len);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        String::from_utf8_lossy(&line).into_owned()
    }
}

impl Decoder for CommandCodec {
    type Item = String;
    type Error = JcmError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        // A terminator right after a full-length command still belongs to it.
        let window = src.len().min(MAX_COMMAND_LEN + 1);
        match src[..window].iter().position(|b| *b == b'\n') {
            Some(pos) => {
                self.line_mode = true;
                let line = Self::take(src, pos);
                src.advance(1);
                Ok(Some(line))
            }
            None if src.len() > MAX_COMMAND_LEN => {
                let line = Self::take(src, MAX_COMMAND_LEN);
                if src.starts_with(b"\r\n") {
                    src.advance(2);
                }
                Ok(Some(line))
            }
            None if !self.line_mode => {
                let len = src.len();
                Ok(Some(Self::take(src, len)))
            }
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                let len = src.len();
                Ok(Some(Self::take(src, len)))
            }
        }
    }
}

impl<T: AsRef<str>> Encoder<T> for CommandCodec {
    type Error = JcmError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let line = item.as_ref();
        if line.contains('\n') {
            return Err(JcmError::Other("command contains a line break".into()));
        }
        if line.len() > MAX_COMMAND_LEN {
            return Err(JcmError::FrameTooLarge {
                size: line.len(),
                max: MAX_COMMAND_LEN,
            });
        }
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

// ── ResponseCodec ────────────────────────────────────────────────

/// Header + payload codec for responses.
#[derive(Debug, Clone, Copy)]
pub struct ResponseCodec {
    max_response_len: usize,
}

impl Default for ResponseCodec {
    fn default() -> Self {
        Self {
            max_response_len: MAX_RESPONSE_LEN,
        }
    }
}

impl ResponseCodec {
    pub fn with_max_response_len(max_response_len: usize) -> Self {
        Self { max_response_len }
    }
}

impl Encoder<Frame> for ResponseCodec {
    type Error = JcmError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Frame::Header(header) => dst.extend_from_slice(&header.to_bytes()),
            Frame::Payload(bytes) => dst.extend_from_slice(&bytes),
        }
        Ok(())
    }
}

impl Decoder for ResponseCodec {
    type Item = Response;
    type Error = JcmError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < HEADER_LENGTH {
            return Ok(None);
        }

        let mut raw = [0u8; HEADER_LENGTH];
        raw.copy_from_slice(&src[..HEADER_LENGTH]);
        let header = ResponseHeader::from_bytes(raw)?;
        let total = header.total_length() as usize;
        if total > self.max_response_len {
            return Err(JcmError::FrameTooLarge {
                size: total,
                max: self.max_response_len,
            });
        }

        if src.len() < HEADER_LENGTH + total {
            src.reserve(HEADER_LENGTH + total - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LENGTH);
        let payload = src.split_to(total).freeze();
        Ok(Some(Response::new(header.kind(), payload)))
    }
}

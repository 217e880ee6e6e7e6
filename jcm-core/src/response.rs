//! Response descriptors produced by the dispatcher.
//!
//! A [`Response`] owns its payload. It is built once per command, moved to
//! the transmitter, and never touched again by the dispatcher.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::JcmError;

// ── ResponseKind ─────────────────────────────────────────────────

/// Tag carried in the first header field.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    /// Human-readable ASCII text.
    Text = 0x1,
    /// Raw little-endian words or floats.
    Binary = 0x2,
}

impl ResponseKind {
    /// Short label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            ResponseKind::Text => "txt",
            ResponseKind::Binary => "bin",
        }
    }
}

impl TryFrom<u32> for ResponseKind {
    type Error = JcmError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x1 => Ok(ResponseKind::Text),
            0x2 => Ok(ResponseKind::Binary),
            _ => Err(JcmError::UnknownVariant {
                type_name: "ResponseKind",
                value: value as u64,
            }),
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Response ─────────────────────────────────────────────────────

/// One command's result: a kind tag and an owned payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    kind: ResponseKind,
    payload: Bytes,
}

impl Response {
    pub fn new(kind: ResponseKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// A text response. Replies never carry a trailing newline; the client
    /// adds its own.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ResponseKind::Text, text.into().into_bytes())
    }

    pub fn binary(payload: impl Into<Bytes>) -> Self {
        Self::new(ResponseKind::Binary, payload)
    }

    /// A single 32-bit register value.
    pub fn word(value: u32) -> Self {
        Self::binary(Bytes::copy_from_slice(&value.to_le_bytes()))
    }

    /// A run of 32-bit words, e.g. frame data.
    pub fn words(values: &[u32]) -> Self {
        let mut buf = BytesMut::with_capacity(values.len() * 4);
        for value in values {
            buf.put_u32_le(*value);
        }
        Self::binary(buf.freeze())
    }

    /// A single telemetry sample.
    pub fn float(value: f32) -> Self {
        Self::binary(Bytes::copy_from_slice(&value.to_le_bytes()))
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// Total payload length in bytes, as announced in the header.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The payload as text, when this is a text response.
    pub fn as_text(&self) -> Option<&str> {
        match self.kind {
            ResponseKind::Text => std::str::from_utf8(&self.payload).ok(),
            ResponseKind::Binary => None,
        }
    }

    /// Decode the payload as little-endian words. Trailing bytes that do not
    /// fill a word are ignored.
    pub fn to_words(&self) -> Vec<u32> {
        self.payload
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Response");
        s.field("kind", &self.kind).field("len", &self.len());
        if let Some(text) = self.as_text() {
            s.field("text", &text);
        }
        s.finish()
    }
}

use crate::JcmError;
use crate::response::ResponseKind;

/// Size of the header frame on the wire: two little-endian `u32` fields.
pub const HEADER_LENGTH: usize = 8;

pub type ResponseHeaderBytes = [u8; HEADER_LENGTH];

/// The fixed header frame sent ahead of every response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    kind: ResponseKind,
    total_length: u32,
}

impl ResponseHeader {
    pub fn new(kind: ResponseKind, total_length: u32) -> Self {
        Self { kind, total_length }
    }

    pub fn to_bytes(&self) -> ResponseHeaderBytes {
        let mut header: ResponseHeaderBytes = [0; HEADER_LENGTH];
        header[0..4].copy_from_slice(&(self.kind as u32).to_le_bytes());
        header[4..8].copy_from_slice(&self.total_length.to_le_bytes());
        header
    }

    pub fn from_bytes(bytes: ResponseHeaderBytes) -> Result<Self, JcmError> {
        let [k0, k1, k2, k3, l0, l1, l2, l3] = bytes;
        let kind = ResponseKind::try_from(u32::from_le_bytes([k0, k1, k2, k3]))
            .map_err(|_| JcmError::InvalidHeader("unknown response kind"))?;
        Ok(Self {
            kind,
            total_length: u32::from_le_bytes([l0, l1, l2, l3]),
        })
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn total_length(&self) -> u32 {
        self.total_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_kind_then_length() {
        let bytes = ResponseHeader::new(ResponseKind::Binary, 4040).to_bytes();
        assert_eq!(bytes, [2, 0, 0, 0, 0xC8, 0x0F, 0, 0]);
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = ResponseHeader::from_bytes([9, 0, 0, 0, 1, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, JcmError::InvalidHeader(_)));
    }

    #[test]
    fn parses_text_header() {
        let header = ResponseHeader::from_bytes([1, 0, 0, 0, 5, 0, 0, 0]).unwrap();
        assert_eq!(header.kind(), ResponseKind::Text);
        assert_eq!(header.total_length(), 5);
    }
}

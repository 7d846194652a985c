use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ApduError, Result};

/// Class, instruction, P1, P2 and payload length: 5 bytes.
pub const APDU_HEADER_SIZE: usize = 5;

/// Largest payload the 1-byte length field can describe.
pub const MAX_APDU_PAYLOAD: usize = u8::MAX as usize;

/// A structured APDU command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduCommand {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub payload: Bytes,
}

impl ApduCommand {
    pub fn new(cla: u8, ins: u8, p1: u8, p2: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            payload: payload.into(),
        }
    }

    /// Encode as `[cla, ins, p1, p2, len, payload..]`.
    ///
    /// A payload over [`MAX_APDU_PAYLOAD`] is a caller bug and is refused here,
    /// before anything reaches the device.
    pub fn encode(&self) -> Result<Bytes> {
        if self.payload.len() > MAX_APDU_PAYLOAD {
            return Err(ApduError::PayloadTooLarge {
                size: self.payload.len(),
                max: MAX_APDU_PAYLOAD,
            });
        }

        let mut buf = BytesMut::with_capacity(APDU_HEADER_SIZE + self.payload.len());
        buf.put_u8(self.cla);
        buf.put_u8(self.ins);
        buf.put_u8(self.p1);
        buf.put_u8(self.p2);
        buf.put_u8(self.payload.len() as u8);
        buf.put_slice(&self.payload);
        Ok(buf.freeze())
    }
}

use bytes::{BufMut, BytesMut};
use ledgerwire_transport::REPORT_SIZE;

use crate::error::{FrameError, Result};

/// Channel id carried by every packet.
pub const CHANNEL_ID: u16 = 0x0101;

/// Command tag carried by every packet.
pub const COMMAND_TAG: u8 = 0x05;

/// Packet size on the wire. One packet is one HID report.
pub const PACKET_SIZE: usize = REPORT_SIZE;

/// Packet header: channel (2) + tag (1) + sequence (2) = 5 bytes.
pub const HEADER_SIZE: usize = 5;

/// Message bytes carried per packet.
pub const PACKET_PAYLOAD_SIZE: usize = PACKET_SIZE - HEADER_SIZE;

/// Size of the big-endian length prefix in front of every message.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest message the length prefix can describe.
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// One 64-byte HID packet.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────┬──────────────┬──────────────────────┐
/// │ Channel (2B) │ Tag (1B) │ Sequence     │ Payload (59B)        │
/// │ 0x01 0x01    │ 0x05     │ (2B BE)      │ zero padded          │
/// └──────────────┴──────────┴──────────────┴──────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HidPacket {
    pub channel: u16,
    pub tag: u8,
    pub sequence: u16,
    pub payload: [u8; PACKET_PAYLOAD_SIZE],
}

impl HidPacket {
    /// Build a packet on the fixed channel carrying `chunk`.
    ///
    /// `chunk` must be at most [`PACKET_PAYLOAD_SIZE`] bytes.
    pub fn new(sequence: u16, chunk: &[u8]) -> Self {
        assert!(
            chunk.len() <= PACKET_PAYLOAD_SIZE,
            "packet chunk exceeds {PACKET_PAYLOAD_SIZE} bytes"
        );
        let mut payload = [0u8; PACKET_PAYLOAD_SIZE];
        payload[..chunk.len()].copy_from_slice(chunk);
        Self {
            channel: CHANNEL_ID,
            tag: COMMAND_TAG,
            sequence,
            payload,
        }
    }

    /// Split a full report into its fields. Nothing is validated here.
    pub fn from_report(report: &[u8; PACKET_SIZE]) -> Self {
        let mut payload = [0u8; PACKET_PAYLOAD_SIZE];
        payload.copy_from_slice(&report[HEADER_SIZE..]);
        Self {
            channel: u16::from_be_bytes([report[0], report[1]]),
            tag: report[2],
            sequence: u16::from_be_bytes([report[3], report[4]]),
            payload,
        }
    }

    /// Parse a packet from a buffer that must be exactly one report long.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        let report: &[u8; PACKET_SIZE] = buf
            .try_into()
            .map_err(|_| FrameError::InvalidPacketSize { len: buf.len() })?;
        Ok(Self::from_report(report))
    }

    /// Serialize into a full report.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut report = [0u8; PACKET_SIZE];
        report[..2].copy_from_slice(&self.channel.to_be_bytes());
        report[2] = self.tag;
        report[3..HEADER_SIZE].copy_from_slice(&self.sequence.to_be_bytes());
        report[HEADER_SIZE..].copy_from_slice(&self.payload);
        report
    }

    /// Check channel, then tag, then sequence.
    pub fn validate(&self, expected_sequence: u16) -> Result<()> {
        if self.channel != CHANNEL_ID {
            return Err(FrameError::ChannelMismatch {
                found: self.channel,
            });
        }
        if self.tag != COMMAND_TAG {
            return Err(FrameError::CommandTagMismatch { found: self.tag });
        }
        if self.sequence != expected_sequence {
            return Err(FrameError::SequenceMismatch {
                expected: expected_sequence,
                found: self.sequence,
            });
        }
        Ok(())
    }
}

/// Write the length prefix and message into `dst`.
pub fn encode_message(message: &[u8], dst: &mut BytesMut) -> Result<()> {
    if message.len() > MAX_MESSAGE_SIZE {
        return Err(FrameError::MessageTooLarge {
            size: message.len(),
            max: MAX_MESSAGE_SIZE,
        });
    }
    dst.reserve(LENGTH_PREFIX_SIZE + message.len());
    dst.put_u16(message.len() as u16);
    dst.put_slice(message);
    Ok(())
}

/// Split a message into the packets that carry it, sequence 0 first.
pub fn packetize(message: &[u8]) -> Result<Vec<HidPacket>> {
    let mut buf = BytesMut::new();
    encode_message(message, &mut buf)?;

    // MAX_MESSAGE_SIZE bounds the packet count well below u16::MAX.
    Ok(buf
        .chunks(PACKET_PAYLOAD_SIZE)
        .enumerate()
        .map(|(seq, chunk)| HidPacket::new(seq as u16, chunk))
        .collect())
}

use bytes::{Buf, Bytes};
use ledgerwire_transport::HidTransport;
use tracing::{debug, trace};

use crate::error::{FrameError, Result};
use crate::packet::{packetize, HidPacket, PACKET_SIZE};

/// Framing state for one device handle.
///
/// Owns the transport exclusively and holds the receive-side state: the
/// sequence number the next packet must carry and the unread tail of the last
/// packet. One logical exchange at a time: call [`reset`](Self::reset) before
/// reading the reply to a new message.
pub struct FrameSession<T> {
    inner: T,
    expected_sequence: u16,
    pending: Bytes,
}

impl<T: HidTransport> FrameSession<T> {
    /// Create a session over `inner`.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            expected_sequence: 0,
            pending: Bytes::new(),
        }
    }

    /// Frame and write a whole message, one report per packet.
    ///
    /// Any failed or short write aborts the message. Nothing is retried.
    pub fn send(&mut self, message: &[u8]) -> Result<()> {
        let packets = packetize(message)?;
        trace!("HID <= {}", hex::encode(message));
        debug!(len = message.len(), packets = packets.len(), "sending message");

        for packet in &packets {
            let written = self.inner.write_report(&packet.to_bytes())?;
            if written != PACKET_SIZE {
                return Err(FrameError::ShortWrite { written });
            }
        }
        Ok(())
    }

    /// Pull up to `buf.len()` received bytes.
    ///
    /// Bytes left over from the last packet are returned first without
    /// touching the transport. Otherwise exactly one packet is read and
    /// validated. Returns the number of bytes copied.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.pending.is_empty() {
            let packet = self.read_packet()?;
            self.pending = Bytes::copy_from_slice(&packet.payload);
        }

        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.advance(n);
        Ok(n)
    }

    /// Fill `buf` completely, reading as many packets as needed.
    pub fn receive_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            filled += self.receive(&mut buf[filled..])?;
        }
        Ok(())
    }

    /// Start a new exchange: expect sequence 0 and drop any unread tail.
    pub fn reset(&mut self) {
        self.expected_sequence = 0;
        self.pending.clear();
    }

    /// Sequence number the next received packet must carry.
    pub fn expected_sequence(&self) -> u16 {
        self.expected_sequence
    }

    /// Bytes of the last packet not yet handed to the caller.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn read_packet(&mut self) -> Result<HidPacket> {
        let mut report = [0u8; PACKET_SIZE];
        let len = self.inner.read_report(&mut report)?;
        if len != PACKET_SIZE {
            return Err(FrameError::TransportContract { len });
        }
        trace!("HID => {}", hex::encode(report));

        let packet = HidPacket::from_report(&report);
        packet.validate(self.expected_sequence)?;
        self.expected_sequence = self.expected_sequence.wrapping_add(1);
        Ok(packet)
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the session and return the transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for FrameSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSession")
            .field("expected_sequence", &self.expected_sequence)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use ledgerwire_transport::{MemoryTransport, TransportError, REPORT_SIZE};

    use super::*;
    use crate::packet::{CHANNEL_ID, COMMAND_TAG, HEADER_SIZE, LENGTH_PREFIX_SIZE};

    /// Send `message` and read it back through a loopback transport.
    fn roundtrip(message: &[u8]) -> Vec<u8> {
        let mut session = FrameSession::new(MemoryTransport::loopback());
        session.send(message).unwrap();

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        session.receive_exact(&mut prefix).unwrap();
        let mut out = vec![0u8; u16::from_be_bytes(prefix) as usize];
        session.receive_exact(&mut out).unwrap();
        out
    }

    fn report(channel: u16, tag: u8, sequence: u16) -> Vec<u8> {
        let mut report = vec![0u8; REPORT_SIZE];
        report[..2].copy_from_slice(&channel.to_be_bytes());
        report[2] = tag;
        report[3..5].copy_from_slice(&sequence.to_be_bytes());
        report
    }

    #[test]
    fn roundtrip_across_lengths() {
        for len in [0usize, 1, 56, 57, 58, 59, 60, 116, 117, 118, 255, 1000, 4096, 10_000] {
            let message: Vec<u8> = (0..len).map(|i| (i * 7 % 251) as u8).collect();
            assert_eq!(roundtrip(&message), message, "length {len}");
        }
    }

    #[test]
    fn wire_sequence_numbers_are_contiguous() {
        let mut session = FrameSession::new(MemoryTransport::new());
        session.send(&[0xC3; 500]).unwrap();

        let reports = session.get_ref().outbound();
        // 502 framed bytes over 59-byte chunks.
        assert_eq!(reports.len(), 9);
        for (i, report) in reports.iter().enumerate() {
            assert_eq!(u16::from_be_bytes([report[0], report[1]]), CHANNEL_ID);
            assert_eq!(report[2], COMMAND_TAG);
            assert_eq!(u16::from_be_bytes([report[3], report[4]]), i as u16);
        }
    }

    #[test]
    fn send_prefixes_length() {
        let mut session = FrameSession::new(MemoryTransport::new());
        session.send(b"hello").unwrap();

        let report = session.get_ref().outbound()[0];
        assert_eq!(&report[HEADER_SIZE..HEADER_SIZE + 7], b"\x00\x05hello");
    }

    #[test]
    fn rejects_wrong_channel() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound(report(0x0102, COMMAND_TAG, 0));
        let mut session = FrameSession::new(transport);

        let err = session.receive(&mut [0u8; 4]).unwrap_err();
        assert!(matches!(err, FrameError::ChannelMismatch { found: 0x0102 }));
    }

    #[test]
    fn rejects_wrong_command_tag() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound(report(CHANNEL_ID, 0x06, 0));
        let mut session = FrameSession::new(transport);

        let err = session.receive(&mut [0u8; 4]).unwrap_err();
        assert!(matches!(err, FrameError::CommandTagMismatch { found: 0x06 }));
    }

    #[test]
    fn rejects_sequence_skip() {
        let mut transport = MemoryTransport::new();
        transport.extend_inbound([
            report(CHANNEL_ID, COMMAND_TAG, 0),
            report(CHANNEL_ID, COMMAND_TAG, 1),
            report(CHANNEL_ID, COMMAND_TAG, 3),
        ]);
        let mut session = FrameSession::new(transport);

        let mut buf = [0u8; 59];
        session.receive(&mut buf).unwrap();
        session.receive(&mut buf).unwrap();
        let err = session.receive(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::SequenceMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn rejects_sequence_repeat() {
        let mut transport = MemoryTransport::new();
        transport.extend_inbound([
            report(CHANNEL_ID, COMMAND_TAG, 0),
            report(CHANNEL_ID, COMMAND_TAG, 1),
            report(CHANNEL_ID, COMMAND_TAG, 1),
        ]);
        let mut session = FrameSession::new(transport);

        let mut buf = [0u8; 59];
        session.receive(&mut buf).unwrap();
        session.receive(&mut buf).unwrap();
        let err = session.receive(&mut buf).unwrap_err();
        assert!(matches!(
            err,
            FrameError::SequenceMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn short_read_is_contract_violation() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound(vec![0u8; 32]);
        let mut session = FrameSession::new(transport);

        let err = session.receive(&mut [0u8; 2]).unwrap_err();
        assert!(matches!(err, FrameError::TransportContract { len: 32 }));
    }

    #[test]
    fn closed_transport_propagates() {
        let mut session = FrameSession::new(MemoryTransport::new());
        let err = session.receive(&mut [0u8; 2]).unwrap_err();
        assert!(matches!(err, FrameError::Transport(TransportError::Closed)));
    }

    #[test]
    fn drains_pending_without_io() {
        let mut transport = MemoryTransport::new();
        let mut first = report(CHANNEL_ID, COMMAND_TAG, 0);
        first[HEADER_SIZE..HEADER_SIZE + 4].copy_from_slice(b"abcd");
        transport.extend_inbound([first, report(CHANNEL_ID, COMMAND_TAG, 1)]);
        let mut session = FrameSession::new(transport);

        let mut buf = [0u8; 2];
        assert_eq!(session.receive(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(session.get_ref().pending_inbound(), 1);

        assert_eq!(session.receive(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"cd");
        assert_eq!(session.get_ref().pending_inbound(), 1);
        assert_eq!(session.pending_len(), 55);
    }

    #[test]
    fn receive_caps_at_packet_payload() {
        let mut transport = MemoryTransport::new();
        transport.push_inbound(report(CHANNEL_ID, COMMAND_TAG, 0));
        let mut session = FrameSession::new(transport);

        let mut buf = [0u8; 200];
        assert_eq!(session.receive(&mut buf).unwrap(), 59);
        assert_eq!(session.expected_sequence(), 1);
    }

    #[test]
    fn empty_buffer_does_no_io() {
        let mut session = FrameSession::new(MemoryTransport::new());
        assert_eq!(session.receive(&mut []).unwrap(), 0);
    }

    #[test]
    fn reset_zeroes_sequence_and_drops_tail() {
        let mut session = FrameSession::new(MemoryTransport::loopback());
        session.send(&[1u8; 100]).unwrap();
        session.receive(&mut [0u8; 10]).unwrap();
        assert_eq!(session.expected_sequence(), 1);
        assert_eq!(session.pending_len(), 49);

        session.reset();
        assert_eq!(session.expected_sequence(), 0);
        assert_eq!(session.pending_len(), 0);
    }

    #[test]
    fn second_message_needs_reset() {
        let mut session = FrameSession::new(MemoryTransport::loopback());
        assert_eq!(roundtrip_on(&mut session, b"first"), b"first");

        // Drain the padding left in the first reply packet.
        let mut tail = vec![0u8; session.pending_len()];
        session.receive_exact(&mut tail).unwrap();

        session.send(b"second").unwrap();
        let err = session.receive(&mut [0u8; 2]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::SequenceMismatch {
                expected: 1,
                found: 0
            }
        ));
    }

    fn roundtrip_on(session: &mut FrameSession<MemoryTransport>, message: &[u8]) -> Vec<u8> {
        session.reset();
        session.send(message).unwrap();
        let mut prefix = [0u8; 2];
        session.receive_exact(&mut prefix).unwrap();
        let mut out = vec![0u8; u16::from_be_bytes(prefix) as usize];
        session.receive_exact(&mut out).unwrap();
        out
    }

    #[test]
    fn short_write_aborts_message() {
        struct HalfWriter {
            writes: usize,
        }

        impl HidTransport for HalfWriter {
            fn write_report(
                &mut self,
                _report: &[u8; REPORT_SIZE],
            ) -> ledgerwire_transport::Result<usize> {
                self.writes += 1;
                Ok(REPORT_SIZE / 2)
            }

            fn read_report(
                &mut self,
                _buf: &mut [u8; REPORT_SIZE],
            ) -> ledgerwire_transport::Result<usize> {
                Err(TransportError::Closed)
            }
        }

        let mut session = FrameSession::new(HalfWriter { writes: 0 });
        let err = session.send(&[0u8; 500]).unwrap_err();
        assert!(matches!(err, FrameError::ShortWrite { written: 32 }));
        assert_eq!(session.get_ref().writes, 1);
    }

    #[test]
    fn write_error_stops_remaining_packets() {
        struct FailingWriter {
            sent: Vec<[u8; REPORT_SIZE]>,
            fail_at: usize,
        }

        impl HidTransport for FailingWriter {
            fn write_report(
                &mut self,
                report: &[u8; REPORT_SIZE],
            ) -> ledgerwire_transport::Result<usize> {
                if self.sent.len() == self.fail_at {
                    return Err(TransportError::Hid("device unplugged".to_string()));
                }
                self.sent.push(*report);
                Ok(REPORT_SIZE)
            }

            fn read_report(
                &mut self,
                _buf: &mut [u8; REPORT_SIZE],
            ) -> ledgerwire_transport::Result<usize> {
                Err(TransportError::Closed)
            }
        }

        let mut session = FrameSession::new(FailingWriter {
            sent: Vec::new(),
            fail_at: 1,
        });
        // 500 bytes span 9 packets; the second write fails.
        let err = session.send(&[0u8; 500]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Hid(ref msg)) if msg == "device unplugged"
        ));

        let sent = &session.get_ref().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(u16::from_be_bytes([sent[0][3], sent[0][4]]), 0);
    }

    #[test]
    fn oversized_message_rejected_before_io() {
        let mut session = FrameSession::new(MemoryTransport::new());
        let message = vec![0u8; 70_000];
        let err = session.send(&message).unwrap_err();
        assert!(matches!(err, FrameError::MessageTooLarge { .. }));
        assert!(session.get_ref().outbound().is_empty());
    }
}

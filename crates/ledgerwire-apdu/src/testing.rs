//! Device doubles shared by the unit tests.

use ledgerwire_frame::{packetize, HidPacket, LENGTH_PREFIX_SIZE};
use ledgerwire_transport::{HidTransport, MemoryTransport, Result, REPORT_SIZE};

use crate::command::APDU_HEADER_SIZE;

/// Transport with `reply` already queued as framed packets.
pub fn scripted(reply: &[u8]) -> MemoryTransport {
    let mut transport = MemoryTransport::new();
    transport.extend_inbound(framed(reply));
    transport
}

pub fn framed(message: &[u8]) -> Vec<Vec<u8>> {
    packetize(message)
        .expect("reply fits the length prefix")
        .iter()
        .map(|p| p.to_bytes().to_vec())
        .collect()
}

/// Device that answers every APDU with its own payload followed by 0x9000.
#[derive(Debug, Default)]
pub struct EchoDevice {
    request: Vec<u8>,
    pub requests: Vec<Vec<u8>>,
    replies: MemoryTransport,
}

impl HidTransport for EchoDevice {
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize> {
        let packet = HidPacket::from_report(report);
        if packet.sequence == 0 {
            self.request.clear();
        }
        self.request.extend_from_slice(&packet.payload);

        let len = u16::from_be_bytes([self.request[0], self.request[1]]) as usize;
        if self.request.len() >= LENGTH_PREFIX_SIZE + len {
            let apdu = self.request[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + len].to_vec();
            let mut reply = apdu[APDU_HEADER_SIZE..].to_vec();
            reply.extend_from_slice(&[0x90, 0x00]);
            self.replies.extend_inbound(framed(&reply));
            self.requests.push(apdu);
        }
        Ok(REPORT_SIZE)
    }

    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        self.replies.read_report(buf)
    }
}

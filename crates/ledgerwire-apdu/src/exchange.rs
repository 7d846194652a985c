use bytes::{Bytes, BytesMut};
use ledgerwire_frame::{FrameSession, LENGTH_PREFIX_SIZE};
use ledgerwire_transport::HidTransport;
use tracing::debug;

use crate::command::ApduCommand;
use crate::error::Result;

/// One APDU round trip at a time over a [`FrameSession`].
///
/// `exchange` takes `&mut self`, so a second exchange cannot start before the
/// first one's response has been read in full.
#[derive(Debug)]
pub struct ApduExchange<T> {
    session: FrameSession<T>,
}

impl<T: HidTransport> ApduExchange<T> {
    /// Create an exchange over a fresh framing session.
    pub fn new(transport: T) -> Self {
        Self::from_session(FrameSession::new(transport))
    }

    pub fn from_session(session: FrameSession<T>) -> Self {
        Self { session }
    }

    /// Send `command` and return the raw response, status trailer included.
    ///
    /// Transport and framing errors abort the exchange and are returned as is.
    pub fn exchange(&mut self, command: &ApduCommand) -> Result<Bytes> {
        let request = command.encode()?;

        self.session.reset();
        self.session.send(&request)?;

        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        self.session.receive_exact(&mut prefix)?;
        let len = u16::from_be_bytes(prefix) as usize;

        let mut response = BytesMut::zeroed(len);
        self.session.receive_exact(&mut response)?;
        debug!(
            ins = command.ins,
            request_len = request.len(),
            response_len = len,
            "APDU exchange complete"
        );
        Ok(response.freeze())
    }

    /// Borrow the framing session.
    pub fn session(&self) -> &FrameSession<T> {
        &self.session
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.session.get_ref()
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.session.get_mut()
    }

    /// Consume the exchange and return the transport.
    pub fn into_inner(self) -> T {
        self.session.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use ledgerwire_frame::FrameError;
    use ledgerwire_transport::{MemoryTransport, TransportError};

    use super::*;
    use crate::error::ApduError;
    use crate::testing::{framed, scripted, EchoDevice};

    #[test]
    fn echo_roundtrip() {
        let mut exchange = ApduExchange::new(EchoDevice::default());
        let cmd = ApduCommand::new(0xE0, 0x02, 0, 0, vec![0xDE, 0xAD, 0xBE, 0xEF]);

        let response = exchange.exchange(&cmd).unwrap();
        assert_eq!(response.as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF, 0x90, 0x00]);
        assert_eq!(
            exchange.get_ref().requests,
            vec![vec![0xE0, 0x02, 0, 0, 4, 0xDE, 0xAD, 0xBE, 0xEF]]
        );
    }

    #[test]
    fn multi_packet_request_and_response() {
        let mut exchange = ApduExchange::new(EchoDevice::default());
        let payload: Vec<u8> = (0..=254u8).collect();
        let cmd = ApduCommand::new(0xE0, 0x04, 0, 0, payload.clone());

        let response = exchange.exchange(&cmd).unwrap();
        assert_eq!(&response[..payload.len()], payload.as_slice());
        assert_eq!(&response[payload.len()..], &[0x90, 0x00]);
    }

    #[test]
    fn consecutive_exchanges_reset_sequence() {
        let mut exchange = ApduExchange::new(EchoDevice::default());
        for i in 0..5u8 {
            let cmd = ApduCommand::new(0xE0, 0x01, i, 0, vec![i; 100]);
            let response = exchange.exchange(&cmd).unwrap();
            assert_eq!(response.len(), 102);
        }
        assert_eq!(exchange.get_ref().requests.len(), 5);
    }

    #[test]
    fn oversized_payload_rejected_before_io() {
        let mut exchange = ApduExchange::new(MemoryTransport::new());
        let cmd = ApduCommand::new(0xE0, 0x04, 0, 0, vec![0u8; 256]);

        let err = exchange.exchange(&cmd).unwrap_err();
        assert!(matches!(err, ApduError::PayloadTooLarge { size: 256, .. }));
        assert!(exchange.get_ref().outbound().is_empty());
    }

    #[test]
    fn request_is_framed_on_the_wire() {
        let mut exchange = ApduExchange::new(scripted(&[0x90, 0x00]));
        let cmd = ApduCommand::new(0xE0, 0x02, 0x01, 0x00, vec![0, 0, 0, 0]);
        exchange.exchange(&cmd).unwrap();

        let reports = exchange.get_ref().outbound();
        assert_eq!(reports.len(), 1);
        assert_eq!(
            &reports[0][..16],
            &[0x01, 0x01, 0x05, 0x00, 0x00, 0x00, 0x09, 0xE0, 0x02, 0x01, 0x00, 0x04, 0, 0, 0, 0]
        );
    }

    #[test]
    fn empty_response() {
        let mut exchange = ApduExchange::new(scripted(&[]));
        let cmd = ApduCommand::new(0xE0, 0x01, 0, 0, Bytes::new());
        assert!(exchange.exchange(&cmd).unwrap().is_empty());
    }

    #[test]
    fn framing_errors_propagate_untouched() {
        let mut transport = MemoryTransport::new();
        let mut bad = framed(&[0x90, 0x00]);
        bad[0][2] = 0x06;
        transport.extend_inbound(bad);

        let mut exchange = ApduExchange::new(transport);
        let cmd = ApduCommand::new(0xE0, 0x01, 0, 0, Bytes::new());
        let err = exchange.exchange(&cmd).unwrap_err();
        assert!(matches!(
            err,
            ApduError::Frame(FrameError::CommandTagMismatch { found: 0x06 })
        ));
    }

    #[test]
    fn truncated_response_is_transport_error() {
        // Announces 100 bytes but only one packet arrives.
        let mut transport = MemoryTransport::new();
        transport.push_inbound(framed(&[0u8; 100]).remove(0));

        let mut exchange = ApduExchange::new(transport);
        let cmd = ApduCommand::new(0xE0, 0x01, 0, 0, Bytes::new());
        let err = exchange.exchange(&cmd).unwrap_err();
        assert!(matches!(
            err,
            ApduError::Frame(FrameError::Transport(TransportError::Closed))
        ));
    }
}

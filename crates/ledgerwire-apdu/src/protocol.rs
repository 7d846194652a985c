use bytes::Bytes;
use ledgerwire_transport::HidTransport;
use tracing::debug;

use crate::command::ApduCommand;
use crate::error::{ApduError, Result};
use crate::exchange::ApduExchange;
use crate::status::StatusWord;

/// Class byte used by the Minter app.
pub const DEFAULT_CLA: u8 = 0xE0;

/// Size of the status word trailer.
pub const STATUS_SIZE: usize = 2;

/// Device command dispatch with status interpretation.
#[derive(Debug)]
pub struct CommandProtocol<T> {
    exchange: ApduExchange<T>,
    cla: u8,
}

impl<T: HidTransport> CommandProtocol<T> {
    pub fn new(transport: T) -> Self {
        Self::with_class(ApduExchange::new(transport), DEFAULT_CLA)
    }

    pub fn with_class(exchange: ApduExchange<T>, cla: u8) -> Self {
        Self { exchange, cla }
    }

    /// Run one command and return the response body.
    ///
    /// The trailing status word is stripped. Anything but success becomes an
    /// error: [`ApduError::UserDenied`] and [`ApduError::InvalidParameter`]
    /// for the known refusals, [`ApduError::Device`] for the rest.
    pub fn invoke(&mut self, ins: u8, p1: u8, p2: u8, payload: &[u8]) -> Result<Bytes> {
        let command = ApduCommand::new(self.cla, ins, p1, p2, Bytes::copy_from_slice(payload));
        let mut body = self.exchange.exchange(&command)?;
        if body.len() < STATUS_SIZE {
            return Err(ApduError::MissingStatus);
        }

        let trailer = body.split_off(body.len() - STATUS_SIZE);
        let status = StatusWord::from_be_bytes([trailer[0], trailer[1]]);
        debug!(ins, %status, body_len = body.len(), "command complete");

        match status {
            StatusWord::Success => Ok(body),
            StatusWord::UserRejected => Err(ApduError::UserDenied),
            StatusWord::InvalidParameter => Err(ApduError::InvalidParameter),
            StatusWord::Other(code) => Err(ApduError::Device(code)),
        }
    }

    /// Class byte placed on every command.
    pub fn class(&self) -> u8 {
        self.cla
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.exchange.get_ref()
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.exchange.get_mut()
    }

    /// Consume the protocol and return the transport.
    pub fn into_inner(self) -> T {
        self.exchange.into_inner()
    }
}

use ledgerwire_apdu::CommandProtocol;
use ledgerwire_transport::HidTransport;
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{AppVersion, MinterAddress, MinterSignature};

/// Get app version. No payload, 3-byte response.
pub const INS_GET_VERSION: u8 = 0x01;

/// Get address. Payload: 4-byte LE derivation index.
pub const INS_GET_ADDRESS: u8 = 0x02;

/// Sign hash. Payload: 4-byte LE derivation index + 32-byte hash.
pub const INS_SIGN_HASH: u8 = 0x04;

/// P1 flag: answer without asking the user to confirm on the device.
pub const P1_SILENT: u8 = 1;

/// Handle to the Minter app on a connected device.
#[derive(Debug)]
pub struct MinterApp<T> {
    protocol: CommandProtocol<T>,
}

impl<T: HidTransport> MinterApp<T> {
    pub fn new(transport: T) -> Self {
        Self::from_protocol(CommandProtocol::new(transport))
    }

    pub fn from_protocol(protocol: CommandProtocol<T>) -> Self {
        Self { protocol }
    }

    /// Version of the installed app.
    pub fn version(&mut self) -> Result<AppVersion> {
        let body = self.protocol.invoke(INS_GET_VERSION, 0, 0, &[])?;
        AppVersion::from_response(&body)
    }

    /// Address for the key at `index`.
    ///
    /// With `silent` the device answers straight away; otherwise it shows the
    /// address and waits for the user.
    pub fn address(&mut self, index: u32, silent: bool) -> Result<MinterAddress> {
        debug!(index, silent, "requesting address");
        let body = self
            .protocol
            .invoke(INS_GET_ADDRESS, p1(silent), 0, &index.to_le_bytes())?;
        MinterAddress::from_response(&body)
    }

    /// Sign a 32-byte transaction hash with the key at `index`.
    pub fn sign_hash(
        &mut self,
        hash: &[u8; 32],
        index: u32,
        silent: bool,
    ) -> Result<MinterSignature> {
        let mut payload = [0u8; 36];
        payload[..4].copy_from_slice(&index.to_le_bytes());
        payload[4..].copy_from_slice(hash);

        if !silent {
            info!("confirm the signature on the device");
        }
        let body = self
            .protocol
            .invoke(INS_SIGN_HASH, p1(silent), 0, &payload)?;
        MinterSignature::try_from(body.as_ref())
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.protocol.get_ref()
    }

    /// Consume the app handle and return the transport.
    pub fn into_inner(self) -> T {
        self.protocol.into_inner()
    }
}

fn p1(silent: bool) -> u8 {
    if silent {
        P1_SILENT
    } else {
        0
    }
}

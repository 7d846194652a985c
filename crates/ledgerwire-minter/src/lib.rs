//! Minter Ledger app commands.
//!
//! Thin encoders and decoders around [`CommandProtocol::invoke`]: each
//! command fixes an instruction code and parses fixed-width fields from the
//! response body.
//!
//! [`CommandProtocol::invoke`]: ledgerwire_apdu::CommandProtocol::invoke

pub mod app;
pub mod error;
pub mod types;

pub use app::{MinterApp, INS_GET_ADDRESS, INS_GET_VERSION, INS_SIGN_HASH, P1_SILENT};
pub use error::{MinterError, Result};
pub use types::{AppVersion, MinterAddress, MinterSignature, ADDRESS_SIZE, SIGNATURE_SIZE};

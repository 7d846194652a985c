//! APDU exchange over HID framing.
//!
//! Two layers sit here:
//! - [`ApduExchange`]: one structured command in, one length-prefixed
//!   response out.
//! - [`CommandProtocol`]: fixed class byte, status trailer stripping and
//!   status word interpretation.

pub mod command;
pub mod error;
pub mod exchange;
pub mod protocol;
pub mod status;

pub use command::{ApduCommand, APDU_HEADER_SIZE, MAX_APDU_PAYLOAD};
pub use error::{ApduError, Result};
pub use exchange::ApduExchange;
pub use protocol::{CommandProtocol, DEFAULT_CLA, STATUS_SIZE};
pub use status::StatusWord;

#[cfg(test)]
mod testing;

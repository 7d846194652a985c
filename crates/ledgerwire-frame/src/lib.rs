//! HID packet framing for Ledger-class devices.
//!
//! A logical message is prefixed with its 2-byte big-endian length and split
//! across 64-byte packets. Every packet carries:
//! - a 2-byte channel id (`0x0101`)
//! - a 1-byte command tag (`0x05`)
//! - a 2-byte big-endian sequence number, starting at 0 per message
//! - up to 59 bytes of message data
//!
//! [`FrameSession`] writes whole messages and lets the caller pull received
//! bytes as it needs them.

pub mod error;
pub mod packet;
pub mod session;

pub use error::{FrameError, Result};
pub use packet::{
    encode_message, packetize, HidPacket, CHANNEL_ID, COMMAND_TAG, HEADER_SIZE,
    LENGTH_PREFIX_SIZE, MAX_MESSAGE_SIZE, PACKET_PAYLOAD_SIZE, PACKET_SIZE,
};
pub use session::FrameSession;

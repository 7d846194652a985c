//! Talk to the Minter app on a Ledger-class HID dongle.
//!
//! The wire protocol is two layers deep: 64-byte HID packets carrying a
//! length-prefixed message, and APDU commands carried in those messages.
//!
//! # Crate Structure
//!
//! - [`transport`] : Whole-report HID transport (`hidapi` behind `hid`)
//! - [`frame`] : Packet framing, sequence numbers and reassembly
//! - [`apdu`] : APDU exchange and status word interpretation
//! - [`minter`] : Minter app commands: version, address, sign-hash

/// Re-export transport types.
pub mod transport {
    pub use ledgerwire_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use ledgerwire_frame::*;
}

/// Re-export APDU types.
pub mod apdu {
    pub use ledgerwire_apdu::*;
}

/// Re-export Minter app types.
pub mod minter {
    pub use ledgerwire_minter::*;
}

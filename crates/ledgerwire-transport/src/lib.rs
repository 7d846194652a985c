//! Whole-report HID transport abstraction.
//!
//! A Ledger-class dongle only speaks in fixed 64-byte HID reports. This crate
//! is the lowest layer of ledgerwire: it moves single reports in and out of a
//! device and nothing more. Framing lives in `ledgerwire-frame`.
//!
//! - [`HidTransport`] is the seam every higher layer is generic over.
//! - [`MemoryTransport`] is a queue-backed transport for tests and simulators.
//! - [`HidDevice`] talks to real hardware through `hidapi` (behind `hid`).

pub mod error;
pub mod memory;
pub mod traits;

#[cfg(feature = "hid")]
pub mod hid;

pub use error::{Result, TransportError};
pub use memory::MemoryTransport;
pub use traits::{HidTransport, REPORT_SIZE};

#[cfg(feature = "hid")]
pub use hidapi::HidApi;

#[cfg(feature = "hid")]
pub use hid::{
    list_devices, open_first, HidConfig, HidDevice, DEFAULT_PRODUCT_IDS, LEDGER_VENDOR_ID,
    NANO_S_APP_PRODUCT_ID, NANO_S_PRODUCT_ID,
};

use std::time::Duration;

/// Errors that can occur moving reports to and from a device.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HID subsystem reported a failure.
    #[error("HID error: {0}")]
    Hid(String),

    /// An I/O error occurred on the device handle.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No report arrived within the configured read timeout.
    #[error("no report received within {0:?}")]
    Timeout(Duration),

    /// The device handle has nothing more to deliver.
    #[error("transport closed")]
    Closed,

    /// No device matched the requested vendor/product ids.
    #[error("no device found (vendor 0x{vendor_id:04x}, products {product_ids:04x?})")]
    NotFound { vendor_id: u16, product_ids: Vec<u16> },
}

pub type Result<T> = std::result::Result<T, TransportError>;

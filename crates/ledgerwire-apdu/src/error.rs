use ledgerwire_frame::FrameError;

/// Errors that can occur during an APDU exchange.
#[derive(Debug, thiserror::Error)]
pub enum ApduError {
    /// Framing or transport failure. The exchange is aborted.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The command payload does not fit its 1-byte length field.
    #[error("APDU payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The response is too short to carry a status word.
    #[error("APDU response missing status code")]
    MissingStatus,

    /// The user refused the operation on the device.
    #[error("user denied request")]
    UserDenied,

    /// The device rejected the request parameters.
    #[error("invalid request parameters")]
    InvalidParameter,

    /// Any other status word.
    #[error("device error code 0x{0:04x}")]
    Device(u16),
}

impl ApduError {
    /// True for outcomes the device reported itself, as opposed to faults in
    /// moving the exchange.
    pub fn is_device_outcome(&self) -> bool {
        matches!(
            self,
            ApduError::UserDenied | ApduError::InvalidParameter | ApduError::Device(_)
        )
    }

    /// Raw status word, if the device produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApduError::UserDenied => Some(crate::status::SW_USER_REJECTED),
            ApduError::InvalidParameter => Some(crate::status::SW_INVALID_PARAMETER),
            ApduError::Device(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApduError>;

//! Status words returned in the last two bytes of every response.

use std::fmt;

/// Command completed.
pub const SW_SUCCESS: u16 = 0x9000;

/// The user refused an operation that needed on-device confirmation.
pub const SW_USER_REJECTED: u16 = 0x6985;

/// The app rejected the request parameters.
pub const SW_INVALID_PARAMETER: u16 = 0x6b01;

/// Interpreted status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusWord {
    Success,
    UserRejected,
    InvalidParameter,
    Other(u16),
}

impl StatusWord {
    /// Parse from the big-endian trailer bytes.
    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self::from(u16::from_be_bytes(bytes))
    }

    pub fn code(self) -> u16 {
        u16::from(self)
    }
}

impl From<u16> for StatusWord {
    fn from(code: u16) -> Self {
        match code {
            SW_SUCCESS => StatusWord::Success,
            SW_USER_REJECTED => StatusWord::UserRejected,
            SW_INVALID_PARAMETER => StatusWord::InvalidParameter,
            other => StatusWord::Other(other),
        }
    }
}

impl From<StatusWord> for u16 {
    fn from(status: StatusWord) -> Self {
        match status {
            StatusWord::Success => SW_SUCCESS,
            StatusWord::UserRejected => SW_USER_REJECTED,
            StatusWord::InvalidParameter => SW_INVALID_PARAMETER,
            StatusWord::Other(code) => code,
        }
    }
}

impl fmt::Display for StatusWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusWord::Success => write!(f, "success (0x{SW_SUCCESS:04x})"),
            StatusWord::UserRejected => write!(f, "user rejected (0x{SW_USER_REJECTED:04x})"),
            StatusWord::InvalidParameter => {
                write!(f, "invalid parameter (0x{SW_INVALID_PARAMETER:04x})")
            }
            StatusWord::Other(code) => write!(f, "0x{code:04x}"),
        }
    }
}

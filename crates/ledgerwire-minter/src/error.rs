use ledgerwire_apdu::ApduError;

/// Errors returned by Minter app commands.
#[derive(Debug, thiserror::Error)]
pub enum MinterError {
    /// The exchange failed or the device refused the command.
    #[error(transparent)]
    Apdu(#[from] ApduError),

    /// The response body does not have the expected shape.
    #[error("malformed {what} response: expected {expected} bytes, got {actual}")]
    MalformedResponse {
        what: &'static str,
        expected: &'static str,
        actual: usize,
    },

    /// A textual address could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

pub type Result<T> = std::result::Result<T, MinterError>;

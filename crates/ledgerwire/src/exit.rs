use std::fmt;
use std::io;

use ledgerwire_apdu::ApduError;
use ledgerwire_frame::FrameError;
use ledgerwire_minter::MinterError;
use ledgerwire_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const USER_DECLINED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::Timeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        TransportError::NotFound { .. } => CliError::new(
            FAILURE,
            format!("{context}: {err} or Minter app isn't running"),
        ),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::MessageTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn apdu_error(context: &str, err: ApduError) -> CliError {
    match err {
        ApduError::Frame(err) => frame_error(context, err),
        ApduError::UserDenied => CliError::new(USER_DECLINED, format!("{context}: {err}")),
        ApduError::InvalidParameter | ApduError::MissingStatus => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ApduError::Device(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn minter_error(context: &str, err: MinterError) -> CliError {
    match err {
        MinterError::Apdu(err) => apdu_error(context, err),
        MinterError::MalformedResponse { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        MinterError::InvalidAddress(_) | MinterError::InvalidHex(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

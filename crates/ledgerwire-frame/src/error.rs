use ledgerwire_transport::TransportError;

/// Errors that can occur while framing or reassembling a message.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The transport failed to move a report.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A read returned something other than one whole report.
    #[error("transport contract violated: read {len} bytes, expected 64")]
    TransportContract { len: usize },

    /// A write moved fewer bytes than a whole report.
    #[error("short write: {written} of 64 bytes")]
    ShortWrite { written: usize },

    /// A buffer handed to the packet parser is not one report long.
    #[error("invalid packet size {len} (expected 64)")]
    InvalidPacketSize { len: usize },

    /// The packet belongs to another channel.
    #[error("bad channel id 0x{found:04x} (expected 0x0101)")]
    ChannelMismatch { found: u16 },

    /// The packet carries another command tag.
    #[error("bad command tag 0x{found:02x} (expected 0x05)")]
    CommandTagMismatch { found: u8 },

    /// A packet was lost, repeated, or reordered.
    #[error("bad sequence number {found} (expected {expected})")]
    SequenceMismatch { expected: u16, found: u16 },

    /// The message does not fit the 2-byte length prefix.
    #[error("message too large ({size} bytes, max {max})")]
    MessageTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while building, slicing or transporting frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer does not start with the MAVLink v2 magic byte.
    #[error("invalid frame magic (expected 0xFD, got {0:#04x})")]
    InvalidMagic(u8),

    /// The payload exceeds what the one-byte length field can carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The message id does not fit in 24 bits.
    #[error("message id {0} does not fit in 24 bits")]
    InvalidMessageId(u32),

    /// The buffer length disagrees with the declared payload length.
    #[error("frame length mismatch (declared {declared} bytes, got {actual})")]
    LengthMismatch { declared: usize, actual: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

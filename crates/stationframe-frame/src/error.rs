/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The configured length field width cannot be read as an integer.
    #[error("unsupported length field width: {0} (expected: 1, 2, 4, or 8)")]
    UnsupportedLengthWidth(usize),

    /// The declared frame length cannot even cover the header region.
    #[error("invalid frame length: {length} (expected >= {min})")]
    InvalidFrameLength { length: i64, min: usize },

    /// A header field lies beyond the range a layout may describe.
    #[error("{field} field at offset {offset} is out of range (header max {max} bytes)")]
    LayoutOutOfRange {
        field: &'static str,
        offset: usize,
        max: usize,
    },

    /// The configured magic header is empty, so frames cannot be located.
    #[error("frame magic header must not be empty")]
    EmptyMagic,

    /// The frame does not fit into the configured length field.
    #[error("frame too large ({size} bytes, max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// Buffered undecoded bytes exceed the reader limit.
    #[error("pending buffer overflow ({size} bytes, max {max})")]
    BufferOverflow { size: usize, max: usize },

    /// An I/O error occurred while reading frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before another complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Errors that can occur while reading or encoding WorldData frames.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// An I/O error occurred while reading from the byte source.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source reached end-of-stream.
    #[error("byte source exhausted")]
    SourceExhausted,

    /// The payload does not fit in a frame of the maximum packet length.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The payload would produce a frame shorter than the minimum packet length.
    #[error("payload too short ({size} bytes, min {min})")]
    PayloadTooShort { size: usize, min: usize },

    /// The scanner configuration is inconsistent.
    #[error("invalid scanner config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;

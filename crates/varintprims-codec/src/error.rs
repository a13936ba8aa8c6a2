/// Errors that can occur while decoding varints.
#[derive(Debug, thiserror::Error)]
pub enum VarintError {
    /// The buffer ended before a terminating byte (continuation bit clear).
    #[error("truncated varint at offset {offset}")]
    TruncatedInput { offset: usize },

    /// The varint claims more than 10 groups or bits beyond the 64-bit range.
    #[error("varint at offset {offset} overflows 64 bits")]
    Overflow { offset: usize },

    /// The stream held more values than the configured limit.
    #[error("too many values in stream (max {max})")]
    TooManyValues { max: usize },

    /// An I/O error occurred while reading or writing varints.
    #[error("varint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VarintError>;

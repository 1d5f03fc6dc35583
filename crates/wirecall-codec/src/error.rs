/// Errors raised while encoding or decoding Wire Values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Fewer unread bytes remain than the requested value needs.
    #[error("buffer underflow: need {needed} bytes, {remaining} remaining")]
    Underflow { needed: usize, remaining: usize },

    /// A string or sequence does not fit the 2-byte length prefix.
    #[error("sequence too long for a u16 length prefix ({len}, max {max})")]
    LengthOverflow { len: usize, max: usize },

    /// A decoded string payload is not valid UTF-8.
    #[error("string payload is not valid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A decoded bool byte is neither 0 nor 1.
    #[error("invalid bool byte 0x{0:02x}")]
    InvalidBool(u8),

    /// A decoded char is not a Unicode scalar value.
    #[error("invalid char scalar 0x{0:08x}")]
    InvalidChar(u32),
}

pub type Result<T> = std::result::Result<T, CodecError>;

use std::fmt;

/// Envelope status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    /// No handler is registered under the requested name.
    FunctionNotRegistered = 1,
    /// No reply arrived before the client's receive timeout. Never sent by
    /// a server: the client synthesizes it locally.
    RecvTimeout = 2,
}

impl Status {
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Map a wire code back to a known status.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::FunctionNotRegistered),
            2 => Some(Self::RecvTimeout),
            _ => None,
        }
    }

    /// Short, stable name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::FunctionNotRegistered => "function_not_registered",
            Self::RecvTimeout => "recv_timeout",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

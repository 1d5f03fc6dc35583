use bytes::Bytes;
use wirecall_codec::{Codec, CodecError, Decode, Encode};

use crate::error::RpcError;
use crate::status::Status;

/// Message carried by every successful response.
pub const SUCCESS_MESSAGE: &str = "success";

/// Message carried by a client-synthesized timeout.
pub const RECV_TIMEOUT_MESSAGE: &str = "recv timeout";

/// Result of one remote call.
///
/// Wire layout: `[status: i32][message: string][value]`, where the value is
/// present only when the status is success.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    code: i32,
    message: String,
    value: Option<T>,
}

impl<T> Response<T> {
    pub fn success(value: T) -> Self {
        Self {
            code: Status::Success.code(),
            message: SUCCESS_MESSAGE.to_string(),
            value: Some(value),
        }
    }

    /// A response carrying no value.
    ///
    /// `status` should not be [`Status::Success`]; a success without a value
    /// has no wire form the peer could decode.
    pub fn failure(status: Status, message: impl Into<String>) -> Self {
        Self {
            code: status.code(),
            message: message.into(),
            value: None,
        }
    }

    pub fn not_registered(name: &str) -> Self {
        Self::failure(
            Status::FunctionNotRegistered,
            format!("function not bind: {name}"),
        )
    }

    pub fn timeout() -> Self {
        Self::failure(Status::RecvTimeout, RECV_TIMEOUT_MESSAGE)
    }

    /// Raw status code as carried on the wire.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// The status, if the code is one this crate knows.
    pub fn status(&self) -> Option<Status> {
        Status::from_code(self.code)
    }

    pub fn is_success(&self) -> bool {
        self.code == Status::Success.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// The value on success, otherwise [`RpcError::Remote`].
    pub fn into_result(self) -> Result<T, RpcError> {
        match self.value {
            Some(value) if self.code == Status::Success.code() => Ok(value),
            _ => Err(RpcError::Remote {
                status: self.code,
                message: self.message,
            }),
        }
    }
}

impl<T: Encode> Response<T> {
    /// Serialize into a standalone message.
    pub fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut codec = Codec::new();
        codec.encode(self)?;
        Ok(codec.into_bytes())
    }
}

impl<T: Decode> Response<T> {
    /// Decode a message produced by [`Response::to_bytes`].
    pub fn from_bytes(raw: &[u8]) -> Result<Self, CodecError> {
        Codec::from_slice(raw).decode()
    }
}

impl<T: Encode> Encode for Response<T> {
    fn encode(&self, codec: &mut Codec) -> wirecall_codec::Result<()> {
        codec.encode(&self.code)?.encode(self.message.as_str())?;
        if self.is_success() {
            if let Some(value) = &self.value {
                codec.encode(value)?;
            }
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Response<T> {
    fn decode(codec: &mut Codec) -> wirecall_codec::Result<Self> {
        let code: i32 = codec.decode()?;
        let message: String = codec.decode()?;
        let value = if code == Status::Success.code() {
            Some(codec.decode()?)
        } else {
            None
        };
        Ok(Self {
            code,
            message,
            value,
        })
    }
}

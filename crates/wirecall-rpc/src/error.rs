use wirecall_codec::CodecError;
use wirecall_frame::FrameError;
use wirecall_transport::TransportError;

/// Local faults of a call session.
///
/// Outcomes the remote side reports (unknown function, timeout) travel in
/// the response envelope instead; [`Response::into_result`] turns those
/// into [`RpcError::Remote`] when an `Err` is more convenient.
///
/// [`Response::into_result`]: crate::Response::into_result
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Connecting, binding or accepting failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Framing or socket I/O failed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A call frame or response could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The peer went away.
    #[error("peer disconnected: {0}")]
    Disconnected(String),

    /// A handler is already registered under this name.
    #[error("function already registered: {0}")]
    DuplicateHandler(String),

    /// An earlier call timed out or failed after it was sent, so the next
    /// reply on this session may belong to that call.
    #[error("session desynchronized by an earlier call; reconnect")]
    Desynchronized,

    /// The remote side answered with a non-success status.
    #[error("remote call failed with status {status}: {message}")]
    Remote { status: i32, message: String },
}

pub type Result<T> = std::result::Result<T, RpcError>;

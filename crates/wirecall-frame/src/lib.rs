//! Length-prefixed message framing for wirecall stream transports.
//!
//! TCP and Unix stream sockets do not preserve message boundaries, so every
//! request and reply travels inside a frame:
//! - a 2-byte magic number ("WC") for stream synchronization
//! - a 4-byte big-endian payload length
//!
//! Readers buffer partial input internally and only ever hand out complete
//! payloads.

pub mod codec;
pub mod connection;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use codec::{decode_frame, encode_frame, FrameConfig, DEFAULT_MAX_PAYLOAD, HEADER_SIZE, MAGIC};
pub use connection::FramedConnection;
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::WireFrameCodec;

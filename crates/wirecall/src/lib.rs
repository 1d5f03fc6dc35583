//! Typed remote procedure calls over a compact big-endian wire format.
//!
//! A client names a function and passes a statically typed argument tuple;
//! the server rebuilds the tuple, calls the registered Rust function, and
//! answers with a status, a message and the typed return value.
//!
//! ```no_run
//! use wirecall::{Registry, Server};
//! use wirecall::transport::TcpTransport;
//!
//! let mut registry = Registry::new();
//! registry.register("add", |a: i32, b: i32| a + b)?;
//!
//! let listener = TcpTransport::bind("127.0.0.1:5555")?;
//! Server::new(registry).serve_tcp(&listener)?;
//! # Ok::<(), wirecall::RpcError>(())
//! ```
//!
//! # Crate Structure
//!
//! - [`transport`]: TCP, Unix domain socket and in-process transports
//! - [`frame`]: length-prefixed framing for stream transports
//! - [`codec`]: type-directed binary codec and argument packing
//! - [`rpc`]: registry, response envelope, client and server sessions

/// Re-export transport types.
pub mod transport {
    pub use wirecall_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use wirecall_frame::*;
}

/// Re-export codec types.
pub mod codec {
    pub use wirecall_codec::*;
}

/// Re-export call session types.
pub mod rpc {
    pub use wirecall_rpc::*;
}

pub use wirecall_codec::{wire_struct, Codec, CodecError, Decode, Encode};
pub use wirecall_rpc::{
    connect_tcp, Client, ClientConfig, Registry, Response, RpcError, Server, ServerConfig, Status,
};

#[cfg(unix)]
pub use wirecall_rpc::connect_unix;

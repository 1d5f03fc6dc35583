//! Transports underneath the wirecall call protocol.
//!
//! Two families are provided:
//! - byte streams ([`Stream`]) over TCP or Unix domain sockets, which need
//!   the framing layer on top to recover message boundaries;
//! - an in-process message queue ([`MemoryChannel`]) that already delivers
//!   whole messages.
//!
//! Nothing here knows about function names or argument encoding.

pub mod error;
pub mod memory;
pub mod stream;
pub mod tcp;

#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
pub use memory::MemoryChannel;
pub use stream::Stream;
pub use tcp::TcpTransport;

#[cfg(unix)]
pub use uds::UnixDomainSocket;

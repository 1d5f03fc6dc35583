//! Call sessions for wirecall.
//!
//! A call is one request/reply exchange:
//!
//! ```text
//! client                                   server
//!   [name][arg 0][arg 1]...   ──────────▶  Registry::dispatch(name, args)
//!   [status][message][value]  ◀──────────  Response envelope
//! ```
//!
//! The server looks the name up in its [`Registry`], rebuilds the handler's
//! typed argument tuple from the raw bytes, calls it, and wraps the return
//! value in a [`Response`]. An unknown name comes back as a
//! [`Status::FunctionNotRegistered`] envelope; a reply that does not arrive
//! in time is reported by the client as [`Status::RecvTimeout`].

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod registry;
pub mod server;
pub mod status;
pub mod transport;

pub use client::{connect_tcp, Client};
#[cfg(unix)]
pub use client::connect_unix;
pub use config::{ClientConfig, ServerConfig};
pub use envelope::{Response, RECV_TIMEOUT_MESSAGE, SUCCESS_MESSAGE};
pub use error::{Result, RpcError};
pub use registry::{Handler, Invoke, Method, Registry};
pub use server::Server;
pub use status::Status;
pub use transport::{Received, Transport};

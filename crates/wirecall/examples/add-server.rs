//! Serves `add(i32, i32) -> i32` over TCP.
//!
//! Run with:
//!   cargo run --example add-server
//!
//! In another terminal:
//!   cargo run --example add-client

use wirecall::transport::TcpTransport;
use wirecall::{Registry, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5555".to_string());

    let mut registry = Registry::new();
    registry.register("add", |a: i32, b: i32| a.wrapping_add(b))?;

    let listener = TcpTransport::bind(&addr)?;
    eprintln!("Listening on {}", listener.local_addr());

    Server::new(registry).serve_tcp(&listener)?;
    Ok(())
}

//! Calls the `add-server` example: one unregistered function, then `add`.
//!
//! Run with:
//!   cargo run --example add-client

use std::time::Duration;

use wirecall::{connect_tcp, ClientConfig, Response};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:5555".to_string());
    let config = ClientConfig::default().with_recv_timeout(Duration::from_secs(5));
    let mut client = connect_tcp(&addr, config)?;

    // Not registered by add-server: comes back as a status, not an Err.
    let strcat: Response<String> = client.call("Strcat", &("even", 24i32))?;
    println!(
        "Strcat: status={} message={:?} value={:?}",
        strcat.code(),
        strcat.message(),
        strcat.value()
    );

    let add: Response<i32> = client.call("add", &(3i32, 2i32))?;
    println!(
        "add: status={} message={:?} result={:?}",
        add.code(),
        add.message(),
        add.value()
    );
    Ok(())
}

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use wirecall_frame::FrameConfig;
use wirecall_rpc::{Registry, Server, ServerConfig};
use wirecall_transport::TcpTransport;

use crate::cmd::{parse_duration, Endpoint, ServeArgs};
use crate::exit::{rpc_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_listening, OutputFormat};

/// Shared receiver behind `counter.*`.
#[derive(Debug, Default)]
pub struct Counter {
    total: AtomicI64,
}

impl Counter {
    pub fn incr(&self, by: i64) -> i64 {
        self.total.fetch_add(by, Ordering::SeqCst) + by
    }

    pub fn get(&self) -> i64 {
        self.total.load(Ordering::SeqCst)
    }
}

pub fn demo_registry(counter: Arc<Counter>) -> wirecall_rpc::Result<Registry> {
    let mut registry = Registry::new();
    registry.register("add", |a: i32, b: i32| a.wrapping_add(b))?;
    registry.register("concat", |a: String, b: String| a + &b)?;
    registry.register("echo", |s: String| s)?;
    registry.register("ping", || ())?;
    registry.register("sum", |xs: Vec<i64>| {
        xs.iter().fold(0i64, |acc, x| acc.wrapping_add(*x))
    })?;
    registry.register_method("counter.incr", Arc::clone(&counter), Counter::incr)?;
    registry.register_method("counter.get", counter, Counter::get)?;
    Ok(registry)
}

pub fn run(args: ServeArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = Endpoint::parse(&args.addr)?;

    let mut frame = FrameConfig::default();
    if let Some(idle) = &args.idle_timeout {
        frame.read_timeout = Some(parse_duration(idle)?);
    }
    if let Some(max) = args.max_payload {
        frame.max_payload_size = max;
    }

    let registry = demo_registry(Arc::new(Counter::default()))
        .map_err(|err| rpc_error("registry setup failed", err))?;
    let functions: Vec<String> = registry.names().map(str::to_string).collect();
    let server = Server::with_config(registry, ServerConfig { frame });

    match endpoint {
        Endpoint::Tcp(addr) => {
            let listener =
                TcpTransport::bind(&addr).map_err(|err| transport_error("bind failed", err))?;
            install_ctrlc_handler(None)?;
            announce(&listener.local_addr().to_string(), &functions, format);
            server
                .serve_tcp(&listener)
                .map_err(|err| rpc_error("serve failed", err))?;
        }
        #[cfg(unix)]
        Endpoint::Unix(path) => {
            let listener = wirecall_transport::UnixDomainSocket::bind(&path)
                .map_err(|err| transport_error("bind failed", err))?;
            install_ctrlc_handler(Some(path.clone()))?;
            announce(&format!("unix:{}", path.display()), &functions, format);
            server
                .serve_unix(&listener)
                .map_err(|err| rpc_error("serve failed", err))?;
        }
        #[cfg(not(unix))]
        Endpoint::Unix(_) => {
            return Err(CliError::usage(
                "unix domain sockets are not supported on this platform",
            ))
        }
    }

    Ok(SUCCESS)
}

fn announce(endpoint: &str, functions: &[String], format: OutputFormat) {
    let names: Vec<&str> = functions.iter().map(String::as_str).collect();
    print_listening(endpoint, &names, format);
}

/// The accept loop blocks, so Ctrl-C exits from the handler after removing
/// the socket file, if any.
fn install_ctrlc_handler(socket: Option<PathBuf>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        tracing::info!("interrupted, shutting down");
        if let Some(path) = &socket {
            let _ = std::fs::remove_file(path);
        }
        std::process::exit(SUCCESS);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

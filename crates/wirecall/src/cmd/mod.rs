use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult};
use crate::output::OutputFormat;

pub mod call;
pub mod serve;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the built-in demo functions.
    Serve(ServeArgs),
    /// Call a remote function once and print the response.
    Call(CallArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Serve(args) => serve::run(args, format),
        Command::Call(args) => call::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on: HOST:PORT, or unix:PATH.
    #[arg(default_value = "127.0.0.1:5555")]
    pub addr: String,
    /// Close connections idle for this long (e.g. 30s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub idle_timeout: Option<String>,
    /// Largest accepted request, in bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Server address: HOST:PORT, or unix:PATH.
    pub addr: String,
    /// Function name.
    pub name: String,
    /// Positional argument as TYPE:VALUE (e.g. i32:3, str:hi, vec<i64>:1,2,3). Repeatable.
    #[arg(long = "arg", short = 'a', value_name = "TYPE:VALUE")]
    pub args: Vec<String>,
    /// Expected return type.
    #[arg(long, short = 'r', value_name = "TYPE", default_value = "unit")]
    pub returns: String,
    /// Give up waiting for the reply after this long (e.g. 5s, 500ms).
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Where to listen or connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Tcp(String),
    Unix(PathBuf),
}

impl Endpoint {
    pub fn parse(input: &str) -> CliResult<Self> {
        match input.strip_prefix("unix:") {
            Some("") => Err(CliError::usage("unix: endpoint needs a socket path")),
            Some(path) if cfg!(unix) => Ok(Self::Unix(PathBuf::from(path))),
            Some(_) => Err(CliError::usage(
                "unix domain sockets are not supported on this platform",
            )),
            None => Ok(Self::Tcp(input.to_string())),
        }
    }
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::usage("duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::usage(format!("invalid duration value: {input}")))?;

    // Sockets reject a zero timeout.
    if value == 0 {
        return Err(CliError::usage("duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0ms").is_err());
        assert!(parse_duration("").is_err());
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn endpoint_forms() {
        assert_eq!(
            Endpoint::parse("127.0.0.1:5555").unwrap(),
            Endpoint::Tcp("127.0.0.1:5555".to_string())
        );
        assert!(Endpoint::parse("unix:").is_err());
        #[cfg(unix)]
        assert_eq!(
            Endpoint::parse("unix:/tmp/w.sock").unwrap(),
            Endpoint::Unix(PathBuf::from("/tmp/w.sock"))
        );
    }
}

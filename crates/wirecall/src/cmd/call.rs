use std::time::Instant;

use wirecall_frame::FramedConnection;
use wirecall_rpc::{connect_tcp, Client, ClientConfig, Response};

use crate::cmd::{parse_duration, CallArgs, Endpoint};
use crate::exit::{codec_error, rpc_error, status_exit_code, CliError, CliResult};
use crate::output::{print_call, CallOutput, OutputFormat};
use crate::value::{ArgValue, RawValue, WireType};

pub fn run(args: CallArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint = Endpoint::parse(&args.addr)?;
    let returns: WireType = args.returns.parse().map_err(CliError::usage)?;
    let call_args = parse_args(&args.args)?;
    let recv_timeout = args.timeout.as_deref().map(parse_duration).transpose()?;

    let config = ClientConfig {
        recv_timeout,
        ..ClientConfig::default()
    };
    let mut client = connect(&endpoint, config)?;

    let start = Instant::now();
    let response: Response<RawValue> = client
        .call(&args.name, call_args.as_slice())
        .map_err(|err| rpc_error("call failed", err))?;
    let elapsed_ms = start.elapsed().as_millis();

    let value = match response.value() {
        Some(raw) => {
            let (value, trailing) = raw
                .read_as(&returns)
                .map_err(|err| codec_error(&format!("reading result as {returns}"), err))?;
            if trailing > 0 {
                tracing::warn!(trailing, returns = %returns, "result has bytes left over");
            }
            Some(value)
        }
        None => None,
    };

    print_call(
        &CallOutput {
            function: &args.name,
            status: response.code(),
            status_name: CallOutput::status_name(response.code()),
            message: response.message(),
            value: value.as_ref(),
            elapsed_ms,
        },
        format,
    );

    Ok(status_exit_code(response.code()))
}

fn parse_args(raw: &[String]) -> CliResult<Vec<ArgValue>> {
    raw.iter()
        .map(|arg| {
            arg.parse()
                .map_err(|err| CliError::usage(format!("--arg {arg}: {err}")))
        })
        .collect()
}

fn connect(endpoint: &Endpoint, config: ClientConfig) -> CliResult<Client<FramedConnection>> {
    let client = match endpoint {
        Endpoint::Tcp(addr) => connect_tcp(addr, config),
        #[cfg(unix)]
        Endpoint::Unix(path) => wirecall_rpc::connect_unix(path, config),
        #[cfg(not(unix))]
        Endpoint::Unix(_) => {
            return Err(CliError::usage(
                "unix domain sockets are not supported on this platform",
            ))
        }
    };
    client.map_err(|err| rpc_error("connect failed", err))
}

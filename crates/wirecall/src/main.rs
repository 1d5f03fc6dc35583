mod cmd;
mod exit;
mod logging;
mod output;
mod value;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wirecall", version, about = "Typed remote procedure call CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_call_with_repeated_args() {
        let cli = Cli::try_parse_from([
            "wirecall",
            "call",
            "127.0.0.1:5555",
            "add",
            "--arg",
            "i32:3",
            "-a",
            "i32:2",
            "--returns",
            "i32",
            "--timeout",
            "2s",
        ])
        .expect("call args should parse");

        match cli.command {
            Command::Call(args) => {
                assert_eq!(args.name, "add");
                assert_eq!(args.args, vec!["i32:3", "i32:2"]);
                assert_eq!(args.returns, "i32");
                assert_eq!(args.timeout.as_deref(), Some("2s"));
            }
            other => panic!("expected call, got {other:?}"),
        }
    }

    #[test]
    fn serve_defaults_to_local_port() {
        let cli = Cli::try_parse_from(["wirecall", "serve"]).expect("serve should parse");
        match cli.command {
            Command::Serve(args) => assert_eq!(args.addr, "127.0.0.1:5555"),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn call_requires_a_function_name() {
        let err = Cli::try_parse_from(["wirecall", "call", "127.0.0.1:5555"])
            .expect_err("missing name should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["wirecall", "version", "--format", "json", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Version(ref v) if v.extended));
    }
}

use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use wirecall_rpc::Status;

use crate::value::ArgValue;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// What a `call` produced, ready for printing.
#[derive(Debug, Serialize)]
pub struct CallOutput<'a> {
    pub function: &'a str,
    pub status: i32,
    pub status_name: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a ArgValue>,
    pub elapsed_ms: u128,
}

impl CallOutput<'_> {
    pub fn status_name(code: i32) -> &'static str {
        Status::from_code(code).map_or("unknown", Status::name)
    }
}

pub fn print_call(out: &CallOutput<'_>, format: OutputFormat) {
    let value = out
        .value
        .map(ToString::to_string)
        .unwrap_or_else(|| "-".to_string());

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FUNCTION", "STATUS", "MESSAGE", "VALUE", "ELAPSED"])
                .add_row(vec![
                    out.function.to_string(),
                    format!("{} ({})", out.status_name, out.status),
                    out.message.to_string(),
                    value,
                    format!("{}ms", out.elapsed_ms),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "function={} status={} ({}) message={:?} value={} elapsed={}ms",
                out.function, out.status, out.status_name, out.message, value, out.elapsed_ms
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct ListeningOutput<'a> {
    event: &'static str,
    endpoint: &'a str,
    functions: &'a [&'a str],
}

/// Announce a bound listener on stdout so scripts can pick up the address.
pub fn print_listening(endpoint: &str, functions: &[&str], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = ListeningOutput {
                event: "listening",
                endpoint,
                functions,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ENDPOINT", "FUNCTIONS"])
                .add_row(vec![endpoint.to_string(), functions.join("\n")]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("listening on {endpoint} ({})", functions.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_output_json_omits_missing_value() {
        let out = CallOutput {
            function: "Strcat",
            status: 1,
            status_name: CallOutput::status_name(1),
            message: "function not bind: Strcat",
            value: None,
            elapsed_ms: 3,
        };
        let json: serde_json::Value = serde_json::to_value(&out).expect("output should serialize");
        assert_eq!(json["status"], 1);
        assert_eq!(json["status_name"], "function_not_registered");
        assert!(json.get("value").is_none());
    }

    #[test]
    fn call_output_json_includes_value() {
        let value = ArgValue::I32(5);
        let out = CallOutput {
            function: "add",
            status: 0,
            status_name: CallOutput::status_name(0),
            message: "success",
            value: Some(&value),
            elapsed_ms: 1,
        };
        let json: serde_json::Value = serde_json::to_value(&out).expect("output should serialize");
        assert_eq!(json["value"], 5);
    }
}

mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mavcodec", version, about = "MAVLink v2 codec CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
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
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from([
            "mavcodec",
            "decode",
            "--catalog",
            "common.json",
            "--hex",
            "capture.txt",
        ])
        .expect("decode args should parse");

        match cli.command {
            Command::Decode(args) => {
                assert!(args.hex);
                assert_eq!(args.input.as_deref(), Some(Path::new("capture.txt")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_conflicting_field_sources() {
        let err = Cli::try_parse_from([
            "mavcodec",
            "encode",
            "--catalog",
            "common.json",
            "HEARTBEAT",
            "--fields",
            "{}",
            "--fields-file",
            "fields.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_encode_metadata() {
        let cli = Cli::try_parse_from([
            "mavcodec",
            "--format",
            "raw",
            "encode",
            "--catalog",
            "common.json",
            "0",
            "--system-id",
            "7",
            "--sequence",
            "255",
        ])
        .expect("encode args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Raw));
        match cli.command {
            Command::Encode(args) => {
                assert_eq!(args.message, "0");
                assert_eq!(args.system_id, 7);
                assert_eq!(args.component_id, 1);
                assert_eq!(args.sequence, 255);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_sequence() {
        let err = Cli::try_parse_from([
            "mavcodec",
            "encode",
            "--catalog",
            "common.json",
            "0",
            "--sequence",
            "256",
        ])
        .expect_err("sequence above 255 should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}

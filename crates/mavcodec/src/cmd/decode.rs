use std::fs;
use std::io::Read;
use std::sync::Arc;

use mavcodec_frame::ScannerConfig;
use mavcodec_message::{MessageStatus, StreamDecoder};
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{io_error, CliError, CliResult, DATA_INVALID, INTEGRITY_FAILED, SUCCESS, USAGE};
use crate::output::{parse_hex, print_messages, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = Arc::new(args.source.load()?);
    let input = read_input(&args)?;

    let mut config = ScannerConfig::default();
    if let Some(limit) = args.resync_limit {
        if limit == 0 {
            return Err(CliError::new(USAGE, "--resync-limit must be greater than zero"));
        }
        config.resync_limit = limit;
    }

    let mut decoder = StreamDecoder::with_config(catalog, config);
    let messages = decoder.feed(&input);
    print_messages(&messages, format);

    let stats = decoder.stats();
    info!(
        frames = stats.frames,
        discarded_bytes = stats.discarded_bytes,
        resyncs = stats.resyncs,
        trailing_bytes = decoder.buffered(),
        "decode finished"
    );

    let failed = messages.iter().any(|m| {
        matches!(
            m.status,
            MessageStatus::ChecksumMismatch { .. } | MessageStatus::DecodeFailed(_)
        )
    });
    Ok(if failed { INTEGRITY_FAILED } else { SUCCESS })
}

fn read_input(args: &DecodeArgs) -> CliResult<Vec<u8>> {
    let bytes = match &args.input {
        Some(path) => fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            buf
        }
    };

    if !args.hex {
        return Ok(bytes);
    }
    let text = String::from_utf8(bytes)
        .map_err(|_| CliError::new(DATA_INVALID, "hex input is not valid UTF-8"))?;
    parse_hex(&text).map_err(|err| CliError::new(DATA_INVALID, format!("invalid hex input: {err}")))
}

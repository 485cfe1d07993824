use std::fs;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mavcodec_frame::FrameMeta;
use mavcodec_message::{encode_message, Fields, MessageKey};
use serde::Serialize;

use crate::cmd::EncodeArgs;
use crate::exit::{io_error, message_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_raw, to_hex, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput<'a> {
    id: u32,
    name: &'a str,
    sequence: u8,
    size: usize,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = args.source.load()?;
    let fields = resolve_fields(&args)?;
    let key = MessageKey::parse(&args.message);
    let meta = FrameMeta::new(args.system_id, args.component_id).with_sequence(args.sequence);

    let frame =
        encode_message(&catalog, key, &fields, &meta).map_err(|err| message_error("encode failed", err))?;
    let name = catalog
        .message(frame.message_id())
        .map(|def| def.name.as_str())
        .unwrap_or_default();

    match format {
        OutputFormat::Raw => print_raw(frame.as_bytes()),
        OutputFormat::Pretty => println!("{}", to_hex(frame.as_bytes())),
        OutputFormat::Json => {
            let out = EncodeOutput {
                id: frame.message_id(),
                name,
                sequence: frame.sequence(),
                size: frame.wire_size(),
                frame: to_hex(frame.as_bytes()),
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
                .set_header(vec!["ID", "NAME", "SEQ", "SIZE", "FRAME"])
                .add_row(vec![
                    frame.message_id().to_string(),
                    name.to_string(),
                    frame.sequence().to_string(),
                    frame.wire_size().to_string(),
                    to_hex(frame.as_bytes()),
                ]);
            println!("{table}");
        }
    }

    Ok(SUCCESS)
}

fn resolve_fields(args: &EncodeArgs) -> CliResult<Fields> {
    let json = match (&args.fields, &args.fields_file) {
        (Some(json), _) => json.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        (None, None) => return Ok(Fields::new()),
    };
    serde_json::from_str(&json)
        .map_err(|err| CliError::new(USAGE, format!("field values are not a valid JSON object: {err}")))
}

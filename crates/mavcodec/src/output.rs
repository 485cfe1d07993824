use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mavcodec_message::{DecodedMessage, Fields, MessageBody, MessageStatus};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
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

#[derive(Serialize)]
struct MessageOutput<'a> {
    id: u32,
    name: Option<&'a str>,
    sequence: u8,
    system_id: u8,
    component_id: u8,
    incompat_flags: u8,
    compat_flags: u8,
    status: String,
    checksum_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a Fields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<String>,
}

impl<'a> From<&'a DecodedMessage> for MessageOutput<'a> {
    fn from(msg: &'a DecodedMessage) -> Self {
        Self {
            id: msg.message_id,
            name: msg.name.as_deref(),
            sequence: msg.sequence,
            system_id: msg.system_id,
            component_id: msg.component_id,
            incompat_flags: msg.incompat_flags,
            compat_flags: msg.compat_flags,
            status: status_label(&msg.status),
            checksum_valid: msg.checksum_valid(),
            fields: msg.fields(),
            payload: msg.raw_payload().map(|raw| to_hex(raw)),
        }
    }
}

pub fn print_messages(messages: &[DecodedMessage], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for msg in messages {
                println!(
                    "{}",
                    serde_json::to_string(&MessageOutput::from(msg))
                        .unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEQ", "SYS", "COMP", "ID", "NAME", "STATUS", "BODY"]);
            for msg in messages {
                table.add_row(vec![
                    msg.sequence.to_string(),
                    msg.system_id.to_string(),
                    msg.component_id.to_string(),
                    msg.message_id.to_string(),
                    msg.name.clone().unwrap_or_else(|| "?".to_string()),
                    status_label(&msg.status),
                    body_summary(&msg.body),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for msg in messages {
                println!(
                    "{} (#{}) seq={} sys={} comp={} status={} {}",
                    msg.name.as_deref().unwrap_or("?"),
                    msg.message_id,
                    msg.sequence,
                    msg.system_id,
                    msg.component_id,
                    status_label(&msg.status),
                    body_summary(&msg.body)
                );
            }
        }
        OutputFormat::Raw => {
            for msg in messages {
                println!("{}", body_summary(&msg.body));
            }
        }
    }
}

pub fn status_label(status: &MessageStatus) -> String {
    match status {
        MessageStatus::Ok => "ok".to_string(),
        MessageStatus::UnknownMessage => "unknown-message".to_string(),
        MessageStatus::ChecksumMismatch { expected, actual } => {
            format!("checksum-mismatch (expected {expected:#06x}, got {actual:#06x})")
        }
        MessageStatus::DecodeFailed(reason) => format!("decode-failed: {reason}"),
    }
}

fn body_summary(body: &MessageBody) -> String {
    match body {
        MessageBody::Fields(fields) => fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" "),
        MessageBody::Raw(payload) => format!("raw={}", to_hex(payload)),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

/// Parse hex text. Whitespace, `:` separators and `0x` prefixes are ignored.
pub fn parse_hex(text: &str) -> Result<Vec<u8>, String> {
    let digits: String = text
        .split_whitespace()
        .flat_map(|token| token.split(':'))
        .map(|token| token.trim_start_matches("0x").trim_start_matches("0X"))
        .collect();

    if digits.len() % 2 != 0 {
        return Err(format!("odd number of hex digits ({})", digits.len()));
    }

    (0..digits.len())
        .step_by(2)
        .map(|i| {
            let pair = digits.get(i..i + 2).ok_or("non-ASCII input")?;
            // from_str_radix alone would accept a leading sign.
            if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(format!("invalid hex byte {pair:?}"));
            }
            u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte {pair:?}"))
        })
        .collect()
}

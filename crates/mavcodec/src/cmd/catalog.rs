use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mavcodec_message::MessageKey;
use mavcodec_schema::{Catalog, MessageDefinition};
use serde::Serialize;

use crate::cmd::CatalogArgs;
use crate::exit::{message_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct SummaryOutput<'a> {
    id: u32,
    name: &'a str,
    crc_extra: u8,
    fields: usize,
    /// Absent when the layout uses an unsupported type.
    payload_size: Option<usize>,
}

#[derive(Serialize)]
struct FieldOutput<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    type_name: &'a str,
    array_length: usize,
    size: Option<usize>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    enum_name: Option<&'a str>,
}

#[derive(Serialize)]
struct DetailOutput<'a> {
    #[serde(flatten)]
    summary: SummaryOutput<'a>,
    /// Fields in the order they appear on the wire.
    wire_order: Vec<FieldOutput<'a>>,
}

pub fn run(args: CatalogArgs, format: OutputFormat) -> CliResult<i32> {
    let catalog = args.source.load()?;

    match &args.message {
        None => list(&catalog, format),
        Some(key) => {
            let definition = MessageKey::parse(key)
                .resolve(&catalog)
                .map_err(|err| message_error("catalog lookup failed", err))?;
            describe(definition, format);
        }
    }
    Ok(SUCCESS)
}

fn summary(def: &MessageDefinition) -> SummaryOutput<'_> {
    SummaryOutput {
        id: def.id,
        name: &def.name,
        crc_extra: def.crc_extra,
        fields: def.fields.len(),
        payload_size: def.payload_size().ok(),
    }
}

fn size_label(size: Option<usize>) -> String {
    size.map_or_else(|| "?".to_string(), |s| s.to_string())
}

fn list(catalog: &Catalog, format: OutputFormat) {
    let messages = catalog.messages();
    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            for def in messages {
                println!(
                    "{}",
                    serde_json::to_string(&summary(def)).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "CRC EXTRA", "FIELDS", "SIZE"]);
            for def in messages {
                let s = summary(def);
                table.add_row(vec![
                    s.id.to_string(),
                    s.name.to_string(),
                    s.crc_extra.to_string(),
                    s.fields.to_string(),
                    size_label(s.payload_size),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for def in messages {
                println!(
                    "{:>8}  {:<32} crc_extra={:<3} size={}",
                    def.id,
                    def.name,
                    def.crc_extra,
                    size_label(def.payload_size().ok())
                );
            }
        }
    }
}

fn describe(def: &MessageDefinition, format: OutputFormat) {
    // Unsupported types leave the wire order undefined; fall back to
    // declaration order so the definition can still be inspected.
    let ordered = def
        .wire_order()
        .unwrap_or_else(|_| def.fields.iter().collect());
    let fields: Vec<FieldOutput<'_>> = ordered
        .into_iter()
        .map(|f| FieldOutput {
            name: &f.name,
            type_name: &f.type_name,
            array_length: f.array_length,
            size: f.size(),
            enum_name: f.enum_name.as_deref(),
        })
        .collect();

    match format {
        OutputFormat::Json | OutputFormat::Raw => {
            let out = DetailOutput {
                summary: summary(def),
                wire_order: fields,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            println!(
                "{} (#{}) crc_extra={} size={}",
                def.name,
                def.id,
                def.crc_extra,
                size_label(def.payload_size().ok())
            );
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "FIELD", "TYPE", "ARRAY", "SIZE", "ENUM"]);
            for (i, f) in fields.iter().enumerate() {
                table.add_row(vec![
                    i.to_string(),
                    f.name.to_string(),
                    f.type_name.to_string(),
                    f.array_length.to_string(),
                    size_label(f.size),
                    f.enum_name.unwrap_or("").to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} (#{}) crc_extra={} size={}",
                def.name,
                def.id,
                def.crc_extra,
                size_label(def.payload_size().ok())
            );
            for f in &fields {
                let array = if f.array_length > 0 {
                    format!("[{}]", f.array_length)
                } else {
                    String::new()
                };
                println!("  {}{} {}", f.type_name, array, f.name);
            }
        }
    }
}

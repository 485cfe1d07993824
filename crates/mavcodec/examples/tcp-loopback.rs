//! TCP loopback example: one thread sends heartbeats, the main thread
//! decodes them with a shared catalog.
//!
//! Run with:
//!   cargo run --example tcp-loopback

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use mavcodec::message::{FieldValue, Fields, MessageKey, MessageReader, MessageWriter};
use mavcodec::schema::Catalog;

const CATALOG: &str = r#"{
    "messages": [
        {
            "id": 0,
            "name": "HEARTBEAT",
            "fields": [
                { "name": "type", "type": "uint8_t" },
                { "name": "autopilot", "type": "uint8_t" },
                { "name": "base_mode", "type": "uint8_t" },
                { "name": "custom_mode", "type": "uint32_t" },
                { "name": "system_status", "type": "uint8_t" },
                { "name": "mavlink_version", "type": "uint8_t_mavlink_version" }
            ]
        }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Arc::new(Catalog::from_json_str(CATALOG)?);
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let sender_catalog = Arc::clone(&catalog);
    let sender = thread::spawn(
        move || -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            let stream = TcpStream::connect(addr)?;
            let mut writer = MessageWriter::new(stream, sender_catalog, 1, 1);
            for mode in 0..3u64 {
                let mut fields = Fields::new();
                fields.insert("type".into(), FieldValue::UInt(2));
                fields.insert("custom_mode".into(), FieldValue::UInt(mode));
                fields.insert("mavlink_version".into(), FieldValue::UInt(3));
                let seq = writer.send(MessageKey::Name("HEARTBEAT"), &fields)?;
                eprintln!("[sender] heartbeat seq={seq}");
            }
            Ok(())
        },
    );

    let (stream, _) = listener.accept()?;
    for msg in MessageReader::new(stream, catalog) {
        let msg = msg?;
        eprintln!(
            "[receiver] {} seq={} status={:?} custom_mode={}",
            msg.name.as_deref().unwrap_or("?"),
            msg.sequence,
            msg.status,
            msg.fields()
                .and_then(|f| f.get("custom_mode"))
                .map(ToString::to_string)
                .unwrap_or_default()
        );
    }

    sender
        .join()
        .map_err(|_| "sender thread panicked")?
        .map_err(|err| err as Box<dyn std::error::Error>)?;
    Ok(())
}

//! Catalog lookup, checksum verification and payload decoding for frames.

use bytes::Bytes;
use mavcodec_frame::Frame;
use mavcodec_schema::Catalog;
use tracing::{debug, warn};

use crate::payload::unpack_payload;
use crate::value::Fields;

/// Outcome of dispatching one candidate frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    /// Checksum verified and payload decoded.
    Ok,
    /// No definition for the message id; the checksum cannot be checked.
    UnknownMessage,
    /// The trailing checksum disagrees with the computed one.
    ChecksumMismatch { expected: u16, actual: u16 },
    /// Checksum verified but the payload could not be decoded.
    DecodeFailed(String),
}

/// Decoded fields, or the raw payload when decoding was not possible.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    Fields(Fields),
    Raw(Bytes),
}

/// One dispatched message with its transport metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    pub message_id: u32,
    /// Catalog name, when the id is known.
    pub name: Option<String>,
    pub sequence: u8,
    pub system_id: u8,
    pub component_id: u8,
    pub incompat_flags: u8,
    pub compat_flags: u8,
    pub status: MessageStatus,
    pub body: MessageBody,
}

impl DecodedMessage {
    /// True when the checksum was verified against a known CRC extra.
    pub fn checksum_valid(&self) -> bool {
        matches!(
            self.status,
            MessageStatus::Ok | MessageStatus::DecodeFailed(_)
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status == MessageStatus::Ok
    }

    pub fn fields(&self) -> Option<&Fields> {
        match &self.body {
            MessageBody::Fields(fields) => Some(fields),
            MessageBody::Raw(_) => None,
        }
    }

    pub fn raw_payload(&self) -> Option<&Bytes> {
        match &self.body {
            MessageBody::Raw(payload) => Some(payload),
            MessageBody::Fields(_) => None,
        }
    }
}

/// Resolve, verify and decode one candidate frame.
///
/// Never fails: every problem is reported through [`MessageStatus`] and the
/// payload is passed through raw.
pub fn decode_frame(catalog: &Catalog, frame: &Frame) -> DecodedMessage {
    let message_id = frame.message_id();
    let mut message = DecodedMessage {
        message_id,
        name: None,
        sequence: frame.sequence(),
        system_id: frame.system_id(),
        component_id: frame.component_id(),
        incompat_flags: frame.incompat_flags(),
        compat_flags: frame.compat_flags(),
        status: MessageStatus::UnknownMessage,
        body: MessageBody::Raw(frame.payload_bytes()),
    };

    let Some(definition) = catalog.message(message_id) else {
        debug!(message_id, "no definition for message");
        return message;
    };
    message.name = Some(definition.name.clone());

    let expected = frame.compute_checksum(definition.crc_extra);
    let actual = frame.checksum();
    if expected != actual {
        warn!(
            message_id,
            name = %definition.name,
            expected,
            actual,
            "checksum mismatch"
        );
        message.status = MessageStatus::ChecksumMismatch { expected, actual };
        return message;
    }

    match unpack_payload(definition, frame.payload()) {
        Ok(fields) => {
            message.status = MessageStatus::Ok;
            message.body = MessageBody::Fields(fields);
        }
        Err(err) => {
            debug!(message_id, error = %err, "payload decode failed");
            message.status = MessageStatus::DecodeFailed(err.to_string());
        }
    }
    message
}

use std::fmt;

use mavcodec_frame::{build_frame, Frame, FrameMeta};
use mavcodec_schema::{Catalog, MessageDefinition};

use crate::error::{MessageError, Result};
use crate::payload::pack_payload;
use crate::value::Fields;

/// Message selector: numeric id or catalog name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey<'a> {
    Id(u32),
    Name(&'a str),
}

impl<'a> MessageKey<'a> {
    /// Interpret a user-supplied selector: digits are an id, anything else
    /// a name.
    pub fn parse(text: &'a str) -> Self {
        match text.parse::<u32>() {
            Ok(id) => MessageKey::Id(id),
            Err(_) => MessageKey::Name(text),
        }
    }

    /// Look the key up in a catalog.
    pub fn resolve<'c>(&self, catalog: &'c Catalog) -> Result<&'c MessageDefinition> {
        let found = match *self {
            MessageKey::Id(id) => catalog.message(id),
            MessageKey::Name(name) => catalog.message_by_name(name),
        };
        found.ok_or_else(|| MessageError::UnknownMessage(self.to_string()))
    }
}

impl fmt::Display for MessageKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKey::Id(id) => write!(f, "#{id}"),
            MessageKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<u32> for MessageKey<'_> {
    fn from(id: u32) -> Self {
        MessageKey::Id(id)
    }
}

impl<'a> From<&'a str> for MessageKey<'a> {
    fn from(name: &'a str) -> Self {
        MessageKey::Name(name)
    }
}

/// Encode a message into a complete frame.
pub fn encode_message(
    catalog: &Catalog,
    key: MessageKey<'_>,
    fields: &Fields,
    meta: &FrameMeta,
) -> Result<Frame> {
    let definition = key.resolve(catalog)?;
    encode_with_definition(definition, fields, meta)
}

/// Encode against an already resolved definition.
pub fn encode_with_definition(
    definition: &MessageDefinition,
    fields: &Fields,
    meta: &FrameMeta,
) -> Result<Frame> {
    let payload = pack_payload(definition, fields)?;
    Ok(build_frame(
        definition.id,
        definition.crc_extra,
        &payload,
        meta,
    )?)
}

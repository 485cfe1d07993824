//! Catalog-driven MAVLink v2 message codec.
//!
//! Turns structured field values into frames and frames back into values:
//! - [`pack_payload`] / [`unpack_payload`] apply a definition's wire layout
//! - [`encode_message`] builds a complete frame for a named or numbered message
//! - [`decode_frame`] verifies the checksum and decodes, never dropping a frame
//! - [`StreamDecoder`], [`MessageReader`] and [`MessageWriter`] handle streams

pub mod dispatch;
pub mod encode;
pub mod error;
pub mod payload;
pub mod stream;
pub mod value;

pub use dispatch::{decode_frame, DecodedMessage, MessageBody, MessageStatus};
pub use encode::{encode_message, encode_with_definition, MessageKey};
pub use error::{MessageError, Result};
pub use payload::{pack_payload, unpack_payload};
pub use stream::{MessageReader, MessageWriter, StreamDecoder};
pub use value::{FieldValue, Fields};

//! MAVLink v2 framing.
//!
//! Every frame on the wire is:
//! - a `0xFD` start marker
//! - a 9-byte header (length, flags, sequence, sender ids, 24-bit message id)
//! - up to 255 payload bytes
//! - a 2-byte X.25 checksum seeded per message type
//!
//! This crate builds frames and recovers them from arbitrary byte streams.
//! It knows nothing about message layouts; checksum validation needs the
//! per-message CRC extra and is left to schema-aware callers.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod crc;
pub mod error;
pub mod reader;
pub mod scanner;
pub mod writer;

#[cfg(feature = "async")]
pub use async_codec::MavlinkCodec;
pub use codec::{
    build_frame, encode_frame, frame_len, Frame, FrameConfig, FrameMeta, CHECKSUM_SIZE,
    HEADER_SIZE, MAGIC, MAX_FRAME_SIZE, MAX_MESSAGE_ID, MAX_PAYLOAD,
};
pub use self::crc::{accumulate, digest, Crc16, CRC_INIT};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use scanner::{scan, FrameScanner, ScanOutcome, ScanState, ScanStats, ScannerConfig};
pub use writer::FrameWriter;

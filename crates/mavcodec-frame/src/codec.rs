use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::frame_checksum;
use crate::error::{FrameError, Result};
use crate::scanner::ScannerConfig;

/// MAVLink v2 start-of-frame marker.
pub const MAGIC: u8 = 0xFD;

/// Frame header: magic, length, two flag bytes, sequence, system id,
/// component id and a 3-byte message id.
pub const HEADER_SIZE: usize = 10;

/// Trailing checksum size.
pub const CHECKSUM_SIZE: usize = 2;

/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD: usize = 255;

/// Largest possible frame on the wire.
pub const MAX_FRAME_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD + CHECKSUM_SIZE;

/// Largest message id representable in the 3-byte id field.
pub const MAX_MESSAGE_ID: u32 = 0x00FF_FFFF;

/// Default size of a single read from the underlying stream.
pub const DEFAULT_READ_CHUNK: usize = 4 * 1024;

/// Transport metadata stamped into each outgoing frame header.
///
/// System and component ids are carried through untouched; nothing in this
/// crate routes on them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameMeta {
    /// Sequence number, wraps at 256.
    pub sequence: u8,
    /// Sender system id.
    pub system_id: u8,
    /// Sender component id.
    pub component_id: u8,
    /// Incompatibility flags. Signing is not implemented, so this is
    /// normally zero.
    pub incompat_flags: u8,
    /// Compatibility flags.
    pub compat_flags: u8,
}

impl FrameMeta {
    /// Metadata for a sender, starting at sequence zero.
    pub fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            ..Self::default()
        }
    }

    /// Same metadata with a different sequence number.
    pub fn with_sequence(self, sequence: u8) -> Self {
        Self { sequence, ..self }
    }
}

/// One complete MAVLink v2 frame, magic byte through checksum.
///
/// A frame only guarantees that its length fields are self-consistent.
/// Whether the checksum is valid depends on the message's CRC extra, which
/// only a schema-aware consumer knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    raw: Bytes,
}

impl Frame {
    /// Wrap raw wire bytes, checking the magic byte and declared length.
    pub fn from_bytes(raw: impl Into<Bytes>) -> Result<Self> {
        let raw = raw.into();
        if raw.len() < HEADER_SIZE + CHECKSUM_SIZE {
            return Err(FrameError::LengthMismatch {
                declared: HEADER_SIZE + CHECKSUM_SIZE,
                actual: raw.len(),
            });
        }
        if raw[0] != MAGIC {
            return Err(FrameError::InvalidMagic(raw[0]));
        }
        let declared = frame_len(raw[1]);
        if raw.len() != declared {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: raw.len(),
            });
        }
        Ok(Self { raw })
    }

    pub(crate) fn from_scanned(raw: Bytes) -> Self {
        debug_assert_eq!(raw.len(), frame_len(raw[1]));
        Self { raw }
    }

    /// Declared payload length.
    pub fn payload_len(&self) -> usize {
        self.raw[1] as usize
    }

    pub fn incompat_flags(&self) -> u8 {
        self.raw[2]
    }

    pub fn compat_flags(&self) -> u8 {
        self.raw[3]
    }

    pub fn sequence(&self) -> u8 {
        self.raw[4]
    }

    pub fn system_id(&self) -> u8 {
        self.raw[5]
    }

    pub fn component_id(&self) -> u8 {
        self.raw[6]
    }

    /// 24-bit message id.
    pub fn message_id(&self) -> u32 {
        u32::from_le_bytes([self.raw[7], self.raw[8], self.raw[9], 0])
    }

    /// Transport metadata carried in the header.
    pub fn meta(&self) -> FrameMeta {
        FrameMeta {
            sequence: self.sequence(),
            system_id: self.system_id(),
            component_id: self.component_id(),
            incompat_flags: self.incompat_flags(),
            compat_flags: self.compat_flags(),
        }
    }

    /// Payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.raw[HEADER_SIZE..HEADER_SIZE + self.payload_len()]
    }

    /// Payload as a shared buffer slice, without copying.
    pub fn payload_bytes(&self) -> Bytes {
        self.raw.slice(HEADER_SIZE..HEADER_SIZE + self.payload_len())
    }

    /// Checksum carried in the last two bytes.
    pub fn checksum(&self) -> u16 {
        let end = self.raw.len();
        u16::from_le_bytes([self.raw[end - 2], self.raw[end - 1]])
    }

    /// Checksum this frame should carry for the given CRC extra.
    pub fn compute_checksum(&self, crc_extra: u8) -> u16 {
        frame_checksum(&self.raw[1..HEADER_SIZE], self.payload(), crc_extra)
    }

    /// True when the carried checksum matches the computed one.
    pub fn has_valid_checksum(&self, crc_extra: u8) -> bool {
        self.checksum() == self.compute_checksum(crc_extra)
    }

    /// The complete wire representation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_bytes(self) -> Bytes {
        self.raw
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        self.raw.len()
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

/// Total wire size of a frame declaring `payload_len` payload bytes.
pub fn frame_len(payload_len: u8) -> usize {
    HEADER_SIZE + payload_len as usize + CHECKSUM_SIZE
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────┬─────┬─────────┬────────┬─────┬───────┬────────┬─────────────┬─────────┬──────────┐
/// │ 0xFD  │ len │ incompat│ compat │ seq │ sysid │ compid │ msgid (3 LE)│ payload │ crc (LE) │
/// └───────┴─────┴─────────┴────────┴─────┴───────┴────────┴─────────────┴─────────┴──────────┘
/// ```
///
/// The checksum covers every byte after the magic plus `crc_extra`.
pub fn encode_frame(
    message_id: u32,
    crc_extra: u8,
    payload: &[u8],
    meta: &FrameMeta,
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    if message_id > MAX_MESSAGE_ID {
        return Err(FrameError::InvalidMessageId(message_id));
    }

    let start = dst.len();
    dst.reserve(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    dst.put_u8(MAGIC);
    dst.put_u8(payload.len() as u8);
    dst.put_u8(meta.incompat_flags);
    dst.put_u8(meta.compat_flags);
    dst.put_u8(meta.sequence);
    dst.put_u8(meta.system_id);
    dst.put_u8(meta.component_id);
    dst.put_slice(&message_id.to_le_bytes()[..3]);
    dst.put_slice(payload);

    let crc = frame_checksum(&dst[start + 1..start + HEADER_SIZE], payload, crc_extra);
    dst.put_u16_le(crc);
    Ok(())
}

/// Build a standalone frame.
pub fn build_frame(
    message_id: u32,
    crc_extra: u8,
    payload: &[u8],
    meta: &FrameMeta,
) -> Result<Frame> {
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    encode_frame(message_id, crc_extra, payload, meta, &mut buf)?;
    Ok(Frame::from_scanned(buf.freeze()))
}

/// Configuration for the blocking frame reader and writer.
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Stream resynchronization policy.
    pub scanner: ScannerConfig,
    /// Bytes requested per read. Zero means [`DEFAULT_READ_CHUNK`].
    pub read_chunk_size: usize,
}

impl FrameConfig {
    pub(crate) fn chunk_size(&self) -> usize {
        if self.read_chunk_size == 0 {
            DEFAULT_READ_CHUNK
        } else {
            self.read_chunk_size
        }
    }
}

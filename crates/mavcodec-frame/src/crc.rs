//! X.25 / MCRF4XX checksum used by MAVLink.
//!
//! Every frame carries a 16-bit CRC over everything after the magic byte,
//! with one extra byte (the message's "CRC extra") folded in after the
//! payload. The extra byte ties a frame to the exact field layout it was
//! encoded with.

use ::crc::{Crc, CRC_16_MCRF4XX};

/// Initial accumulator value.
pub const CRC_INIT: u16 = 0xFFFF;

static MCRF4XX: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Checksum `bytes` starting from `seed`.
///
/// `seed` is a raw register value, so `digest(b, digest(a, CRC_INIT))`
/// equals `digest(ab, CRC_INIT)`.
pub fn digest(bytes: &[u8], seed: u16) -> u16 {
    // The crate reflects custom initial values for reflected algorithms.
    let mut digest = MCRF4XX.digest_with_initial(seed.reverse_bits());
    digest.update(bytes);
    digest.finalize()
}

/// Fold one byte into a running checksum.
pub fn accumulate(byte: u8, crc: u16) -> u16 {
    digest(&[byte], crc)
}

/// Stateful checksum accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    value: u16,
}

impl Crc16 {
    /// Create an accumulator seeded with [`CRC_INIT`].
    pub fn new() -> Self {
        Self::with_seed(CRC_INIT)
    }

    /// Create an accumulator with an explicit seed.
    pub fn with_seed(seed: u16) -> Self {
        Self { value: seed }
    }

    /// Fold a single byte.
    pub fn update_byte(&mut self, byte: u8) {
        self.value = accumulate(byte, self.value);
    }

    /// Fold a byte slice.
    pub fn update(&mut self, bytes: &[u8]) {
        self.value = digest(bytes, self.value);
    }

    /// Current checksum value.
    pub fn value(&self) -> u16 {
        self.value
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame checksum: header bytes after the magic, payload, then `crc_extra`.
pub fn frame_checksum(header_tail: &[u8], payload: &[u8], crc_extra: u8) -> u16 {
    let mut digest = MCRF4XX.digest();
    digest.update(header_tail);
    digest.update(payload);
    digest.update(&[crc_extra]);
    digest.finalize()
}

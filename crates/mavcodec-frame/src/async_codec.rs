//! `tokio_util::codec` adapter for framed async streams.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::Frame;
use crate::error::FrameError;
use crate::scanner::{FrameScanner, ScanStats, ScannerConfig};

/// Frame codec for `FramedRead` / `FramedWrite`.
///
/// Decoding moves every received byte into an internal [`FrameScanner`], so
/// resynchronization behaves exactly like the blocking reader. A partial
/// frame still buffered at EOF is dropped.
#[derive(Debug, Default)]
pub struct MavlinkCodec {
    scanner: FrameScanner,
}

impl MavlinkCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            scanner: FrameScanner::with_config(config),
        }
    }

    /// Scanner counters for this stream.
    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }
}

impl Decoder for MavlinkCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, FrameError> {
        if !src.is_empty() {
            let chunk = src.split();
            self.scanner.push(&chunk);
        }
        Ok(self.scanner.poll_frame())
    }
}

impl Encoder<Frame> for MavlinkCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), FrameError> {
        dst.extend_from_slice(frame.as_bytes());
        Ok(())
    }
}

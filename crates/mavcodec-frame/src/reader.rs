use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::codec::{Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::scanner::{FrameScanner, ScanStats};

/// Reads candidate frames from any `Read` stream.
///
/// Handles partial reads and garbage between frames internally. Frames are
/// returned without checksum validation; see the scanner module docs.
pub struct FrameReader<T> {
    inner: T,
    scanner: FrameScanner,
    pending: VecDeque<Frame>,
    chunk: Vec<u8>,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            scanner: FrameScanner::with_config(config.scanner),
            pending: VecDeque::new(),
            chunk: vec![0u8; config.chunk_size()],
            config,
        }
    }

    /// Read the next candidate frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached,
    /// whether or not a partial frame is still buffered.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(frame);
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.pending.extend(self.scanner.feed(&self.chunk[..read]));
        }
    }

    /// Scanner counters for this stream.
    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    /// Yields frames until the stream closes; EOF ends iteration.
    fn next(&mut self) -> Option<Self::Item> {
        match self.read_frame() {
            Ok(frame) => Some(Ok(frame)),
            Err(FrameError::ConnectionClosed) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

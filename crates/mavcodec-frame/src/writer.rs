use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameMeta, MAX_FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete frames to any `Write` stream.
///
/// Frames sent through [`send`](Self::send) are stamped with this writer's
/// sender ids and an auto-incrementing sequence number.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    meta: FrameMeta,
}

impl<T: Write> FrameWriter<T> {
    /// Create a frame writer for a sender, starting at sequence zero.
    pub fn new(inner: T, system_id: u8, component_id: u8) -> Self {
        Self::with_meta(inner, FrameMeta::new(system_id, component_id))
    }

    /// Create a frame writer with explicit header metadata.
    pub fn with_meta(inner: T, meta: FrameMeta) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_FRAME_SIZE),
            meta,
        }
    }

    /// Write an already built frame unchanged (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.write_all(frame.as_bytes())?;
        self.flush()
    }

    /// Encode a payload as the next frame in sequence and send it.
    ///
    /// Returns the sequence number used.
    pub fn send(&mut self, message_id: u32, crc_extra: u8, payload: &[u8]) -> Result<u8> {
        let sequence = self.meta.sequence;

        self.buf.clear();
        encode_frame(message_id, crc_extra, payload, &self.meta, &mut self.buf)?;

        let buf = std::mem::take(&mut self.buf);
        let written = self.write_all(&buf);
        self.buf = buf;
        written?;

        self.meta.sequence = sequence.wrapping_add(1);
        self.flush()?;
        Ok(sequence)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        Ok(())
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Header metadata used for the next frame.
    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    /// Override the sequence number of the next frame.
    pub fn set_sequence(&mut self, sequence: u8) {
        self.meta.sequence = sequence;
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

//! Scanner and catalog tied together for whole byte streams.

use std::io::{Read, Write};
use std::sync::Arc;

use mavcodec_frame::{
    FrameConfig, FrameMeta, FrameReader, FrameScanner, FrameWriter, ScanStats, ScannerConfig,
};
use mavcodec_schema::Catalog;

use crate::dispatch::{decode_frame, DecodedMessage};
use crate::encode::MessageKey;
use crate::error::Result;
use crate::payload::pack_payload;
use crate::value::Fields;

/// Push-style decoder for one logical connection.
///
/// Feed arbitrary chunks; every complete candidate frame comes back as a
/// [`DecodedMessage`]. Incomplete frames are kept for the next call.
#[derive(Debug)]
pub struct StreamDecoder {
    scanner: FrameScanner,
    catalog: Arc<Catalog>,
}

impl StreamDecoder {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_config(catalog, ScannerConfig::default())
    }

    pub fn with_config(catalog: Arc<Catalog>, config: ScannerConfig) -> Self {
        Self {
            scanner: FrameScanner::with_config(config),
            catalog,
        }
    }

    /// Append bytes and dispatch every frame they complete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<DecodedMessage> {
        self.scanner
            .feed(bytes)
            .iter()
            .map(|frame| decode_frame(&self.catalog, frame))
            .collect()
    }

    /// Bytes retained while waiting for the rest of a frame.
    pub fn buffered(&self) -> usize {
        self.scanner.buffered().len()
    }

    pub fn stats(&self) -> ScanStats {
        self.scanner.stats()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

/// Reads and dispatches messages from any `Read` stream (blocking).
pub struct MessageReader<R> {
    frames: FrameReader<R>,
    catalog: Arc<Catalog>,
}

impl<R: Read> MessageReader<R> {
    pub fn new(inner: R, catalog: Arc<Catalog>) -> Self {
        Self::with_config(inner, catalog, FrameConfig::default())
    }

    pub fn with_config(inner: R, catalog: Arc<Catalog>, config: FrameConfig) -> Self {
        Self {
            frames: FrameReader::with_config(inner, config),
            catalog,
        }
    }

    /// Read the next message. EOF surfaces as `FrameError::ConnectionClosed`.
    pub fn read_message(&mut self) -> Result<DecodedMessage> {
        let frame = self.frames.read_frame()?;
        Ok(decode_frame(&self.catalog, &frame))
    }

    pub fn stats(&self) -> ScanStats {
        self.frames.stats()
    }

    pub fn into_inner(self) -> R {
        self.frames.into_inner()
    }
}

impl<R: Read> Iterator for MessageReader<R> {
    type Item = Result<DecodedMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        self.frames
            .next()
            .map(|frame| Ok(decode_frame(&self.catalog, &frame?)))
    }
}

/// Encodes messages and writes them with a running sequence number.
pub struct MessageWriter<W> {
    frames: FrameWriter<W>,
    catalog: Arc<Catalog>,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(inner: W, catalog: Arc<Catalog>, system_id: u8, component_id: u8) -> Self {
        Self::with_meta(inner, catalog, FrameMeta::new(system_id, component_id))
    }

    pub fn with_meta(inner: W, catalog: Arc<Catalog>, meta: FrameMeta) -> Self {
        Self {
            frames: FrameWriter::with_meta(inner, meta),
            catalog,
        }
    }

    /// Encode and send one message. Returns the sequence number used.
    pub fn send(&mut self, key: MessageKey<'_>, fields: &Fields) -> Result<u8> {
        let definition = key.resolve(&self.catalog)?;
        let payload = pack_payload(definition, fields)?;
        Ok(self
            .frames
            .send(definition.id, definition.crc_extra, &payload)?)
    }

    pub fn meta(&self) -> &FrameMeta {
        self.frames.meta()
    }

    pub fn into_inner(self) -> W {
        self.frames.into_inner()
    }
}

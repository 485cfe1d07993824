//! Stream resynchronization.
//!
//! MAVLink has no escape sequence: any `0xFD` byte may start a frame, and
//! the only way to find frame boundaries in a corrupted stream is to try
//! every marker. The scanner does exactly that and nothing more. It emits
//! every candidate whose length fields are self-consistent and leaves the
//! checksum to a consumer that knows the message's CRC extra. A marker that
//! happens to sit inside a payload can therefore yield a spurious candidate;
//! that candidate fails its checksum downstream and scanning carries on
//! after it.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace, warn};

use crate::codec::{frame_len, Frame, HEADER_SIZE, MAGIC};

/// Default bound on retained bytes before forced resynchronization.
pub const DEFAULT_RESYNC_LIMIT: usize = 4 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Where the scanner stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No marker in the buffer; everything seen so far was discarded.
    Searching,
    /// A marker was found but the 10-byte header is not complete yet.
    HeaderPartial,
    /// The header is complete but payload or checksum bytes are missing.
    PayloadPartial,
    /// A complete candidate frame was just produced.
    FrameReady,
}

impl ScanState {
    /// True when the scanner holds the start of a frame and needs more input.
    pub fn is_partial(self) -> bool {
        matches!(self, ScanState::HeaderPartial | ScanState::PayloadPartial)
    }
}

/// Resynchronization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// When a scan pass completes no frame and more than this many bytes are
    /// still retained, everything before the next marker is dropped.
    ///
    /// Because the length field is one byte, a retained partial frame never
    /// exceeds `MAX_FRAME_SIZE - 1` bytes, so limits at or above that are a
    /// safety net and smaller limits trade in-flight frames for memory.
    pub resync_limit: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            resync_limit: DEFAULT_RESYNC_LIMIT,
        }
    }
}

/// Counters describing link quality as seen by the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidate frames emitted.
    pub frames: u64,
    /// Bytes skipped while searching for a marker or dropped on resync.
    pub discarded_bytes: u64,
    /// Forced resynchronizations.
    pub resyncs: u64,
}

enum Step {
    NoMarker { discard: usize },
    Partial { skip: usize, state: ScanState },
    Ready { skip: usize, len: usize },
}

fn locate(buf: &[u8]) -> Step {
    let Some(skip) = buf.iter().position(|&b| b == MAGIC) else {
        return Step::NoMarker { discard: buf.len() };
    };

    let rest = &buf[skip..];
    if rest.len() < HEADER_SIZE {
        return Step::Partial {
            skip,
            state: ScanState::HeaderPartial,
        };
    }

    let len = frame_len(rest[1]);
    if rest.len() < len {
        return Step::Partial {
            skip,
            state: ScanState::PayloadPartial,
        };
    }

    Step::Ready { skip, len }
}

/// Result of a single pass over a borrowed buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Candidate frames in stream order.
    pub frames: Vec<Frame>,
    /// Bytes at the front of the buffer that the caller may drop.
    pub consumed: usize,
    /// State at the point the pass stopped.
    pub state: ScanState,
}

impl ScanOutcome {
    /// The unconsumed suffix that must be kept for the next call.
    pub fn remaining<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.consumed..]
    }
}

/// Scan `buf` left to right and slice out every complete candidate frame.
///
/// Stops at the first incomplete frame; the bytes from its marker onwards
/// are left unconsumed.
pub fn scan(buf: &[u8]) -> ScanOutcome {
    let mut frames = Vec::new();
    let mut pos = 0usize;

    let state = loop {
        match locate(&buf[pos..]) {
            Step::NoMarker { discard } => {
                pos += discard;
                break ScanState::Searching;
            }
            Step::Partial { skip, state } => {
                pos += skip;
                break state;
            }
            Step::Ready { skip, len } => {
                let start = pos + skip;
                let raw = Bytes::copy_from_slice(&buf[start..start + len]);
                frames.push(Frame::from_scanned(raw));
                pos = start + len;
            }
        }
    };

    ScanOutcome {
        frames,
        consumed: pos,
        state,
    }
}

/// Incremental scanner owning the stream buffer for one connection.
///
/// Exactly one consumer drives a scanner; wrap it in a `Mutex` if several
/// producers feed the same stream.
#[derive(Debug)]
pub struct FrameScanner {
    buf: BytesMut,
    config: ScannerConfig,
    state: ScanState,
    stats: ScanStats,
}

impl FrameScanner {
    /// Create a scanner with default configuration.
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    /// Create a scanner with explicit configuration.
    pub fn with_config(config: ScannerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
            state: ScanState::Searching,
            stats: ScanStats::default(),
        }
    }

    /// Append newly arrived bytes without scanning.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Advance the state machine until a frame is ready or input runs out.
    ///
    /// Returns `None` when more input is needed; [`state`](Self::state)
    /// then tells which partial state the scanner is in.
    pub fn next_frame(&mut self) -> Option<Frame> {
        match locate(&self.buf) {
            Step::NoMarker { discard } => {
                self.discard(discard);
                self.state = ScanState::Searching;
                None
            }
            Step::Partial { skip, state } => {
                self.discard(skip);
                self.state = state;
                None
            }
            Step::Ready { skip, len } => {
                self.discard(skip);
                let raw = self.buf.split_to(len).freeze();
                self.state = ScanState::FrameReady;
                self.stats.frames += 1;
                trace!(len, "candidate frame");
                Some(Frame::from_scanned(raw))
            }
        }
    }

    /// Like [`next_frame`](Self::next_frame), but applies the
    /// resynchronization policy when no frame is ready and the retained
    /// buffer exceeds the configured limit.
    pub fn poll_frame(&mut self) -> Option<Frame> {
        loop {
            if let Some(frame) = self.next_frame() {
                return Some(frame);
            }
            if self.buf.len() <= self.config.resync_limit {
                return None;
            }
            self.resync();
        }
    }

    /// Append `bytes`, then return every candidate frame now available.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Frame> {
        self.push(bytes);
        std::iter::from_fn(|| self.poll_frame()).collect()
    }

    /// Drop the marker at the front of the buffer and everything up to the
    /// next marker.
    pub fn resync(&mut self) {
        let dropped = self
            .buf
            .iter()
            .skip(1)
            .position(|&b| b == MAGIC)
            .map(|idx| idx + 1)
            .unwrap_or(self.buf.len());

        warn!(
            dropped,
            retained = self.buf.len() - dropped,
            limit = self.config.resync_limit,
            "unresolvable frame marker, resynchronizing"
        );
        self.discard(dropped);
        self.stats.resyncs += 1;
        self.state = ScanState::Searching;
    }

    /// State after the last step.
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Bytes retained for the next call.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Forget all retained bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.state = ScanState::Searching;
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    fn discard(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        debug!(count, "discarding bytes outside frames");
        self.buf.advance(count);
        self.stats.discarded_bytes += count as u64;
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{build_frame, FrameMeta, MAX_FRAME_SIZE};

    fn frame(id: u32, payload: &[u8], seq: u8) -> Frame {
        build_frame(id, 0x21, payload, &FrameMeta::new(1, 1).with_sequence(seq)).unwrap()
    }

    #[test]
    fn scan_single_frame() {
        let f = frame(0, &[1, 2, 3, 4, 5, 6, 7, 8, 9], 0);
        let out = scan(f.as_bytes());

        assert_eq!(out.frames, vec![f.clone()]);
        assert_eq!(out.consumed, f.wire_size());
        assert_eq!(out.state, ScanState::Searching);
        assert!(out.remaining(f.as_bytes()).is_empty());
    }

    #[test]
    fn scan_frames_separated_by_noise() {
        let frames: Vec<Frame> = (0..5u8)
            .map(|i| frame(u32::from(i) * 7, &vec![i; usize::from(i) * 3], i))
            .collect();
        let noise: [&[u8]; 5] = [
            &[0x00, 0x11],
            &[],
            &[0xAA, 0xBB, 0xCC, 0x01],
            &[0xFF],
            &[0x12, 0x34, 0x56],
        ];

        let mut wire = Vec::new();
        for (f, junk) in frames.iter().zip(noise) {
            wire.extend_from_slice(junk);
            wire.extend_from_slice(f.as_bytes());
        }
        wire.extend_from_slice(&[0x99, 0x98]);

        let out = scan(&wire);
        assert_eq!(out.frames, frames);
        assert_eq!(out.consumed, wire.len());
    }

    #[test]
    fn scan_retains_truncated_final_frame() {
        let first = frame(1, b"first", 0);
        let last = frame(2, b"second", 1);
        let mut wire = first.as_bytes().to_vec();
        wire.push(0x42);
        let cut = last.wire_size() - 3;
        wire.extend_from_slice(&last.as_bytes()[..cut]);

        let out = scan(&wire);
        assert_eq!(out.frames, vec![first]);
        assert_eq!(out.state, ScanState::PayloadPartial);
        assert_eq!(out.remaining(&wire), &last.as_bytes()[..cut]);
    }

    #[test]
    fn scan_reports_header_partial() {
        let out = scan(&[0x01, 0x02, MAGIC, 5, 0, 0]);
        assert!(out.frames.is_empty());
        assert_eq!(out.state, ScanState::HeaderPartial);
        assert_eq!(out.consumed, 2);
    }

    #[test]
    fn scan_without_marker_consumes_everything() {
        let out = scan(&[0x00, 0x01, 0x02]);
        assert!(out.frames.is_empty());
        assert_eq!(out.state, ScanState::Searching);
        assert_eq!(out.consumed, 3);
    }

    #[test]
    fn scanner_emits_multiple_frames_from_one_chunk() {
        let a = frame(10, b"a", 0);
        let b = frame(11, b"bb", 1);
        let mut wire = a.as_bytes().to_vec();
        wire.extend_from_slice(b.as_bytes());

        let mut scanner = FrameScanner::new();
        let frames = scanner.feed(&wire);
        assert_eq!(frames, vec![a, b]);
        assert!(scanner.buffered().is_empty());
        assert_eq!(scanner.stats().frames, 2);
    }

    #[test]
    fn scanner_waits_for_stray_marker_tail() {
        let f = frame(0, &[0, 0, 0, 0, 2, 3, 0x51, 4, 3], 0);
        let bytes = f.as_bytes();

        let mut scanner = FrameScanner::new();
        assert!(scanner.feed(&bytes[..6]).is_empty());
        assert_eq!(scanner.state(), ScanState::HeaderPartial);
        assert_eq!(scanner.buffered(), &bytes[..6]);

        assert!(scanner.feed(&bytes[6..12]).is_empty());
        assert_eq!(scanner.state(), ScanState::PayloadPartial);

        let frames = scanner.feed(&bytes[12..]);
        assert_eq!(frames, vec![f]);
        assert!(scanner.buffered().is_empty());
    }

    #[test]
    fn scanner_byte_by_byte() {
        let frames: Vec<Frame> = (0..3u8).map(|i| frame(5, &[i; 4], i)).collect();
        let wire: Vec<u8> = frames
            .iter()
            .flat_map(|f| f.as_bytes().to_vec())
            .collect();

        let mut scanner = FrameScanner::new();
        let mut out = Vec::new();
        for byte in &wire {
            out.extend(scanner.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(out, frames);
    }

    #[test]
    fn next_frame_state_transitions() {
        let f = frame(3, b"xyz", 0);
        let mut scanner = FrameScanner::new();

        scanner.push(&[0x10, 0x20]);
        assert!(scanner.next_frame().is_none());
        assert_eq!(scanner.state(), ScanState::Searching);
        assert_eq!(scanner.stats().discarded_bytes, 2);

        scanner.push(f.as_bytes());
        assert_eq!(scanner.next_frame(), Some(f));
        assert_eq!(scanner.state(), ScanState::FrameReady);

        assert!(scanner.next_frame().is_none());
        assert_eq!(scanner.state(), ScanState::Searching);
    }

    #[test]
    fn spurious_marker_is_contained() {
        let before = frame(1, b"before", 0);
        let after = frame(2, b"after", 1);

        // A marker in noise declaring a zero-length payload: the candidate
        // spans 12 bytes, all inside the noise.
        let mut noise = vec![MAGIC, 0x00];
        noise.extend_from_slice(&[0x55; 10]);

        let mut wire = before.as_bytes().to_vec();
        wire.extend_from_slice(&noise);
        wire.extend_from_slice(after.as_bytes());

        let out = scan(&wire);
        assert_eq!(out.frames.len(), 3);
        assert_eq!(out.frames[0], before);
        assert_eq!(out.frames[1].as_bytes(), noise.as_slice());
        assert!(!out.frames[1].has_valid_checksum(0x21));
        assert_eq!(out.frames[2], after);
    }

    #[test]
    fn resync_drops_to_next_marker_when_limit_exceeded() {
        let config = ScannerConfig { resync_limit: 16 };
        let mut scanner = FrameScanner::with_config(config);

        // Marker declaring a 200-byte payload that will never arrive.
        let mut wire = vec![MAGIC, 200, 0, 0, 0, 1, 1, 0, 0, 0];
        wire.extend_from_slice(&[0x00; 10]);
        let f = frame(9, b"ok", 0);
        wire.extend_from_slice(f.as_bytes());

        let frames = scanner.feed(&wire);
        assert_eq!(frames, vec![f]);
        assert_eq!(scanner.stats().resyncs, 1);
        assert!(scanner.buffered().is_empty());
    }

    #[test]
    fn resync_without_second_marker_clears_buffer() {
        let mut scanner = FrameScanner::with_config(ScannerConfig { resync_limit: 8 });
        let mut wire = vec![MAGIC, 100];
        wire.extend_from_slice(&[0x01; 20]);

        assert!(scanner.feed(&wire).is_empty());
        assert!(scanner.buffered().is_empty());
        assert_eq!(scanner.state(), ScanState::Searching);
        assert_eq!(scanner.stats().resyncs, 1);
        assert_eq!(scanner.stats().discarded_bytes, wire.len() as u64);
    }

    #[test]
    fn default_limit_never_drops_in_flight_frame() {
        let mut scanner = FrameScanner::new();
        let f = frame(1, &[0xAB; 255], 0);
        assert_eq!(f.wire_size(), MAX_FRAME_SIZE);

        assert!(scanner.feed(&f.as_bytes()[..MAX_FRAME_SIZE - 1]).is_empty());
        assert_eq!(scanner.state(), ScanState::PayloadPartial);
        assert_eq!(scanner.feed(&f.as_bytes()[MAX_FRAME_SIZE - 1..]), vec![f]);
        assert_eq!(scanner.stats().resyncs, 0);
    }

    #[test]
    fn clear_resets_buffer() {
        let mut scanner = FrameScanner::new();
        scanner.feed(&[MAGIC, 1, 2]);
        assert!(scanner.state().is_partial());
        scanner.clear();
        assert!(scanner.buffered().is_empty());
        assert_eq!(scanner.state(), ScanState::Searching);
    }
}

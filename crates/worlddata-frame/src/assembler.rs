use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::codec::{decode_packet, find_frame_start, Packet, ScannerConfig};

/// Counters kept by a [`FrameAssembler`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Bytes pushed.
    pub bytes: u64,
    /// Frames confirmed and decoded.
    pub packets: u64,
    /// Buffers discarded because the inter-byte gap was too long.
    pub stale_discards: u64,
    /// Buffers discarded because they reached the maximum packet length.
    pub overflow_discards: u64,
}

/// Byte-at-a-time WorldData frame detector, independent of any I/O.
///
/// Each pushed byte goes through the same steps:
/// 1. a non-empty buffer whose last byte is older than `max_byte_age` is
///    discarded;
/// 2. a buffer already holding `max_packet_length` bytes is discarded;
/// 3. the byte is appended and its arrival time recorded;
/// 4. the buffer is scanned left to right for a marker whose trailing
///    checksum matches;
/// 5. on a match the frame is decoded and the whole buffer is cleared.
///
/// Step 5 also drops whatever sat in the buffer ahead of the confirmed
/// frame, such as the start of an earlier frame that never completed.
/// Nothing is carried over into the next frame.
#[derive(Debug)]
pub struct FrameAssembler {
    buf: BytesMut,
    last_byte_at: u64,
    max_byte_age_ms: u64,
    config: ScannerConfig,
    stats: ScanStats,
}

impl FrameAssembler {
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.max_packet_length),
            last_byte_at: 0,
            max_byte_age_ms: u64::try_from(config.max_byte_age.as_millis()).unwrap_or(u64::MAX),
            config,
            stats: ScanStats::default(),
        }
    }

    /// Feed one byte that arrived at `now` (ms since epoch).
    ///
    /// Returns the decoded packet when this byte completed a valid frame.
    pub fn push(&mut self, byte: u8, now: u64) -> Option<Packet> {
        self.stats.bytes += 1;

        let age = now.saturating_sub(self.last_byte_at);
        if !self.buf.is_empty() && age > self.max_byte_age_ms {
            debug!(len = self.buf.len(), age_ms = age, "discarding stale buffer");
            self.stats.stale_discards += 1;
            self.buf.clear();
        }

        if self.buf.len() >= self.config.max_packet_length {
            debug!(
                len = self.buf.len(),
                max = self.config.max_packet_length,
                "discarding buffer at maximum packet length"
            );
            self.stats.overflow_discards += 1;
            self.buf.clear();
        }

        self.last_byte_at = now;
        self.buf.put_u8(byte);

        let start = find_frame_start(
            &self.buf,
            self.config.marker,
            self.config.min_packet_length,
        )?;
        let packet = decode_packet(&self.buf[start..], now);
        trace!(
            start,
            len = self.buf.len() - start,
            packet_type = packet.packet_type,
            serial_prefix = packet.serial_prefix,
            serial_number = packet.serial_number,
            "frame confirmed"
        );

        self.stats.packets += 1;
        self.buf.clear();
        Some(packet)
    }

    /// Bytes currently waiting for a frame to complete.
    pub fn buffered(&self) -> &[u8] {
        &self.buf
    }

    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Drop buffered bytes. Counters are kept.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new(ScannerConfig::default())
    }
}

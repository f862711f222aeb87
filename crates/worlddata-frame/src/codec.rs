use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::crc::{checksum, checksum_range};
use crate::error::{Result, ScanError};

/// Start-of-frame marker: `#`.
pub const MARKER: u8 = b'#';

/// Marker (1) + serial prefix (1) + serial number (2) + reserved (1) + type (1).
pub const HEADER_SIZE: usize = 6;

/// Trailing big-endian CRC-16.
pub const CHECKSUM_SIZE: usize = 2;

/// Bytes in a frame that are not payload.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + CHECKSUM_SIZE;

/// Shortest frame the scanner will confirm.
pub const MIN_PACKET_LENGTH: usize = 10;

/// Longest frame, and the capacity of the accumulation buffer.
pub const MAX_PACKET_LENGTH: usize = 255;

/// Largest gap between two bytes of the same frame.
pub const MAX_BYTE_AGE: Duration = Duration::from_millis(50);

/// A validated WorldData packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet type (offset 5).
    pub packet_type: u8,
    /// Device serial prefix (offset 1).
    pub serial_prefix: u8,
    /// Device serial number, big-endian on the wire (offsets 2-3).
    pub serial_number: u16,
    /// Bytes between the header and the checksum.
    pub payload: Bytes,
    /// Arrival time of the byte that completed the frame, ms since epoch.
    pub received_at: u64,
}

impl Packet {
    /// The total wire size of this packet (header + payload + checksum).
    pub fn wire_size(&self) -> usize {
        FRAME_OVERHEAD + self.payload.len()
    }
}

/// Configuration for the frame scanner.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Start-of-frame marker. Default: `#`.
    pub marker: u8,
    /// Minimum frame length in bytes. Default: 10.
    pub min_packet_length: usize,
    /// Maximum buffered bytes before the buffer is discarded. Default: 255.
    pub max_packet_length: usize,
    /// Maximum gap between consecutive bytes. Default: 50 ms.
    pub max_byte_age: Duration,
    /// Read timeout applied to socket sources.
    pub read_timeout: Option<Duration>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            marker: MARKER,
            min_packet_length: MIN_PACKET_LENGTH,
            max_packet_length: MAX_PACKET_LENGTH,
            max_byte_age: MAX_BYTE_AGE,
            read_timeout: None,
        }
    }
}

impl ScannerConfig {
    /// Check that the lengths describe a frame the decoder can handle.
    pub fn validate(&self) -> Result<()> {
        if self.min_packet_length < FRAME_OVERHEAD {
            return Err(ScanError::InvalidConfig(format!(
                "min_packet_length {} is below the {FRAME_OVERHEAD}-byte frame overhead",
                self.min_packet_length
            )));
        }
        if self.max_packet_length < self.min_packet_length {
            return Err(ScanError::InvalidConfig(format!(
                "max_packet_length {} is below min_packet_length {}",
                self.max_packet_length, self.min_packet_length
            )));
        }
        Ok(())
    }
}

/// Find the left-most marker whose frame, running to the end of `buf`,
/// carries a matching trailing checksum.
///
/// Only starts that leave at least `min_packet_length` bytes are tried.
/// A marker that fails the checksum is skipped.
pub fn find_frame_start(buf: &[u8], marker: u8, min_packet_length: usize) -> Option<usize> {
    let min_packet_length = min_packet_length.max(FRAME_OVERHEAD);
    let last_start = buf.len().checked_sub(min_packet_length)?;
    let received = u16::from_be_bytes([buf[buf.len() - 2], buf[buf.len() - 1]]);

    (0..=last_start).find(|&start| {
        buf[start] == marker && checksum_range(buf, start + 1, buf.len() - start - 3) == received
    })
}

/// Decode a frame that has already been validated.
///
/// `frame` runs from the marker through the checksum. The reserved byte at
/// offset 4 is skipped.
pub fn decode_packet(frame: &[u8], received_at: u64) -> Packet {
    debug_assert!(frame.len() >= FRAME_OVERHEAD);
    Packet {
        serial_prefix: frame[1],
        serial_number: u16::from_be_bytes([frame[2], frame[3]]),
        packet_type: frame[5],
        payload: Bytes::copy_from_slice(&frame[HEADER_SIZE..frame.len() - CHECKSUM_SIZE]),
        received_at,
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────┬────────┬──────────┬──────────┬──────┬─────────┬──────────┐
/// │ '#'    │ Prefix │ Serial   │ Reserved │ Type │ Payload │ CRC-16   │
/// │ 0x23   │ (1B)   │ (2B BE)  │ (1B, 0)  │ (1B) │ (N-8 B) │ (2B BE)  │
/// └────────┴────────┴──────────┴──────────┴──────┴─────────┴──────────┘
/// ```
/// The checksum covers everything between the marker and the checksum.
/// Payloads that would give a frame outside
/// `MIN_PACKET_LENGTH..=MAX_PACKET_LENGTH` are rejected, since no scanner
/// with the default configuration would confirm them.
pub fn encode_frame(
    serial_prefix: u8,
    serial_number: u16,
    packet_type: u8,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    let min = MIN_PACKET_LENGTH - FRAME_OVERHEAD;
    if payload.len() < min {
        return Err(ScanError::PayloadTooShort {
            size: payload.len(),
            min,
        });
    }
    let max = MAX_PACKET_LENGTH - FRAME_OVERHEAD;
    if payload.len() > max {
        return Err(ScanError::PayloadTooLarge {
            size: payload.len(),
            max,
        });
    }

    dst.reserve(FRAME_OVERHEAD + payload.len());
    let start = dst.len();
    dst.put_u8(MARKER);
    dst.put_u8(serial_prefix);
    dst.put_u16(serial_number);
    dst.put_u8(0);
    dst.put_u8(packet_type);
    dst.put_slice(payload);
    let crc = checksum(&dst[start + 1..]);
    dst.put_u16(crc);
    Ok(())
}

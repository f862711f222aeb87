//! Checksum-validated framing for the WorldData telemetry protocol.
//!
//! WorldData devices emit frames on a serial line with no length field:
//! - a `#` marker
//! - serial prefix, big-endian serial number, a reserved byte, packet type
//! - a variable payload
//! - a big-endian CRC-16 over everything between the marker and the CRC
//!
//! The only way to find a frame boundary is to try every marker in the
//! buffer against the trailing checksum. [`FrameAssembler`] does that one
//! byte at a time; [`FrameScanner`] drives it from a blocking reader and
//! notifies listeners.

pub mod assembler;
#[cfg(feature = "async")]
pub mod async_codec;
pub mod clock;
pub mod codec;
pub mod crc;
pub mod error;
pub mod listener;
pub mod scanner;

pub use assembler::{FrameAssembler, ScanStats};
#[cfg(feature = "async")]
pub use async_codec::WorldDataCodec;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{
    decode_packet, encode_frame, find_frame_start, Packet, ScannerConfig, FRAME_OVERHEAD,
    HEADER_SIZE, MARKER, MAX_BYTE_AGE, MAX_PACKET_LENGTH, MIN_PACKET_LENGTH,
};
pub use crc::{checksum, checksum_range};
pub use error::{Result, ScanError};
pub use listener::{ListenerRegistry, PacketListener};
pub use scanner::FrameScanner;

//! `tokio_util` decoder for WorldData streams.
//!
//! Every byte of a read chunk is stamped with the time `decode` runs, so the
//! staleness window is measured between chunks rather than between
//! individual bytes.

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

use crate::assembler::{FrameAssembler, ScanStats};
use crate::clock::{Clock, SystemClock};
use crate::codec::{Packet, ScannerConfig};
use crate::error::ScanError;

/// Decodes WorldData packets from an async byte stream.
///
/// Use with `tokio_util::codec::FramedRead`. Bytes that follow a completed
/// frame in the same chunk stay in the read buffer for the next call.
#[derive(Debug)]
pub struct WorldDataCodec<C = SystemClock> {
    assembler: FrameAssembler,
    clock: C,
}

impl WorldDataCodec {
    pub fn new() -> Self {
        Self::with_config(ScannerConfig::default())
    }

    pub fn with_config(config: ScannerConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for WorldDataCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> WorldDataCodec<C> {
    pub fn with_clock(config: ScannerConfig, clock: C) -> Self {
        Self {
            assembler: FrameAssembler::new(config),
            clock,
        }
    }

    /// Bytes consumed from the stream but not yet part of a packet.
    pub fn buffered_len(&self) -> usize {
        self.assembler.buffered_len()
    }

    pub fn stats(&self) -> ScanStats {
        self.assembler.stats()
    }
}

impl<C: Clock> Decoder for WorldDataCodec<C> {
    type Item = Packet;
    type Error = ScanError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, ScanError> {
        let now = self.clock.now_millis();
        while src.has_remaining() {
            let byte = src.get_u8();
            if let Some(packet) = self.assembler.push(byte, now) {
                return Ok(Some(packet));
            }
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Packet>, ScanError> {
        // Partial frames at EOF are dropped like any other incomplete frame.
        self.decode(src)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use tokio_util::codec::FramedRead;

    use super::*;
    use crate::clock::ManualClock;
    use crate::codec::encode_frame;

    fn wire(frames: &[(u16, &[u8])]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (serial, payload) in frames {
            encode_frame(1, *serial, 5, payload, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn leaves_following_bytes_in_source() {
        let mut codec = WorldDataCodec::with_clock(ScannerConfig::default(), ManualClock::new(0));
        let mut src = BytesMut::from(&wire(&[(1, b"aa"), (2, b"bb")])[..]);

        let first = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(first.serial_number, 1);
        assert_eq!(src.len(), 10);

        let second = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(second.serial_number, 2);
        assert!(src.is_empty());
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn partial_chunk_waits_for_more() {
        let clock = ManualClock::new(0);
        let mut codec = WorldDataCodec::with_clock(ScannerConfig::default(), clock.clone());
        let bytes = wire(&[(3, b"xyz")]);

        let mut src = BytesMut::from(&bytes[..7]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(codec.buffered_len(), 7);

        clock.advance(std::time::Duration::from_millis(10));
        src.extend_from_slice(&bytes[7..]);
        assert_eq!(codec.decode(&mut src).unwrap().unwrap().serial_number, 3);
    }

    #[test]
    fn slow_chunk_discards_partial_frame() {
        let clock = ManualClock::new(0);
        let mut codec = WorldDataCodec::with_clock(ScannerConfig::default(), clock.clone());
        let bytes = wire(&[(3, b"xyz")]);

        let mut src = BytesMut::from(&bytes[..7]);
        assert!(codec.decode(&mut src).unwrap().is_none());

        clock.advance(std::time::Duration::from_millis(200));
        src.extend_from_slice(&bytes[7..]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(codec.stats().stale_discards, 1);
    }

    #[tokio::test]
    async fn framed_read_yields_packets() {
        let mut noisy = vec![0x00, 0xFF, b'#'];
        noisy.extend(wire(&[(10, b"one"), (11, b"two")]));

        let mut framed = FramedRead::new(&noisy[..], WorldDataCodec::new());
        let mut serials = Vec::new();
        while let Some(packet) = framed.next().await {
            serials.push(packet.unwrap().serial_number);
        }
        assert_eq!(serials, vec![10, 11]);
    }
}

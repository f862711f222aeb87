use std::io::{ErrorKind, Read};

use worlddata_transport::ByteStream;

use crate::assembler::{FrameAssembler, ScanStats};
use crate::clock::{Clock, SystemClock};
use crate::codec::{Packet, ScannerConfig};
use crate::error::{Result, ScanError};
use crate::listener::{ListenerRegistry, PacketListener};

/// Reads WorldData packets from any `Read` source, one byte per call.
///
/// The scanner owns its buffer and listener registry. Every mutating call
/// takes `&mut self`, so a scanner has a single writer; move it into a
/// dedicated reader thread and use an `mpsc::Sender<Packet>` listener when
/// packets are consumed elsewhere.
///
/// Read failures leave the buffer untouched, so a caller may swap in a new
/// source with [`set_source`](Self::set_source) and keep going.
pub struct FrameScanner<T, C = SystemClock> {
    inner: T,
    clock: C,
    assembler: FrameAssembler,
    listeners: ListenerRegistry,
}

impl<T: Read> FrameScanner<T> {
    /// Create a scanner with the protocol defaults and the system clock.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ScannerConfig::default())
    }

    /// Create a scanner with explicit configuration.
    pub fn with_config(inner: T, config: ScannerConfig) -> Self {
        Self::with_clock(inner, config, SystemClock)
    }
}

impl<T: Read, C: Clock> FrameScanner<T, C> {
    /// Create a scanner with an explicit arrival-time source.
    pub fn with_clock(inner: T, config: ScannerConfig, clock: C) -> Self {
        Self {
            inner,
            clock,
            assembler: FrameAssembler::new(config),
            listeners: ListenerRegistry::new(),
        }
    }

    /// Register a listener. Listeners are notified in registration order.
    pub fn add_listener(&mut self, listener: impl PacketListener + 'static) {
        self.listeners.add(listener);
    }

    /// Read one byte and process it (blocking).
    ///
    /// Returns `Ok(Some(packet))` when this byte completed a valid frame;
    /// listeners have already been notified by then. Returns `Ok(None)`
    /// while a frame is still accumulating.
    ///
    /// Returns `Err(ScanError::SourceExhausted)` at end-of-stream.
    pub fn read_for_packet(&mut self) -> Result<Option<Packet>> {
        let byte = self.read_byte()?;
        let now = self.clock.now_millis();

        let Some(packet) = self.assembler.push(byte, now) else {
            return Ok(None);
        };
        self.listeners.dispatch(&packet);
        Ok(Some(packet))
    }

    /// Read until the next packet is decoded (blocking).
    pub fn read_packet(&mut self) -> Result<Packet> {
        loop {
            if let Some(packet) = self.read_for_packet()? {
                return Ok(packet);
            }
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Err(ScanError::SourceExhausted),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ScanError::Io(err)),
            }
        }
    }

    /// Replace the byte source, returning the previous one.
    ///
    /// Buffered bytes and listeners are kept; the staleness check discards
    /// the buffer on the next byte if the switch took too long.
    pub fn set_source(&mut self, inner: T) -> T {
        std::mem::replace(&mut self.inner, inner)
    }

    /// Number of bytes waiting for a frame to complete.
    pub fn buffered_len(&self) -> usize {
        self.assembler.buffered_len()
    }

    /// Byte, packet and discard counters.
    pub fn stats(&self) -> ScanStats {
        self.assembler.stats()
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        self.assembler.config()
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the scanner and return the source.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameScanner<ByteStream> {
    /// Create a scanner for a `ByteStream` and apply the read timeout from
    /// config.
    pub fn with_config_stream(inner: ByteStream, config: ScannerConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_scan_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn transport_to_scan_error(err: worlddata_transport::TransportError) -> ScanError {
    match err {
        worlddata_transport::TransportError::Io(io) => ScanError::Io(io),
        worlddata_transport::TransportError::Open { source, .. }
        | worlddata_transport::TransportError::Connect { source, .. } => ScanError::Io(source),
        other => ScanError::Io(std::io::Error::other(other.to_string())),
    }
}

impl<T, C> std::fmt::Debug for FrameScanner<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScanner")
            .field("assembler", &self.assembler)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

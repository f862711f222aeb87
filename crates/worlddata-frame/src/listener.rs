//! Packet notification targets.

use std::sync::mpsc;

use tracing::debug;

use crate::codec::Packet;

/// Receives every packet a scanner decodes.
///
/// The packet is only borrowed for the duration of the call; clone it to
/// keep it.
pub trait PacketListener: Send {
    fn packet_received(&mut self, packet: &Packet);
}

impl<F> PacketListener for F
where
    F: FnMut(&Packet) + Send,
{
    fn packet_received(&mut self, packet: &Packet) {
        self(packet)
    }
}

/// Forwards packets to another thread.
///
/// A disconnected receiver is not an error for the scanner; the packet is
/// dropped.
impl PacketListener for mpsc::Sender<Packet> {
    fn packet_received(&mut self, packet: &Packet) {
        if self.send(packet.clone()).is_err() {
            debug!("packet receiver dropped, discarding packet");
        }
    }
}

/// Listeners in registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Vec<Box<dyn PacketListener>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: impl PacketListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Notify every listener, first registered first.
    pub fn dispatch(&mut self, packet: &Packet) {
        for listener in &mut self.listeners {
            listener.packet_received(packet);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bytes::Bytes;

    use super::*;

    fn packet(serial_number: u16) -> Packet {
        Packet {
            packet_type: 1,
            serial_prefix: 2,
            serial_number,
            payload: Bytes::from_static(b"p"),
            received_at: 0,
        }
    }

    #[test]
    fn dispatches_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::new();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            registry.add(move |p: &Packet| log.lock().unwrap().push((name, p.serial_number)));
        }

        registry.dispatch(&packet(7));
        assert_eq!(
            *log.lock().unwrap(),
            vec![("first", 7), ("second", 7), ("third", 7)]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn sender_forwards_clone() {
        let (tx, rx) = mpsc::channel();
        let mut registry = ListenerRegistry::new();
        registry.add(tx);

        registry.dispatch(&packet(11));
        assert_eq!(rx.recv().unwrap().serial_number, 11);
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (tx, rx) = mpsc::channel::<Packet>();
        drop(rx);
        let mut registry = ListenerRegistry::new();
        registry.add(tx);
        registry.dispatch(&packet(1));
    }

    #[test]
    fn empty_registry_dispatch_is_noop() {
        let mut registry = ListenerRegistry::new();
        assert!(registry.is_empty());
        registry.dispatch(&packet(1));
    }
}

//! Validated WorldData telemetry packets from serial and network streams.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte sources (stdin, capture files, device nodes, sockets)
//! - [`frame`]: Checksum-validated frame scanning and packet decoding
//!
//! ```no_run
//! use worlddata::frame::{FrameScanner, Packet};
//! use worlddata::transport::Endpoint;
//!
//! let stream = "/dev/ttyUSB0".parse::<Endpoint>()?.open()?;
//! let mut scanner = FrameScanner::new(stream);
//! scanner.add_listener(|p: &Packet| println!("{} {:?}", p.serial_number, p.payload));
//! loop {
//!     scanner.read_for_packet()?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use worlddata_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use worlddata_frame::*;
}

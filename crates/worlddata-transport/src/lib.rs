//! Byte sources for WorldData readers.
//!
//! The framing layer only needs something that implements [`std::io::Read`].
//! This crate turns an endpoint string into such a source:
//! - `-` for stdin
//! - `tcp://host:port` for a TCP client connection
//! - `unix:///path/to.sock` for a Unix stream socket
//! - anything else as a filesystem path (capture file or serial device node)
//!
//! Serial line settings (baud rate, parity) are expected to be configured
//! outside this crate, e.g. with `stty`. Reconnection is left to the caller.

pub mod endpoint;
pub mod error;
pub mod stream;

pub use endpoint::Endpoint;
pub use error::{Result, TransportError};
pub use stream::ByteStream;

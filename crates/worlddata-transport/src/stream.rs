use std::io::{BufReader, Read};
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// An open byte source. Implements `Read`.
///
/// Returned by [`Endpoint::open`](crate::Endpoint::open). Every variant is a
/// blocking reader; the frame scanner pulls one byte at a time from it.
/// Files and device nodes are buffered. Sockets are read directly so a read
/// timeout fires on the socket itself.
pub struct ByteStream {
    inner: ByteStreamInner,
}

enum ByteStreamInner {
    Stdin(std::io::Stdin),
    File(BufReader<std::fs::File>),
    Tcp(std::net::TcpStream),
    #[cfg(unix)]
    Unix(std::os::unix::net::UnixStream),
}

impl Read for ByteStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            ByteStreamInner::Stdin(stdin) => stdin.read(buf),
            ByteStreamInner::File(file) => file.read(buf),
            ByteStreamInner::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.read(buf),
        }
    }
}

impl ByteStream {
    pub(crate) fn from_stdin(stdin: std::io::Stdin) -> Self {
        Self {
            inner: ByteStreamInner::Stdin(stdin),
        }
    }

    /// Wrap an already opened file or device node.
    pub fn from_file(file: std::fs::File) -> Self {
        Self {
            inner: ByteStreamInner::File(BufReader::new(file)),
        }
    }

    /// Wrap a connected TCP stream.
    pub fn from_tcp(stream: std::net::TcpStream) -> Self {
        Self {
            inner: ByteStreamInner::Tcp(stream),
        }
    }

    /// Wrap a connected Unix stream socket.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: ByteStreamInner::Unix(stream),
        }
    }

    /// Set a read timeout on socket-backed streams.
    ///
    /// Stdin and files have no portable read timeout; for those this is a
    /// no-op and reads keep blocking.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            ByteStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            ByteStreamInner::Unix(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            ByteStreamInner::Stdin(_) | ByteStreamInner::File(_) => {
                debug!(kind = self.kind(), "read timeout not supported, ignoring");
                Ok(())
            }
        }
    }

    /// Short name of the underlying source kind.
    pub fn kind(&self) -> &'static str {
        match &self.inner {
            ByteStreamInner::Stdin(_) => "stdin",
            ByteStreamInner::File(_) => "file",
            ByteStreamInner::Tcp(_) => "tcp",
            #[cfg(unix)]
            ByteStreamInner::Unix(_) => "unix",
        }
    }
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream")
            .field("type", &self.kind())
            .finish()
    }
}

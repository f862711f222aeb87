use std::fmt;
use std::net::TcpStream;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::info;

use crate::error::{Result, TransportError};
use crate::stream::ByteStream;

const TCP_SCHEME: &str = "tcp://";
const UNIX_SCHEME: &str = "unix://";

/// Where WorldData bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Standard input of this process.
    Stdin,
    /// A capture file or character device such as `/dev/ttyUSB0`.
    Path(PathBuf),
    /// A TCP server streaming raw bytes (serial-to-network bridges).
    Tcp(String),
    /// A Unix stream socket.
    #[cfg(unix)]
    Unix(PathBuf),
}

impl Endpoint {
    /// Open the endpoint for blocking reads.
    pub fn open(&self) -> Result<ByteStream> {
        let stream = match self {
            Endpoint::Stdin => ByteStream::from_stdin(std::io::stdin()),
            Endpoint::Path(path) => {
                let file = std::fs::File::open(path).map_err(|source| TransportError::Open {
                    path: path.clone(),
                    source,
                })?;
                ByteStream::from_file(file)
            }
            Endpoint::Tcp(addr) => {
                let stream =
                    TcpStream::connect(addr.as_str()).map_err(|source| TransportError::Connect {
                        addr: addr.clone(),
                        source,
                    })?;
                ByteStream::from_tcp(stream)
            }
            #[cfg(unix)]
            Endpoint::Unix(path) => {
                let stream = std::os::unix::net::UnixStream::connect(path).map_err(|source| {
                    TransportError::Connect {
                        addr: path.display().to_string(),
                        source,
                    }
                })?;
                ByteStream::from_unix(stream)
            }
        };

        info!(endpoint = %self, "opened byte source");
        Ok(stream)
    }

    /// Whether reads on this endpoint honour a read timeout.
    pub fn supports_read_timeout(&self) -> bool {
        match self {
            Endpoint::Stdin | Endpoint::Path(_) => false,
            Endpoint::Tcp(_) => true,
            #[cfg(unix)]
            Endpoint::Unix(_) => true,
        }
    }
}

impl FromStr for Endpoint {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| TransportError::InvalidEndpoint {
            endpoint: s.to_string(),
            reason: reason.to_string(),
        };

        if s.is_empty() {
            return Err(invalid("endpoint must not be empty"));
        }
        if s == "-" {
            return Ok(Endpoint::Stdin);
        }
        if let Some(addr) = s.strip_prefix(TCP_SCHEME) {
            if addr.rsplit_once(':').is_none_or(|(host, port)| {
                host.is_empty() || port.parse::<u16>().is_err()
            }) {
                return Err(invalid("expected tcp://host:port"));
            }
            return Ok(Endpoint::Tcp(addr.to_string()));
        }
        if let Some(path) = s.strip_prefix(UNIX_SCHEME) {
            if path.is_empty() {
                return Err(invalid("expected unix:///path/to.sock"));
            }
            #[cfg(unix)]
            return Ok(Endpoint::Unix(PathBuf::from(path)));
            #[cfg(not(unix))]
            return Err(invalid("unix sockets are not supported on this platform"));
        }
        if s.contains("://") {
            return Err(invalid("unsupported scheme"));
        }
        Ok(Endpoint::Path(PathBuf::from(s)))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Stdin => write!(f, "-"),
            Endpoint::Path(path) => write!(f, "{}", path.display()),
            Endpoint::Tcp(addr) => write!(f, "{TCP_SCHEME}{addr}"),
            #[cfg(unix)]
            Endpoint::Unix(path) => write!(f, "{UNIX_SCHEME}{}", path.display()),
        }
    }
}

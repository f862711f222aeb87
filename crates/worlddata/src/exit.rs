use std::fmt;
use std::io;

use worlddata_frame::ScanError;
use worlddata_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;
pub const INTERRUPTED: i32 = 130;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::ConnectionRefused => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, .. }
        | TransportError::Connect { source, .. }
        | TransportError::Io(source) => io_error(context, source),
        TransportError::InvalidEndpoint { .. } => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
    }
}

pub fn scan_error(context: &str, err: ScanError) -> CliError {
    match err {
        ScanError::Io(source) => io_error(context, source),
        ScanError::SourceExhausted => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        ScanError::PayloadTooLarge { .. } | ScanError::PayloadTooShort { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        ScanError::InvalidConfig(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}

pub fn hex_error(context: &str, err: hex::FromHexError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_exit_codes() {
        let denied = io_error("open", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(denied.code, PERMISSION_DENIED);

        let timed_out = io_error("read", io::Error::from(io::ErrorKind::TimedOut));
        assert_eq!(timed_out.code, TIMEOUT);
        assert!(timed_out.message.starts_with("read: "));
    }

    #[test]
    fn scan_errors_map_to_exit_codes() {
        let cfg = scan_error("config", ScanError::InvalidConfig("bad".into()));
        assert_eq!(cfg.code, USAGE);

        let big = scan_error(
            "encode",
            ScanError::PayloadTooLarge {
                size: 300,
                max: 247,
            },
        );
        assert_eq!(big.code, DATA_INVALID);

        let short = scan_error("encode", ScanError::PayloadTooShort { size: 1, min: 2 });
        assert_eq!(short.code, DATA_INVALID);

        let eof = scan_error("read", ScanError::SourceExhausted);
        assert_eq!(eof.code, TRANSPORT_ERROR);
    }

    #[test]
    fn invalid_endpoint_is_usage() {
        let err = "udp://x:1".parse::<worlddata_transport::Endpoint>().unwrap_err();
        assert_eq!(transport_error("endpoint", err).code, USAGE);
    }
}

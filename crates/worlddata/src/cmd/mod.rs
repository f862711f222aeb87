use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod checksum;
pub mod encode;
pub mod listen;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read a byte source and print decoded packets.
    Listen(ListenArgs),
    /// Print the frame checksum of hex-encoded bytes.
    Crc(CrcArgs),
    /// Build a frame from header fields and a payload.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Listen(args) => listen::run(args, format),
        Command::Crc(args) => checksum::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Byte source: `-` (stdin), a file or device path, tcp://host:port, unix:///path.
    pub endpoint: String,
    /// Exit after receiving N packets.
    #[arg(long)]
    pub count: Option<usize>,
    /// Maximum gap between bytes of one frame, in milliseconds.
    #[arg(long, default_value = "50")]
    pub max_byte_age: u64,
    /// Bytes buffered before an unterminated frame is discarded.
    #[arg(long, default_value = "255")]
    pub max_packet_length: usize,
    /// Read timeout for socket sources (e.g. 1s, 250ms).
    #[arg(long)]
    pub read_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct CrcArgs {
    /// Bytes to checksum, hex-encoded (whitespace and ':' are ignored).
    pub hex: String,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Serial prefix byte.
    #[arg(long)]
    pub prefix: u8,
    /// Serial number.
    #[arg(long)]
    pub serial: u16,
    /// Packet type byte.
    #[arg(long = "packet-type", short = 't')]
    pub packet_type: u8,
    /// Payload, hex-encoded (at least 2 bytes).
    #[arg(long)]
    pub payload: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub(crate) fn parse_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let cleaned: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    let cleaned = cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
        .unwrap_or(&cleaned);
    hex::decode(cleaned)
}

pub(crate) fn parse_duration(input: &str) -> CliResult<std::time::Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        std::time::Duration::from_millis(value)
    } else {
        std::time::Duration::from_secs(value)
    })
}

use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use worlddata_frame::{FrameScanner, Packet, ScanError, ScannerConfig};
use worlddata_transport::Endpoint;

use crate::cmd::{parse_duration, ListenArgs};
use crate::exit::{
    scan_error, transport_error, CliError, CliResult, INTERNAL, INTERRUPTED, SUCCESS,
};
use crate::output::{print_packet, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let endpoint: Endpoint = args
        .endpoint
        .parse()
        .map_err(|err| transport_error("invalid endpoint", err))?;
    let config = scanner_config(&args, &endpoint)?;

    let stream = endpoint
        .open()
        .map_err(|err| transport_error("open failed", err))?;
    let mut scanner = FrameScanner::with_config_stream(stream, config)
        .map_err(|err| scan_error("configure failed", err))?;
    scanner.add_listener(move |packet: &Packet| print_packet(packet, format));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut received = 0usize;

    while running.load(Ordering::SeqCst) {
        match scanner.read_for_packet() {
            Ok(Some(_)) => {
                received = received.saturating_add(1);
                if let Some(count) = args.count {
                    if received >= count {
                        break;
                    }
                }
            }
            Ok(None) => {}
            Err(ScanError::SourceExhausted) => {
                debug!(%endpoint, "byte source exhausted");
                break;
            }
            Err(ScanError::Io(err))
                if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
            {
                continue;
            }
            Err(err) => return Err(scan_error("read failed", err)),
        }
    }

    let stats = scanner.stats();
    info!(
        %endpoint,
        bytes = stats.bytes,
        packets = stats.packets,
        stale_discards = stats.stale_discards,
        overflow_discards = stats.overflow_discards,
        buffered = scanner.buffered_len(),
        "listen finished"
    );

    Ok(SUCCESS)
}

fn scanner_config(args: &ListenArgs, endpoint: &Endpoint) -> CliResult<ScannerConfig> {
    let mut read_timeout = args
        .read_timeout
        .as_deref()
        .map(parse_duration)
        .transpose()?;
    if read_timeout.is_some() && !endpoint.supports_read_timeout() {
        warn!(%endpoint, "read timeout only applies to socket endpoints; ignoring");
        read_timeout = None;
    }
    let config = ScannerConfig {
        max_byte_age: Duration::from_millis(args.max_byte_age),
        max_packet_length: args.max_packet_length,
        read_timeout,
        ..ScannerConfig::default()
    };
    config
        .validate()
        .map_err(|err| scan_error("invalid scanner options", err))?;
    Ok(config)
}

/// First Ctrl-C stops after the current byte; a second one exits at once,
/// since a quiet device can keep the read blocked indefinitely.
fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        if !running.swap(false, Ordering::SeqCst) {
            std::process::exit(INTERRUPTED);
        }
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

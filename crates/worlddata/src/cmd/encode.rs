use serde::Serialize;
use worlddata_frame::encode_frame;

use crate::cmd::{parse_hex, EncodeArgs};
use crate::exit::{hex_error, scan_error, CliResult, SUCCESS};
use crate::output::{print_raw, OutputFormat};

#[derive(Serialize)]
struct EncodeOutput {
    length: usize,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = parse_hex(&args.payload).map_err(|err| hex_error("invalid payload", err))?;
    let frame = build_frame(&args, &payload)?;

    match format {
        OutputFormat::Raw => print_raw(&frame),
        OutputFormat::Json => {
            let out = EncodeOutput {
                length: frame.len(),
                frame: hex::encode(&frame),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", hex::encode(&frame)),
    }

    Ok(SUCCESS)
}

fn build_frame(args: &EncodeArgs, payload: &[u8]) -> CliResult<Vec<u8>> {
    let mut buf = Default::default();
    encode_frame(args.prefix, args.serial, args.packet_type, payload, &mut buf)
        .map_err(|err| scan_error("encode failed", err))?;
    Ok(buf.to_vec())
}

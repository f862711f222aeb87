use serde::Serialize;
use worlddata_frame::checksum;

use crate::cmd::{parse_hex, CrcArgs};
use crate::exit::{hex_error, CliResult, SUCCESS};
use crate::output::OutputFormat;

#[derive(Serialize)]
struct CrcOutput {
    length: usize,
    crc: String,
    bytes: [String; 2],
}

pub fn run(args: CrcArgs, format: OutputFormat) -> CliResult<i32> {
    let data = parse_hex(&args.hex).map_err(|err| hex_error("invalid hex input", err))?;
    let crc = checksum(&data);

    match format {
        OutputFormat::Json => {
            let [hi, lo] = crc.to_be_bytes();
            let out = CrcOutput {
                length: data.len(),
                crc: format!("0x{crc:04x}"),
                bytes: [format!("{hi:02x}"), format!("{lo:02x}")],
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Raw => crate::output::print_raw(&crc.to_be_bytes()),
        OutputFormat::Table | OutputFormat::Pretty => println!("0x{crc:04x}"),
    }

    Ok(SUCCESS)
}

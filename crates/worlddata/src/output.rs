use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use worlddata_frame::Packet;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PacketOutput {
    packet_type: u8,
    serial_prefix: u8,
    serial_number: u16,
    payload_size: usize,
    payload: String,
    received_at: u64,
}

impl From<&Packet> for PacketOutput {
    fn from(packet: &Packet) -> Self {
        Self {
            packet_type: packet.packet_type,
            serial_prefix: packet.serial_prefix,
            serial_number: packet.serial_number,
            payload_size: packet.payload.len(),
            payload: hex::encode(&packet.payload),
            received_at: packet.received_at,
        }
    }
}

pub fn print_packet(packet: &Packet, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", packet_json(packet));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["TYPE", "PREFIX", "SERIAL", "SIZE", "PAYLOAD", "RECEIVED"])
                .add_row(vec![
                    packet.packet_type.to_string(),
                    packet.serial_prefix.to_string(),
                    packet.serial_number.to_string(),
                    packet.payload.len().to_string(),
                    hex::encode(&packet.payload),
                    packet.received_at.to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} prefix={} serial={} size={} payload={} received_at={}",
                packet.packet_type,
                packet.serial_prefix,
                packet.serial_number,
                packet.payload.len(),
                hex::encode(&packet.payload),
                packet.received_at
            );
        }
        OutputFormat::Raw => {
            print_raw(packet.payload.as_ref());
        }
    }
}

pub fn packet_json(packet: &Packet) -> String {
    serde_json::to_string(&PacketOutput::from(packet)).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

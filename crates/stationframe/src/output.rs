use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use stationframe_frame::{DataType, Frame, FramePacket, PacketKind};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
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

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PacketOutput {
    pub index: usize,
    pub kind: &'static str,
    pub data_type: Option<&'static str>,
    pub code: Option<u16>,
    pub offset: usize,
    pub size: usize,
    pub payload: String,
}

impl PacketOutput {
    pub fn new(index: usize, offset: usize, packet: &FramePacket<'_>) -> Self {
        let (kind, data_type, code) = match packet.kind() {
            PacketKind::Full => {
                let data_type = packet.data_type();
                ("full", Some(data_type.name()), registered_code(data_type))
            }
            PacketKind::Half => ("half", None, None),
        };
        Self {
            index,
            kind,
            data_type,
            code,
            offset,
            size: packet.len(),
            payload: hex::encode_upper(packet.payload()),
        }
    }
}

/// One row per packet, with offsets into the decoded buffer.
pub fn packet_rows(packets: &[FramePacket<'_>]) -> Vec<PacketOutput> {
    let mut offset = 0usize;
    packets
        .iter()
        .enumerate()
        .map(|(index, packet)| {
            let row = PacketOutput::new(index, offset, packet);
            offset += packet.len();
            row
        })
        .collect()
}

pub fn print_packets(packets: &[FramePacket<'_>], format: OutputFormat) {
    if format == OutputFormat::Raw {
        for packet in packets.iter().filter(|p| p.is_full()) {
            print_raw(packet.payload());
        }
        return;
    }

    let rows = packet_rows(packets);
    match format {
        OutputFormat::Json => {
            for row in &rows {
                print_json(row);
            }
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["#", "KIND", "TYPE", "OFFSET", "SIZE", "PAYLOAD"]);
            for row in &rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.kind.to_string(),
                    type_label(row.data_type, row.code),
                    row.offset.to_string(),
                    row.size.to_string(),
                    row.payload.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in &rows {
                println!(
                    "#{} {} type={} offset={} size={} payload={}",
                    row.index,
                    row.kind,
                    type_label(row.data_type, row.code),
                    row.offset,
                    row.size,
                    row.payload
                );
            }
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    data_type: &'a str,
    code: Option<u16>,
    size: usize,
    payload: String,
}

pub fn print_frame(frame: &Frame, format: OutputFormat) {
    let out = FrameOutput {
        data_type: frame.data_type.name(),
        code: registered_code(frame.data_type),
        size: frame.wire_size(),
        payload: hex::encode_upper(&frame.payload),
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = new_table(vec!["TYPE", "SIZE", "PAYLOAD"]);
            table.add_row(vec![
                type_label(Some(out.data_type), out.code),
                out.size.to_string(),
                out.payload,
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "type={} size={} payload={}",
                type_label(Some(out.data_type), out.code),
                out.size,
                out.payload
            );
        }
        OutputFormat::Raw => print_raw(frame.payload.as_ref()),
    }
}

#[derive(Serialize)]
struct TypeOutput {
    name: &'static str,
    code: u16,
    description: &'static str,
}

pub fn print_types(format: OutputFormat) {
    let rows = DataType::ALL.iter().map(|t| TypeOutput {
        name: t.name(),
        code: t.code(),
        description: t.description(),
    });
    match format {
        OutputFormat::Json => {
            let rows: Vec<TypeOutput> = rows.collect();
            print_json(&rows);
        }
        OutputFormat::Table => {
            let mut table = new_table(vec!["CODE", "NAME", "DESCRIPTION"]);
            for row in rows {
                table.add_row(vec![
                    format!("0x{:04X}", row.code),
                    row.name.to_string(),
                    row.description.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for row in rows {
                println!("0x{:04X} {} ({})", row.code, row.name, row.description);
            }
        }
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

// Unregistered wire codes all resolve to Unknown, so its sentinel code says
// nothing about the frame and is left out.
fn registered_code(data_type: DataType) -> Option<u16> {
    (!data_type.is_unknown()).then(|| data_type.code())
}

fn type_label(name: Option<&str>, code: Option<u16>) -> String {
    match (name, code) {
        (Some(name), Some(code)) => format!("{name} (0x{code:04X})"),
        (Some(name), None) => name.to_string(),
        _ => "-".to_string(),
    }
}

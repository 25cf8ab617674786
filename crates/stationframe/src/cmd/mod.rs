use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{Args, Subcommand};
use stationframe_frame::{
    ByteOrder, DataType, FrameConfig, DEFAULT_LENGTH_FIELD_OFFSET, DEFAULT_LENGTH_FIELD_WIDTH,
    DEFAULT_TYPE_FIELD_OFFSET,
};

use crate::exit::{frame_error, io_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod follow;
pub mod types;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a capture into frames and half data in one pass.
    Decode(DecodeArgs),
    /// Stream a capture and print frames as they complete.
    Follow(FollowArgs),
    /// Build a frame from a type code and body.
    Encode(EncodeArgs),
    /// List the known data types.
    Types,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Follow(args) => follow::run(args, format),
        Command::Encode(args) => encode::run(args, format),
        Command::Types => types::run(format),
        Command::Version(args) => version::run(args),
    }
}

/// Header layout flags shared by every command that touches the wire.
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Frame magic header as hex.
    #[arg(long, value_name = "HEX", env = "STATIONFRAME_MAGIC", default_value = "55AA55AA")]
    pub magic: HexBytes,
    /// Offset of the 2-byte data type field.
    #[arg(long, env = "STATIONFRAME_TYPE_OFFSET", default_value_t = DEFAULT_TYPE_FIELD_OFFSET)]
    pub type_offset: usize,
    /// Offset of the length field.
    #[arg(long, env = "STATIONFRAME_LENGTH_OFFSET", default_value_t = DEFAULT_LENGTH_FIELD_OFFSET)]
    pub length_offset: usize,
    /// Width of the length field in bytes (1, 2, 4 or 8).
    #[arg(long, env = "STATIONFRAME_LENGTH_WIDTH", default_value_t = DEFAULT_LENGTH_FIELD_WIDTH)]
    pub length_width: usize,
    /// Read header fields as little endian.
    #[arg(long)]
    pub little_endian: bool,
}

impl LayoutArgs {
    pub fn frame_config(&self) -> CliResult<FrameConfig> {
        let config = FrameConfig {
            magic: self.magic.0.clone(),
            type_field_offset: self.type_offset,
            length_field_offset: self.length_offset,
            length_field_width: self.length_width,
            byte_order: if self.little_endian {
                ByteOrder::LittleEndian
            } else {
                ByteOrder::BigEndian
            },
        };
        config
            .validate()
            .map_err(|err| frame_error("invalid frame layout", err))?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Capture file to decode ("-" or omitted: stdin).
    #[arg(conflicts_with = "hex")]
    pub path: Option<PathBuf>,
    /// Decode a hex string instead of a file.
    #[arg(long, value_name = "HEX")]
    pub hex: Option<HexBytes>,
    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args, Debug)]
pub struct FollowArgs {
    /// Capture file or FIFO to follow ("-" or omitted: stdin).
    pub path: Option<PathBuf>,
    /// Bytes requested per read.
    #[arg(long, default_value_t = 8 * 1024)]
    pub chunk_size: usize,
    /// Maximum bytes held while waiting for the rest of a frame.
    #[arg(long, default_value_t = 1024 * 1024)]
    pub max_pending: usize,
    /// Exit after printing N frames.
    #[arg(long)]
    pub count: Option<usize>,
    /// Only print frames of these types (names or codes, comma-separated).
    #[arg(long = "type", value_name = "TYPE", value_delimiter = ',')]
    pub types: Option<Vec<TypeCode>>,
    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Data type name (e.g. STATUS_DATA) or code (e.g. 0x00A0).
    #[arg(long = "type", value_name = "TYPE")]
    pub data_type: TypeCode,
    /// Frame body as hex.
    #[arg(long, value_name = "HEX", conflicts_with = "data")]
    pub hex: Option<HexBytes>,
    /// Frame body as a UTF-8 string.
    #[arg(long)]
    pub data: Option<String>,
    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Bytes given on the command line as hex. Whitespace, `:` and a leading
/// `0x` are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl FromStr for HexBytes {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let digits: String = trimmed
            .chars()
            .filter(|c| !c.is_ascii_whitespace() && *c != ':')
            .collect();
        hex::decode(&digits)
            .map(HexBytes)
            .map_err(|err| format!("invalid hex: {err}"))
    }
}

/// A data type given by protocol name or numeric code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeCode(pub u16);

impl TypeCode {
    pub fn data_type(self) -> DataType {
        DataType::from_code(self.0)
    }
}

impl FromStr for TypeCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(data_type) = DataType::ALL
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
        {
            return Ok(TypeCode(data_type.code()));
        }
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => s.parse::<u16>(),
        };
        parsed
            .map(TypeCode)
            .map_err(|_| format!("unknown data type '{s}' (use a name from `types` or a 16-bit code)"))
    }
}

/// Open a file, or stdin for `None` / `-`.
pub fn open_input(path: Option<&Path>) -> CliResult<Box<dyn Read>> {
    match path {
        None => Ok(Box::new(io::stdin())),
        Some(path) if path == Path::new("-") => Ok(Box::new(io::stdin())),
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("open {}", path.display()), err))?;
            Ok(Box::new(file))
        }
    }
}

pub fn read_all(path: Option<&Path>) -> CliResult<Vec<u8>> {
    let mut input = open_input(path)?;
    let mut data = Vec::new();
    input
        .read_to_end(&mut data)
        .map_err(|err| io_error("read input", err))?;
    Ok(data)
}

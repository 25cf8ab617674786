use stationframe_frame::FrameDecoder;

use crate::cmd::{read_all, DecodeArgs};
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_packets, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let decoder = FrameDecoder::with_config(args.layout.frame_config()?);

    let data = match args.hex {
        Some(hex) => hex.0,
        None => read_all(args.path.as_deref())?,
    };

    let packets = decoder
        .decode(&data)
        .map_err(|err| frame_error("decode failed", err))?;

    let full = packets.iter().filter(|p| p.is_full()).count();
    tracing::info!(
        bytes = data.len(),
        packets = packets.len(),
        full,
        half = packets.len() - full,
        "decoded buffer"
    );

    print_packets(&packets, format);
    Ok(SUCCESS)
}

use bytes::BytesMut;
use stationframe_frame::encode_frame;

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliResult, SUCCESS};
use crate::output::{print_json, print_raw, OutputFormat};

#[derive(serde::Serialize)]
struct EncodedOutput {
    data_type: &'static str,
    code: u16,
    size: usize,
    frame: String,
}

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.layout.frame_config()?;
    let body = match (args.hex, args.data) {
        (Some(hex), _) => hex.0,
        (None, Some(data)) => data.into_bytes(),
        (None, None) => Vec::new(),
    };

    let mut wire = BytesMut::new();
    encode_frame(&config, args.data_type.0, &body, &mut wire)
        .map_err(|err| frame_error("encode failed", err))?;

    let data_type = args.data_type.data_type();
    if data_type.is_unknown() {
        tracing::warn!(code = args.data_type.0, "type code is not in the registry");
    }

    match format {
        OutputFormat::Raw => print_raw(&wire),
        OutputFormat::Json => print_json(&EncodedOutput {
            data_type: data_type.name(),
            code: args.data_type.0,
            size: wire.len(),
            frame: hex::encode_upper(&wire),
        }),
        OutputFormat::Table | OutputFormat::Pretty => println!("{}", hex::encode_upper(&wire)),
    }
    Ok(SUCCESS)
}

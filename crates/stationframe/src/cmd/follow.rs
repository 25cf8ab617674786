use stationframe_frame::{FrameError, FrameReader, ReaderConfig};

use crate::cmd::{open_input, FollowArgs};
use crate::exit::{frame_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: FollowArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk_size == 0 {
        return Err(CliError::usage("--chunk-size must be greater than zero"));
    }

    let frame_config = args.layout.frame_config()?;
    let input = open_input(args.path.as_deref())?;
    let reader_config = ReaderConfig {
        max_pending: args.max_pending,
        chunk_size: args.chunk_size,
    };
    let mut reader = FrameReader::with_config(input, frame_config, reader_config);

    let mut printed = 0usize;
    loop {
        let frame = match reader.read_frame() {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => {
                if !reader.pending().is_empty() {
                    tracing::warn!(
                        pending = reader.pending().len(),
                        "input ended with an incomplete frame"
                    );
                }
                return Ok(SUCCESS);
            }
            Err(err) => return Err(frame_error("follow failed", err)),
        };

        if let Some(types) = &args.types {
            if !types.iter().any(|t| t.data_type() == frame.data_type) {
                tracing::debug!(data_type = %frame.data_type, "frame filtered");
                continue;
            }
        }

        print_frame(&frame, format);
        printed = printed.saturating_add(1);

        if let Some(count) = args.count {
            if printed >= count {
                return Ok(SUCCESS);
            }
        }
    }
}

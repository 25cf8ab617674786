//! Frame splitting for VLF/LF field station byte streams.
//!
//! stationframe locates `55 AA 55 AA` frame headers in raw link data, cuts
//! complete frames by their length field and tags them with the station data
//! type. Everything else is returned as half data for the caller to retry
//! once more bytes arrive.
//!
//! # Crate Structure
//!
//! - [`frame`] — Data type registry, frame splitter, encoder and stream reader
//!
//! The `stationframe` binary (behind the `cli` feature) decodes captures from
//! files, stdin or hex strings.

/// Re-export frame types.
pub mod frame {
    pub use stationframe_frame::*;
}

pub use stationframe_frame::{decode, DataType, FrameDecoder, FrameError, FramePacket};

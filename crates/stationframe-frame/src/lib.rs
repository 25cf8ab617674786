//! Magic-header frame splitting for VLF/LF field station links.
//!
//! Station links deliver a raw byte stream in arbitrary chunks. Every frame
//! starts with:
//! - A 4-byte magic header (`55 AA 55 AA`) for resynchronization
//! - A 2-byte big-endian data type code
//! - A big-endian length field holding the total frame size, header included
//!
//! [`FrameDecoder::decode`] classifies every byte of a buffer as either a
//! complete frame or half data, borrowing from the input. Nothing is carried
//! between calls; [`FrameReader`] does that for `Read` streams.

pub mod codec;
pub mod data_type;
pub mod decoder;
pub mod error;
pub mod packet;
pub mod reader;

pub use codec::{
    encode_frame, ByteOrder, Frame, FrameConfig, DEFAULT_LENGTH_FIELD_OFFSET,
    DEFAULT_LENGTH_FIELD_WIDTH, DEFAULT_TYPE_FIELD_OFFSET, HEADER_SIZE, MAGIC,
};
pub use data_type::DataType;
pub use decoder::{decode, find_frame_header, FrameDecoder};
pub use error::{FrameError, Result};
pub use packet::{FramePacket, PacketKind};
pub use reader::{FrameReader, ReaderConfig};

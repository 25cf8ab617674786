use bytes::Bytes;

use crate::codec::Frame;
use crate::data_type::DataType;

/// Whether a packet is a whole frame or bytes still waiting for more input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    Full,
    Half,
}

/// One classified byte range of a decoded buffer.
///
/// Payloads borrow from the buffer passed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePacket<'a> {
    /// A complete frame, magic header through the declared length.
    Full {
        data_type: DataType,
        payload: &'a [u8],
    },
    /// Noise before a header, or a frame cut short by the end of the buffer.
    Half { payload: &'a [u8] },
}

impl<'a> FramePacket<'a> {
    pub fn full(data_type: DataType, payload: &'a [u8]) -> Self {
        FramePacket::Full { data_type, payload }
    }

    pub fn half(payload: &'a [u8]) -> Self {
        FramePacket::Half { payload }
    }

    pub fn kind(&self) -> PacketKind {
        match self {
            FramePacket::Full { .. } => PacketKind::Full,
            FramePacket::Half { .. } => PacketKind::Half,
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, FramePacket::Full { .. })
    }

    pub fn is_half(&self) -> bool {
        matches!(self, FramePacket::Half { .. })
    }

    /// Resolved type; half data is always `Unknown`.
    pub fn data_type(&self) -> DataType {
        match self {
            FramePacket::Full { data_type, .. } => *data_type,
            FramePacket::Half { .. } => DataType::Unknown,
        }
    }

    pub fn payload(&self) -> &'a [u8] {
        match self {
            FramePacket::Full { payload, .. } | FramePacket::Half { payload } => payload,
        }
    }

    pub fn len(&self) -> usize {
        self.payload().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Copy a full frame out of the borrowed buffer. `None` for half data.
    pub fn to_frame(&self) -> Option<Frame> {
        match self {
            FramePacket::Full { data_type, payload } => {
                Some(Frame::new(*data_type, Bytes::copy_from_slice(payload)))
            }
            FramePacket::Half { .. } => None,
        }
    }
}

use bytes::{BufMut, Bytes, BytesMut};

use crate::data_type::DataType;
use crate::error::{FrameError, Result};

/// Magic frame header: 0x55 0xAA 0x55 0xAA.
pub const MAGIC: [u8; 4] = [0x55, 0xAA, 0x55, 0xAA];

/// Default offset of the 2-byte data type field.
pub const DEFAULT_TYPE_FIELD_OFFSET: usize = 4;

/// Default offset of the length field.
pub const DEFAULT_LENGTH_FIELD_OFFSET: usize = 6;

/// Default width of the length field in bytes.
pub const DEFAULT_LENGTH_FIELD_WIDTH: usize = 2;

/// Header size for the default layout: magic (4) + type (2) + length (2).
pub const HEADER_SIZE: usize = 8;

/// Width of the data type field.
pub const TYPE_FIELD_WIDTH: usize = 2;

/// Largest header region a layout may describe: 64 KiB.
pub const MAX_HEADER_SIZE: usize = 64 * 1024;

/// Length field widths that can be decoded.
pub const SUPPORTED_LENGTH_WIDTHS: [usize; 4] = [1, 2, 4, 8];

/// Byte order of the integer header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Network order, used by station firmware.
    #[default]
    BigEndian,
    LittleEndian,
}

/// A complete frame copied out of the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Payload type resolved from the type field.
    pub data_type: DataType,
    /// The whole wire frame, magic header through the declared length.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(data_type: DataType, payload: impl Into<Bytes>) -> Self {
        Self {
            data_type,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        self.payload.len()
    }
}

/// Layout of the frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Marker that starts every frame. Default: [`MAGIC`].
    pub magic: Vec<u8>,
    /// Offset of the 2-byte type field from the frame start. Default: 4.
    pub type_field_offset: usize,
    /// Offset of the length field from the frame start. Default: 6.
    pub length_field_offset: usize,
    /// Width of the length field: 1, 2, 4 or 8. Default: 2.
    pub length_field_width: usize,
    /// Byte order of the type and length fields. Default: big endian.
    pub byte_order: ByteOrder,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            magic: MAGIC.to_vec(),
            type_field_offset: DEFAULT_TYPE_FIELD_OFFSET,
            length_field_offset: DEFAULT_LENGTH_FIELD_OFFSET,
            length_field_width: DEFAULT_LENGTH_FIELD_WIDTH,
            byte_order: ByteOrder::BigEndian,
        }
    }
}

impl FrameConfig {
    /// End of the length field, which is also the shortest legal frame.
    pub fn length_field_end(&self) -> Result<usize> {
        self.length_field_offset
            .checked_add(self.length_field_width)
            .ok_or(FrameError::LayoutOutOfRange {
                field: "length",
                offset: self.length_field_offset,
                max: usize::MAX,
            })
    }

    /// Bytes written before the body by [`encode_frame`].
    pub fn header_size(&self) -> Result<usize> {
        let type_end = self
            .type_field_offset
            .checked_add(TYPE_FIELD_WIDTH)
            .ok_or(FrameError::LayoutOutOfRange {
                field: "type",
                offset: self.type_field_offset,
                max: usize::MAX,
            })?;
        Ok(self.magic.len().max(type_end).max(self.length_field_end()?))
    }

    /// Largest total frame length the length field can declare.
    pub fn max_frame_length(&self) -> usize {
        let max = match self.length_field_width {
            1 => i8::MAX as u64,
            2 => i16::MAX as u64,
            4 => i32::MAX as u64,
            _ => i64::MAX as u64,
        };
        usize::try_from(max).unwrap_or(usize::MAX)
    }

    /// Check the layout up front instead of at the first located header.
    pub fn validate(&self) -> Result<()> {
        if self.magic.is_empty() {
            return Err(FrameError::EmptyMagic);
        }
        if !SUPPORTED_LENGTH_WIDTHS.contains(&self.length_field_width) {
            return Err(FrameError::UnsupportedLengthWidth(self.length_field_width));
        }

        let header_size = self.header_size()?;
        if header_size > MAX_HEADER_SIZE {
            let (field, offset) = if self.magic.len() == header_size {
                ("magic", 0)
            } else if self.length_field_end()? == header_size {
                ("length", self.length_field_offset)
            } else {
                ("type", self.type_field_offset)
            };
            return Err(FrameError::LayoutOutOfRange {
                field,
                offset,
                max: MAX_HEADER_SIZE,
            });
        }
        Ok(())
    }
}

/// Read the signed length field at `offset`.
///
/// The caller guarantees `offset + width <= src.len()`.
pub(crate) fn read_length(src: &[u8], offset: usize, width: usize, order: ByteOrder) -> Result<i64> {
    let field = &src[offset..offset + width];
    let value = match (width, order) {
        (1, _) => i64::from(field[0] as i8),
        (2, ByteOrder::BigEndian) => i64::from(i16::from_be_bytes([field[0], field[1]])),
        (2, ByteOrder::LittleEndian) => i64::from(i16::from_le_bytes([field[0], field[1]])),
        (4, ByteOrder::BigEndian) => i64::from(i32::from_be_bytes(to_array(field))),
        (4, ByteOrder::LittleEndian) => i64::from(i32::from_le_bytes(to_array(field))),
        (8, ByteOrder::BigEndian) => i64::from_be_bytes(to_array(field)),
        (8, ByteOrder::LittleEndian) => i64::from_le_bytes(to_array(field)),
        _ => return Err(FrameError::UnsupportedLengthWidth(width)),
    };
    Ok(value)
}

/// Read the 2-byte type code at `offset`, if the frame is long enough.
pub(crate) fn read_type_code(frame: &[u8], offset: usize, order: ByteOrder) -> Option<u16> {
    let field = frame.get(offset..offset.checked_add(TYPE_FIELD_WIDTH)?)?;
    let bytes = [field[0], field[1]];
    Some(match order {
        ByteOrder::BigEndian => u16::from_be_bytes(bytes),
        ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
    })
}

fn to_array<const N: usize>(field: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(field);
    out
}

/// Encode a frame into the wire format.
///
/// Wire format (default layout):
/// ```text
/// ┌──────────────┬───────────┬───────────┬──────────────────┐
/// │ Magic (4B)   │ Type      │ Length    │ Body             │
/// │ 55 AA 55 AA  │ (2B BE)   │ (2B BE)   │ (Length - 8 B)   │
/// └──────────────┴───────────┴───────────┴──────────────────┘
/// ```
///
/// The length field carries the total frame size, header included. Gaps left
/// by custom offsets are zero-filled. No frame tail is written.
pub fn encode_frame(config: &FrameConfig, code: u16, body: &[u8], dst: &mut BytesMut) -> Result<()> {
    config.validate()?;

    let header_size = config.header_size()?;
    let total = header_size + body.len();
    let max = config.max_frame_length();
    if total > max {
        return Err(FrameError::FrameTooLarge { size: total, max });
    }

    let mut header = vec![0u8; header_size];
    header[..config.magic.len()].copy_from_slice(&config.magic);

    let type_field = match config.byte_order {
        ByteOrder::BigEndian => code.to_be_bytes(),
        ByteOrder::LittleEndian => code.to_le_bytes(),
    };
    let type_offset = config.type_field_offset;
    header[type_offset..type_offset + TYPE_FIELD_WIDTH].copy_from_slice(&type_field);

    let width = config.length_field_width;
    let length_offset = config.length_field_offset;
    let length_field = &mut header[length_offset..length_offset + width];
    match config.byte_order {
        ByteOrder::BigEndian => length_field.copy_from_slice(&(total as u64).to_be_bytes()[8 - width..]),
        ByteOrder::LittleEndian => length_field.copy_from_slice(&(total as u64).to_le_bytes()[..width]),
    }

    dst.reserve(total);
    dst.put_slice(&header);
    dst.put_slice(body);
    Ok(())
}

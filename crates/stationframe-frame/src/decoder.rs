use crate::codec::{read_length, read_type_code, FrameConfig};
use crate::data_type::DataType;
use crate::error::{FrameError, Result};
use crate::packet::FramePacket;

/// Splits a byte buffer into complete frames and half data.
///
/// The decoder keeps no state between calls. A streaming caller prepends the
/// trailing [`FramePacket::Half`] of one call to the next chunk it reads; see
/// [`FrameReader`](crate::FrameReader) for a ready-made version of that loop.
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    config: FrameConfig,
}

impl FrameDecoder {
    /// Create a decoder for the default station layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decoder with an explicit header layout.
    ///
    /// The length field width is checked when the first header is located,
    /// call [`FrameConfig::validate`] to check it eagerly.
    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    /// Current header layout.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Classify every byte of `src`.
    ///
    /// Packets are returned in input order and their payloads concatenate
    /// back to `src`. Truncated input is reported as trailing half data, not
    /// as an error. Errors abort the whole call.
    pub fn decode<'a>(&self, src: &'a [u8]) -> Result<Vec<FramePacket<'a>>> {
        let magic = self.config.magic.as_slice();
        if magic.is_empty() {
            return Err(FrameError::EmptyMagic);
        }

        let min_len = self.config.length_field_end()?;
        let mut packets = Vec::new();
        let mut cursor = 0usize;

        while cursor < src.len() {
            let Some(frame_offset) = find_frame_header(src, cursor, magic) else {
                tracing::debug!(offset = cursor, len = src.len() - cursor, "no frame header found");
                packets.push(FramePacket::half(&src[cursor..]));
                break;
            };

            if frame_offset > cursor {
                tracing::debug!(
                    offset = cursor,
                    len = frame_offset - cursor,
                    "half data before frame header"
                );
                packets.push(FramePacket::half(&src[cursor..frame_offset]));
            }

            let remaining = src.len() - frame_offset;
            if remaining < min_len {
                tracing::debug!(offset = frame_offset, remaining, "length field not yet available");
                packets.push(FramePacket::half(&src[frame_offset..]));
                break;
            }

            let length = read_length(
                src,
                frame_offset + self.config.length_field_offset,
                self.config.length_field_width,
                self.config.byte_order,
            )?;
            if length < min_len as i64 {
                return Err(FrameError::InvalidFrameLength {
                    length,
                    min: min_len,
                });
            }

            // length is positive here, and no larger than `remaining` past this check
            if (remaining as u64) < length as u64 {
                tracing::debug!(
                    offset = frame_offset,
                    declared = length,
                    remaining,
                    "frame truncated"
                );
                packets.push(FramePacket::half(&src[frame_offset..]));
                break;
            }

            let end = frame_offset + length as usize;
            let frame = &src[frame_offset..end];
            let data_type = self.resolve_type(frame);
            tracing::trace!(offset = frame_offset, len = frame.len(), %data_type, "full frame");
            packets.push(FramePacket::full(data_type, frame));
            cursor = end;
        }

        Ok(packets)
    }

    fn resolve_type(&self, frame: &[u8]) -> DataType {
        match read_type_code(frame, self.config.type_field_offset, self.config.byte_order) {
            Some(code) => DataType::from_code(code),
            None => {
                tracing::debug!(len = frame.len(), "type field outside frame");
                DataType::Unknown
            }
        }
    }
}

/// Decode `src` with the default station layout.
pub fn decode(src: &[u8]) -> Result<Vec<FramePacket<'_>>> {
    FrameDecoder::new().decode(src)
}

/// Offset of the first complete `magic` occurrence at or after `from`.
///
/// Every position is tried as a candidate start, so a partial match never
/// hides a header that begins inside it.
pub fn find_frame_header(src: &[u8], from: usize, magic: &[u8]) -> Option<usize> {
    if magic.is_empty() || from >= src.len() {
        return None;
    }
    src[from..]
        .windows(magic.len())
        .position(|window| window == magic)
        .map(|pos| from + pos)
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;
    use crate::codec::{encode_frame, ByteOrder, MAGIC};
    use crate::packet::PacketKind;

    fn frame(code: u16, body: &[u8]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_frame(&FrameConfig::default(), code, body, &mut buf).unwrap();
        buf.to_vec()
    }

    fn concat(packets: &[FramePacket<'_>]) -> Vec<u8> {
        packets.iter().flat_map(|p| p.payload().iter().copied()).collect()
    }

    #[test]
    fn decodes_station_fixture() {
        let data: Vec<u8> = vec![
            0xA1, 0xA1, 0xA1, // noise
            0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x0C, 0x01, 0x02, 0x03, 0x04,
            0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x0A, 0x01, 0x02,
            0x03, 0x04, // noise
            0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0xA4, 0x01, // truncated
        ];

        let packets = decode(&data).unwrap();
        assert_eq!(packets.len(), 5);

        assert_eq!(packets[0], FramePacket::half(&[0xA1, 0xA1, 0xA1]));
        assert_eq!(
            packets[1],
            FramePacket::full(
                DataType::ElectricTimeDomain,
                &[0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x0C, 0x01, 0x02, 0x03, 0x04]
            )
        );
        assert_eq!(
            packets[2],
            FramePacket::full(
                DataType::ElectricTimeDomain,
                &[0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x0A, 0x01, 0x02]
            )
        );
        assert_eq!(packets[3], FramePacket::half(&[0x03, 0x04]));
        assert_eq!(
            packets[4],
            FramePacket::half(&[0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0xA4, 0x01])
        );
        assert_eq!(concat(&packets), data);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn input_without_header_is_one_half() {
        let data = [0x01, 0x02, 0x55, 0xAA, 0x55];
        let packets = decode(&data).unwrap();
        assert_eq!(packets, vec![FramePacket::half(&data)]);
    }

    #[test]
    fn back_to_back_frames() {
        let mut data = frame(0x00A0, b"status");
        data.extend(frame(0x00A2, b"mag"));
        data.extend(frame(0x00B1, b""));

        let packets = decode(&data).unwrap();
        let types: Vec<DataType> = packets.iter().map(|p| p.data_type()).collect();
        assert_eq!(
            types,
            vec![
                DataType::StatusData,
                DataType::MagneticTimeDomain,
                DataType::TimeDomainFeature
            ]
        );
        assert!(packets.iter().all(|p| p.kind() == PacketKind::Full));
        assert_eq!(concat(&packets), data);
    }

    #[test]
    fn unmapped_type_code_resolves_to_unknown() {
        let data = frame(0x0042, b"??");
        let packets = decode(&data).unwrap();
        assert_eq!(packets, vec![FramePacket::full(DataType::Unknown, &data)]);
    }

    #[test]
    fn truncated_in_magic_is_half() {
        let data = [0x10, 0x55, 0xAA, 0x55];
        let packets = decode(&data).unwrap();
        assert_eq!(packets, vec![FramePacket::half(&data)]);
    }

    #[test]
    fn truncated_in_length_field_is_half() {
        let data = [0x10, 0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00];
        let packets = decode(&data).unwrap();
        assert_eq!(
            packets,
            vec![FramePacket::half(&data[..1]), FramePacket::half(&data[1..])]
        );
    }

    #[test]
    fn truncated_in_payload_is_half() {
        let full = frame(0x00A3, b"frequency");
        for cut in MAGIC.len()..full.len() {
            let packets = decode(&full[..cut]).unwrap();
            assert_eq!(packets, vec![FramePacket::half(&full[..cut])], "cut at {cut}");
        }
    }

    #[test]
    fn header_at_buffer_end_is_found() {
        let data = [0x01, 0x55, 0xAA, 0x55, 0xAA];
        let packets = decode(&data).unwrap();
        assert_eq!(
            packets,
            vec![FramePacket::half(&data[..1]), FramePacket::half(&data[1..])]
        );
    }

    #[test]
    fn partial_match_does_not_hide_header() {
        // 55 AA 55 | 55 AA 55 AA ...: the header starts inside a broken prefix.
        let mut data = vec![0x55, 0xAA, 0x55];
        let good = frame(0x00A1, &[0x09]);
        data.extend(&good);

        let packets = decode(&data).unwrap();
        assert_eq!(
            packets,
            vec![
                FramePacket::half(&[0x55, 0xAA, 0x55]),
                FramePacket::full(DataType::ElectricTimeDomain, &good),
            ]
        );
    }

    #[test]
    fn repeated_first_byte_does_not_hide_header() {
        let mut data = vec![0x55];
        let good = frame(0x00A0, b"");
        data.extend(&good);

        let packets = decode(&data).unwrap();
        assert_eq!(packets[0], FramePacket::half(&[0x55]));
        assert_eq!(packets[1], FramePacket::full(DataType::StatusData, &good));
    }

    #[test]
    fn length_shorter_than_header_is_rejected() {
        let data = [0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x07, 0x00];
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrameLength { length: 7, min: 8 }));
    }

    #[test]
    fn negative_length_is_rejected() {
        let data = [0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0xFF, 0xF0];
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrameLength { length: -16, .. }));
    }

    #[test]
    fn error_aborts_after_good_frames() {
        let mut data = frame(0x00A1, b"ok");
        data.extend([0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x00]);
        assert!(decode(&data).is_err());
    }

    #[test]
    fn unsupported_width_fails_once_header_is_found() {
        let decoder = FrameDecoder::with_config(FrameConfig {
            length_field_width: 3,
            ..FrameConfig::default()
        });

        // Nothing to read yet, so no error.
        let packets = decoder.decode(&[0x01, 0x02]).unwrap();
        assert_eq!(packets, vec![FramePacket::half(&[0x01, 0x02])]);

        let data = [0x55, 0xAA, 0x55, 0xAA, 0x00, 0xA1, 0x00, 0x00, 0x0C, 0x00];
        let err = decoder.decode(&data).unwrap_err();
        assert!(matches!(err, FrameError::UnsupportedLengthWidth(3)));
    }

    #[test]
    fn overflowing_length_offset_is_an_error() {
        let decoder = FrameDecoder::with_config(FrameConfig {
            length_field_offset: usize::MAX,
            ..FrameConfig::default()
        });
        let err = decoder
            .decode(&[0x55, 0xAA, 0x55, 0xAA, 0x00, 0x00])
            .unwrap_err();
        assert!(matches!(err, FrameError::LayoutOutOfRange { field: "length", .. }));
    }

    #[test]
    fn empty_magic_is_rejected() {
        let decoder = FrameDecoder::with_config(FrameConfig {
            magic: Vec::new(),
            ..FrameConfig::default()
        });
        assert!(matches!(decoder.decode(&[1, 2, 3]), Err(FrameError::EmptyMagic)));
    }

    #[test]
    fn custom_layouts_decode_their_own_frames() {
        let layouts = [
            (1, ByteOrder::BigEndian),
            (2, ByteOrder::LittleEndian),
            (4, ByteOrder::BigEndian),
            (4, ByteOrder::LittleEndian),
            (8, ByteOrder::BigEndian),
            (8, ByteOrder::LittleEndian),
        ];
        for (width, byte_order) in layouts {
            let config = FrameConfig {
                length_field_width: width,
                byte_order,
                ..FrameConfig::default()
            };
            let mut wire = BytesMut::from(&[0xEE][..]);
            encode_frame(&config, 0x00A4, b"spectrum", &mut wire).unwrap();

            let decoder = FrameDecoder::with_config(config);
            let packets = decoder.decode(&wire).unwrap();
            assert_eq!(packets.len(), 2, "width {width} {byte_order:?}");
            assert_eq!(packets[0], FramePacket::half(&[0xEE]));
            assert_eq!(packets[1].data_type(), DataType::MagneticFrequencyDomain);
            assert_eq!(packets[1].len(), wire.len() - 1);
        }
    }

    #[test]
    fn custom_magic() {
        let config = FrameConfig {
            magic: vec![0xEB, 0x90],
            type_field_offset: 2,
            length_field_offset: 4,
            ..FrameConfig::default()
        };
        let mut wire = BytesMut::new();
        encode_frame(&config, 0x00A0, b"hi", &mut wire).unwrap();
        assert_eq!(&wire[..6], &[0xEB, 0x90, 0x00, 0xA0, 0x00, 0x08]);

        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&wire);
        let packets = FrameDecoder::with_config(config).decode(&data).unwrap();
        assert_eq!(packets[0], FramePacket::half(&MAGIC));
        assert_eq!(packets[1], FramePacket::full(DataType::StatusData, &wire));
    }

    #[test]
    fn type_field_beyond_frame_end_is_unknown() {
        let config = FrameConfig {
            type_field_offset: 10,
            ..FrameConfig::default()
        };
        let data = [0x55, 0xAA, 0x55, 0xAA, 0x00, 0x00, 0x00, 0x08];
        let packets = FrameDecoder::with_config(config).decode(&data).unwrap();
        assert_eq!(packets, vec![FramePacket::full(DataType::Unknown, &data)]);
    }

    #[test]
    fn decoder_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FrameDecoder>();

        let decoder = std::sync::Arc::new(FrameDecoder::new());
        let handles: Vec<_> = (0..4u8)
            .map(|i| {
                let decoder = std::sync::Arc::clone(&decoder);
                std::thread::spawn(move || {
                    let data = frame(0x00A1, &[i; 3]);
                    let packets = decoder.decode(&data).unwrap();
                    assert_eq!(packets.len(), 1);
                    assert!(packets[0].is_full());
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn find_frame_header_from_offset() {
        let data = [0x55, 0xAA, 0x55, 0xAA, 0x00, 0x55, 0xAA, 0x55, 0xAA];
        assert_eq!(find_frame_header(&data, 0, &MAGIC), Some(0));
        assert_eq!(find_frame_header(&data, 1, &MAGIC), Some(5));
        assert_eq!(find_frame_header(&data, 6, &MAGIC), None);
        assert_eq!(find_frame_header(&data, 100, &MAGIC), None);
    }
}

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::codec::{Frame, FrameConfig};
use crate::decoder::FrameDecoder;
use crate::error::{FrameError, Result};
use crate::packet::FramePacket;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Default read size.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

/// Default limit on bytes held back while waiting for the rest of a frame: 1 MiB.
pub const DEFAULT_MAX_PENDING: usize = 1024 * 1024;

/// Buffering limits for [`FrameReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum undecoded bytes carried between reads. Default: 1 MiB.
    pub max_pending: usize,
    /// Bytes requested from the stream per read. Default: 8 KiB.
    pub chunk_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_pending: DEFAULT_MAX_PENDING,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Reads complete frames from any `Read` stream.
///
/// Each read is appended to the bytes left over from the previous decode and
/// the whole buffer is decoded again. Noise in front of a header is logged
/// and dropped. After an error the reader should be discarded.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    chunk: Vec<u8>,
    ready: VecDeque<Frame>,
    decoder: FrameDecoder,
    config: ReaderConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader for the default station layout.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default(), ReaderConfig::default())
    }

    /// Create a new frame reader with explicit layout and limits.
    pub fn with_config(inner: T, frame_config: FrameConfig, config: ReaderConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            chunk: vec![0u8; config.chunk_size.max(1)],
            ready: VecDeque::new(),
            decoder: FrameDecoder::with_config(frame_config),
            config,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached, even
    /// if a partial frame is still pending.
    pub fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.ready.pop_front() {
                return Ok(frame);
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                if !self.buf.is_empty() {
                    tracing::debug!(pending = self.buf.len(), "stream ended mid-frame");
                }
                return Err(FrameError::ConnectionClosed);
            }

            self.buf.extend_from_slice(&self.chunk[..read]);
            self.split_pending()?;
        }
    }

    fn split_pending(&mut self) -> Result<()> {
        let packets = self.decoder.decode(&self.buf)?;

        let last = packets.len().saturating_sub(1);
        let mut complete = Vec::new();
        let mut consumed = 0usize;
        for (index, packet) in packets.iter().enumerate() {
            match packet {
                FramePacket::Full { data_type, payload } => {
                    complete.push((*data_type, consumed, payload.len()));
                }
                FramePacket::Half { .. } if index == last => break,
                FramePacket::Half { payload } => {
                    tracing::warn!(len = payload.len(), "dropping bytes before frame header");
                }
            }
            consumed += packet.len();
        }

        let head = self.buf.split_to(consumed).freeze();
        for (data_type, start, len) in complete {
            self.ready
                .push_back(Frame::new(data_type, head.slice(start..start + len)));
        }

        // Without a header, only a trailing magic prefix can still become a frame.
        let magic = &self.decoder.config().magic;
        if self.buf.len() >= magic.len() && !self.buf.starts_with(magic) {
            let dropped = self.buf.len() - (magic.len() - 1);
            tracing::warn!(len = dropped, "dropping bytes without frame header");
            self.buf.advance(dropped);
        }

        if self.buf.len() > self.config.max_pending {
            return Err(FrameError::BufferOverflow {
                size: self.buf.len(),
                max: self.config.max_pending,
            });
        }
        Ok(())
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// The decoder applied to buffered bytes.
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Current buffering limits.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

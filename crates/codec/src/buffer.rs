//! Growable output buffer used by the encoder.
//!
//! Capacity grows to `max(2 × capacity, required)` whenever an append would
//! overflow it. Appends copy the caller's bytes in, so the buffer never aliases
//! caller-owned memory and each encode owns a distinct backing allocation.

use byteorder::{ByteOrder, LittleEndian};
use fixvar_core::{CodecError, Result, MAX_ADDRESSABLE_SIZE, OFFSET_SIZE};

/// Owned byte accumulator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeBuffer {
    buf: Vec<u8>,
}

impl EncodeBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer with room for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        EncodeBuffer {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append raw bytes
    #[inline]
    pub fn append(&mut self, bytes: &[u8]) -> &mut Self {
        self.reserve(bytes.len());
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Append a single byte
    #[inline]
    pub fn append_byte(&mut self, byte: u8) -> &mut Self {
        self.reserve(1);
        self.buf.push(byte);
        self
    }

    /// Append a 4-byte little-endian offset
    ///
    /// Fails with `EncodedTooLarge` if the offset cannot be represented in
    /// four bytes.
    pub fn append_offset(&mut self, offset: usize) -> Result<&mut Self> {
        let mut scratch = [0u8; OFFSET_SIZE];
        LittleEndian::write_u32(&mut scratch, to_offset(offset)?);
        Ok(self.append(&scratch))
    }

    /// Overwrite the 4-byte offset slot written earlier at byte `at`
    ///
    /// Fails with `EncodedTooLarge` if the offset does not fit in four bytes,
    /// and with `UnexpectedEnd` if the slot lies past the written bytes.
    pub fn patch_offset(&mut self, at: usize, offset: usize) -> Result<()> {
        let offset = to_offset(offset)?;
        let len = self.buf.len();
        match at.checked_add(OFFSET_SIZE) {
            Some(end) if end <= len => {
                LittleEndian::write_u32(&mut self.buf[at..end], offset);
                Ok(())
            }
            _ => Err(CodecError::UnexpectedEnd {
                requested: OFFSET_SIZE,
                available: len.saturating_sub(at),
            }),
        }
    }

    /// Bytes written so far
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been written
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Written bytes
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the buffer and return its bytes
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.buf.len().saturating_add(additional);
        let capacity = self.buf.capacity();
        if required > capacity {
            let target = capacity.saturating_mul(2).max(required);
            self.buf.reserve_exact(target - self.buf.len());
        }
    }
}

fn to_offset(offset: usize) -> Result<u32> {
    u32::try_from(offset).map_err(|_| CodecError::EncodedTooLarge {
        size: offset,
        limit: MAX_ADDRESSABLE_SIZE,
    })
}

impl AsRef<[u8]> for EncodeBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}

//! Bounded input cursor for decoding.
//!
//! A [`Stream`] reads from any `io::Read` source while enforcing a byte budget.
//! Besides fixed-width reads it keeps the per-scope offset bookkeeping used to
//! discover variable regions:
//!
//! ```text
//! fixed part:  [a][off0=12][b][off1=15][off2=20]     variable part: [..3..][..5..][..rest..]
//!                  │             │         │
//! read_offset:  first=12     push 15-12=3  push 20-15=5
//! consume_scope:                            pop 3, pop 5, then remainder
//! ```
//!
//! The size of variable field *k* is only known once offset *k+1* is read, so
//! sizes are queued one field late and drained in encounter order. The final
//! variable field takes everything left in the scope.

use byteorder::{ByteOrder, LittleEndian};
use fixvar_core::{CodecError, Result, OFFSET_SIZE};
use std::collections::VecDeque;
use std::io::Read;
use tracing::trace;

/// Up-front allocation cap for reads on a stream without a budget
const UNBOUNDED_READ_CHUNK: usize = 64 * 1024;

/// Byte cursor with a budget and a pending-offset queue
#[derive(Debug)]
pub struct Stream<R> {
    reader: R,
    /// True if the budget is the physical length of the source
    length_known: bool,
    /// Declared total length of the scope, if any
    total: Option<usize>,
    /// Budget left, `None` when unbounded
    remaining: Option<usize>,
    /// Bytes consumed so far
    position: usize,
    /// Sizes of variable regions discovered but not yet consumed
    pending: VecDeque<usize>,
    first_offset: Option<u32>,
    last_offset: Option<u32>,
}

impl<'a> Stream<&'a [u8]> {
    /// Create a stream over a byte slice
    ///
    /// If `size_hint` is given it must equal the slice length.
    pub fn from_slice(bytes: &'a [u8], size_hint: Option<usize>) -> Result<Self> {
        Stream::sized(bytes, bytes.len(), size_hint)
    }
}

impl<R: Read> Stream<R> {
    /// Create a stream over a source of unknown length
    ///
    /// `size_hint` becomes the budget; without one the stream is unbounded
    /// and consuming the remainder reads to end-of-data.
    pub fn new(reader: R, size_hint: Option<usize>) -> Self {
        Stream::build(reader, size_hint, false)
    }

    /// Create a stream over a source whose length is known
    ///
    /// Fails with `SizeMismatch` if `size_hint` disagrees with `source_len`.
    pub fn sized(reader: R, source_len: usize, size_hint: Option<usize>) -> Result<Self> {
        if let Some(declared) = size_hint {
            if declared != source_len {
                return Err(CodecError::SizeMismatch {
                    declared,
                    actual: source_len,
                });
            }
        }
        Ok(Stream::build(reader, Some(source_len), true))
    }

    fn build(reader: R, total: Option<usize>, length_known: bool) -> Self {
        Stream {
            reader,
            length_known,
            total,
            remaining: total,
            position: 0,
            pending: VecDeque::new(),
            first_offset: None,
            last_offset: None,
        }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Budget left, `None` for an unbounded stream
    pub fn remaining(&self) -> Option<usize> {
        self.remaining
    }

    /// Number of discovered variable regions not yet consumed
    pub fn pending_scopes(&self) -> usize {
        self.pending.len()
    }

    /// First offset read in this scope
    pub fn first_offset(&self) -> Option<u32> {
        self.first_offset
    }

    /// Consume exactly `n` bytes
    ///
    /// A request beyond a known source length is `UnexpectedEnd`; a request
    /// beyond a declared budget on a source of unknown length is `ValueTooLarge`.
    pub fn read_fixed(&mut self, n: usize) -> Result<Vec<u8>> {
        if let Some(remaining) = self.remaining {
            if n > remaining {
                return Err(if self.length_known {
                    CodecError::UnexpectedEnd {
                        requested: n,
                        available: remaining,
                    }
                } else {
                    CodecError::ValueTooLarge {
                        size: n,
                        limit: remaining,
                    }
                });
            }
        }

        let capacity = n.min(self.remaining.unwrap_or(UNBOUNDED_READ_CHUNK));
        let mut buf = Vec::with_capacity(capacity);
        (&mut self.reader).take(n as u64).read_to_end(&mut buf)?;
        if buf.len() < n {
            return Err(CodecError::UnexpectedEnd {
                requested: n,
                available: buf.len(),
            });
        }
        self.advance(n);
        Ok(buf)
    }

    /// Read a 4-byte little-endian offset and record the previous region's size
    pub fn read_offset(&mut self) -> Result<u32> {
        let bytes = self.read_fixed(OFFSET_SIZE)?;
        let offset = LittleEndian::read_u32(&bytes);

        if let Some(total) = self.total {
            if offset as usize > total {
                return Err(CodecError::ValueTooLarge {
                    size: offset as usize,
                    limit: total,
                });
            }
        }

        match self.last_offset {
            None => self.first_offset = Some(offset),
            Some(previous) => {
                if offset < previous {
                    return Err(CodecError::OffsetNotMonotonic { previous, offset });
                }
                self.pending.push_back((offset - previous) as usize);
            }
        }
        self.last_offset = Some(offset);

        trace!(
            target: "fixvar::codec",
            offset,
            pending = self.pending.len(),
            "Offset read"
        );
        Ok(offset)
    }

    /// Consume the next variable region
    ///
    /// Pops the oldest pending size; with none pending, consumes the rest of
    /// the scope.
    pub fn consume_scope(&mut self) -> Result<Vec<u8>> {
        let bytes = match self.pending.pop_front() {
            Some(size) => {
                if let Some(remaining) = self.remaining {
                    if size > remaining {
                        return Err(CodecError::ValueTooLarge {
                            size,
                            limit: remaining,
                        });
                    }
                }
                self.read_fixed(size)?
            }
            None => match self.remaining {
                Some(remaining) => self.read_fixed(remaining)?,
                None => {
                    let mut buf = Vec::new();
                    self.reader.read_to_end(&mut buf)?;
                    self.advance(buf.len());
                    buf
                }
            },
        };

        trace!(
            target: "fixvar::codec",
            size = bytes.len(),
            pending = self.pending.len(),
            "Scope consumed"
        );
        Ok(bytes)
    }

    /// Check that the scope was consumed completely
    pub fn finish(&mut self) -> Result<()> {
        match self.remaining {
            Some(0) => Ok(()),
            Some(remaining) => Err(CodecError::TrailingBytes { remaining }),
            None => {
                let mut extra = [0u8; 1];
                match self.reader.read(&mut extra)? {
                    0 => Ok(()),
                    n => Err(CodecError::TrailingBytes { remaining: n }),
                }
            }
        }
    }

    fn advance(&mut self, n: usize) {
        self.position += n;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= n;
        }
    }
}

//! Primitive codec
//!
//! Byte-exact little-endian encoding for booleans and unsigned integers of
//! width 1, 2, 4 and 8, plus homogeneous sequences of each.
//!
//! # Binary Format
//!
//! ```text
//! bool  : 1 byte, 0x00 or 0x01
//! u8    : 1 byte
//! u16   : 2 bytes LE
//! u32   : 4 bytes LE
//! u64   : 8 bytes LE
//! [T]   : concatenation of T encodings, no length prefix
//! ```
//!
//! Sequence decoding consumes the full element width for every entry.

use crate::buffer::EncodeBuffer;
use byteorder::{ByteOrder, LittleEndian};
use fixvar_core::{CodecError, PrimitiveKind, Result, SchemaType, Value};

/// Widest primitive in bytes
const MAX_WIDTH: usize = 8;

/// Fixed-width scalar with a little-endian wire form
pub trait FixedWidth: Sized + Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Write `self` into `out`, which is exactly `WIDTH` bytes long
    fn write_le(self, out: &mut [u8]);

    /// Read a value from `bytes`, which is exactly `WIDTH` bytes long
    fn read_le(bytes: &[u8]) -> Result<Self>;
}

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    fn write_le(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(CodecError::InvalidBoolean(b)),
        }
    }
}

impl FixedWidth for u8 {
    const WIDTH: usize = 1;

    fn write_le(self, out: &mut [u8]) {
        out[0] = self;
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        Ok(bytes[0])
    }
}

impl FixedWidth for u16 {
    const WIDTH: usize = 2;

    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_u16(out, self);
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        Ok(LittleEndian::read_u16(bytes))
    }
}

impl FixedWidth for u32 {
    const WIDTH: usize = 4;

    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_u32(out, self);
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        Ok(LittleEndian::read_u32(bytes))
    }
}

impl FixedWidth for u64 {
    const WIDTH: usize = 8;

    fn write_le(self, out: &mut [u8]) {
        LittleEndian::write_u64(out, self);
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        Ok(LittleEndian::read_u64(bytes))
    }
}

/// Append one scalar
#[inline]
pub fn encode<T: FixedWidth>(buf: &mut EncodeBuffer, value: T) {
    let mut scratch = [0u8; MAX_WIDTH];
    value.write_le(&mut scratch[..T::WIDTH]);
    buf.append(&scratch[..T::WIDTH]);
}

/// Decode one scalar from exactly `T::WIDTH` bytes
pub fn decode<T: FixedWidth>(bytes: &[u8]) -> Result<T> {
    if bytes.len() < T::WIDTH {
        return Err(CodecError::UnexpectedEnd {
            requested: T::WIDTH,
            available: bytes.len(),
        });
    }
    if bytes.len() > T::WIDTH {
        return Err(CodecError::TrailingBytes {
            remaining: bytes.len() - T::WIDTH,
        });
    }
    T::read_le(bytes)
}

/// Decode a sequence of scalars from a span
///
/// The span length must be a multiple of `T::WIDTH`.
pub fn decode_seq<T: FixedWidth>(bytes: &[u8]) -> Result<Vec<T>> {
    if bytes.len() % T::WIDTH != 0 {
        return Err(CodecError::MisalignedSequence {
            len: bytes.len(),
            width: T::WIDTH,
        });
    }
    bytes.chunks_exact(T::WIDTH).map(T::read_le).collect()
}

fn mismatch(kind: PrimitiveKind, value: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected: SchemaType::primitive(kind).to_string(),
        found: value.kind(),
    }
}

/// Append a [`Value`] as a primitive of the given kind
pub fn encode_value(kind: PrimitiveKind, value: &Value, buf: &mut EncodeBuffer) -> Result<()> {
    match (kind, value) {
        (PrimitiveKind::Bool, Value::Bool(v)) => encode(buf, *v),
        (PrimitiveKind::U8, Value::U8(v)) => encode(buf, *v),
        (PrimitiveKind::U16, Value::U16(v)) => encode(buf, *v),
        (PrimitiveKind::U32, Value::U32(v)) => encode(buf, *v),
        (PrimitiveKind::U64, Value::U64(v)) => encode(buf, *v),
        _ => return Err(mismatch(kind, value)),
    }
    Ok(())
}

/// Append a homogeneous run of [`Value`]s
pub fn encode_values(kind: PrimitiveKind, values: &[Value], buf: &mut EncodeBuffer) -> Result<()> {
    values
        .iter()
        .try_for_each(|value| encode_value(kind, value, buf))
}

/// Decode a primitive [`Value`] from exactly `kind.width()` bytes
pub fn decode_value(kind: PrimitiveKind, bytes: &[u8]) -> Result<Value> {
    Ok(match kind {
        PrimitiveKind::Bool => Value::Bool(decode(bytes)?),
        PrimitiveKind::U8 => Value::U8(decode(bytes)?),
        PrimitiveKind::U16 => Value::U16(decode(bytes)?),
        PrimitiveKind::U32 => Value::U32(decode(bytes)?),
        PrimitiveKind::U64 => Value::U64(decode(bytes)?),
    })
}

/// Decode a span as a sequence of primitive [`Value`]s
pub fn decode_values(kind: PrimitiveKind, bytes: &[u8]) -> Result<Vec<Value>> {
    fn wrap<T: FixedWidth>(bytes: &[u8], f: fn(T) -> Value) -> Result<Vec<Value>> {
        Ok(decode_seq::<T>(bytes)?.into_iter().map(f).collect())
    }

    match kind {
        PrimitiveKind::Bool => wrap::<bool>(bytes, Value::Bool),
        PrimitiveKind::U8 => wrap::<u8>(bytes, Value::U8),
        PrimitiveKind::U16 => wrap::<u16>(bytes, Value::U16),
        PrimitiveKind::U32 => wrap::<u32>(bytes, Value::U32),
        PrimitiveKind::U64 => wrap::<u64>(bytes, Value::U64),
    }
}

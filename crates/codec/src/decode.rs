//! Decoder
//!
//! Mirrors the encoder. Within one scope, fixed fields are read inline and
//! variable fields contribute an offset to the stream's pending queue. Once
//! the fixed part is read, each variable field takes its span from the queue
//! and is decoded by a fresh [`Stream`] over that span.
//!
//! Element counts are never stored on the wire:
//!
//! - fixed elements: `span length / element size`
//! - variable elements: `first offset / 4`, since the offset table is the
//!   only thing before the first element's data

use crate::primitives;
use crate::size::check_list_length;
use crate::stream::Stream;
use fixvar_core::{CodecConfig, CodecError, Result, SchemaType, Value, OFFSET_SIZE};
use std::io::Read;
use tracing::debug;

/// Decode a complete encoding with the default configuration
pub fn decode(schema: &SchemaType, bytes: &[u8]) -> Result<Value> {
    decode_with_config(schema, bytes, &CodecConfig::default())
}

/// Decode a complete encoding, enforcing `config.max_encoded_size`
pub fn decode_with_config(schema: &SchemaType, bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    decode_labelled(schema, bytes, config, None)
}

pub(crate) fn decode_labelled(
    schema: &SchemaType,
    bytes: &[u8],
    config: &CodecConfig,
    name: Option<&str>,
) -> Result<Value> {
    check_input_size(bytes.len(), config)?;
    let mut stream = Stream::from_slice(bytes, None)?;
    let value = decode_stream(schema, &mut stream)?;

    debug!(
        target: "fixvar::codec",
        name = name.unwrap_or("-"),
        schema = %schema,
        size = bytes.len(),
        "Value decoded"
    );
    Ok(value)
}

/// Decode one value from a reader
///
/// With a `size_hint` exactly that many bytes are consumed and a shorter
/// source is an error. Without one the reader is treated as holding exactly
/// one encoding and is read to its end.
pub fn decode_reader<R: Read>(
    schema: &SchemaType,
    reader: R,
    size_hint: Option<usize>,
    config: &CodecConfig,
) -> Result<Value> {
    if let Some(hint) = size_hint {
        check_input_size(hint, config)?;
    }
    let mut stream = Stream::new(reader, size_hint);
    let value = decode_stream(schema, &mut stream)?;

    debug!(
        target: "fixvar::codec",
        schema = %schema,
        size = stream.position(),
        "Value decoded from reader"
    );
    Ok(value)
}

/// Decode a value that must fill the rest of `stream`
pub fn decode_stream<R: Read>(schema: &SchemaType, stream: &mut Stream<R>) -> Result<Value> {
    let value = decode_value(schema, stream)?;
    stream.finish()?;
    Ok(value)
}

fn check_input_size(size: usize, config: &CodecConfig) -> Result<()> {
    if size > config.max_encoded_size {
        return Err(CodecError::ValueTooLarge {
            size,
            limit: config.max_encoded_size,
        });
    }
    Ok(())
}

/// Decode a variable region consumed from a parent scope
fn decode_span(schema: &SchemaType, span: &[u8]) -> Result<Value> {
    let mut stream = Stream::from_slice(span, None)?;
    decode_stream(schema, &mut stream)
}

fn decode_value<R: Read>(schema: &SchemaType, stream: &mut Stream<R>) -> Result<Value> {
    match schema {
        SchemaType::Primitive { kind } => {
            let bytes = stream.read_fixed(kind.width())?;
            primitives::decode_value(*kind, &bytes)
        }
        SchemaType::FixedVector { length, element } => {
            let items = if let SchemaType::Primitive { kind } = element.as_ref() {
                let bytes = stream.read_fixed(length.saturating_mul(kind.width()))?;
                primitives::decode_values(*kind, &bytes)?
            } else if element.is_fixed() {
                (0..*length)
                    .map(|_| decode_value(element, stream))
                    .collect::<Result<Vec<_>>>()?
            } else {
                decode_variable_elements(element, stream, Some(*length), None)?
            };
            Ok(Value::Vector(items))
        }
        SchemaType::List {
            max_length,
            element,
        } => {
            let span = stream.consume_scope()?;
            let items = if element.is_fixed() {
                decode_fixed_span(element, &span)?
            } else {
                let mut scope = Stream::from_slice(&span, None)?;
                let items = decode_variable_elements(element, &mut scope, None, *max_length)?;
                scope.finish()?;
                items
            };
            check_list_length(*max_length, items.len())?;
            Ok(Value::List(items))
        }
        SchemaType::Container { fields } => {
            let mut inline = Vec::with_capacity(fields.len());
            let mut has_variable = false;
            for field in fields {
                if field.schema.is_fixed() {
                    inline.push(Some(decode_value(&field.schema, stream)?));
                } else {
                    stream.read_offset()?;
                    has_variable = true;
                    inline.push(None);
                }
            }

            if has_variable {
                let fixed_part_len = stream.position();
                if let Some(first) = stream.first_offset() {
                    if first as usize != fixed_part_len {
                        return Err(CodecError::InvalidOffset {
                            expected: fixed_part_len,
                            found: first as usize,
                        });
                    }
                }
            }

            // Variable spans are drained in field order
            let values = fields
                .iter()
                .zip(inline)
                .map(|(field, slot)| match slot {
                    Some(value) => Ok(value),
                    None => {
                        let span = stream.consume_scope()?;
                        decode_span(&field.schema, &span)
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Container(values))
        }
    }
}

/// Decode an offset table and the variable elements it points to
///
/// `exact` is the schema length of a vector; lists derive the count from the
/// first offset and are bounded by `max_length` before any element is read.
fn decode_variable_elements<R: Read>(
    element: &SchemaType,
    stream: &mut Stream<R>,
    exact: Option<usize>,
    max_length: Option<usize>,
) -> Result<Vec<Value>> {
    let count = match exact {
        Some(0) => return Ok(Vec::new()),
        Some(length) => {
            let first = stream.read_offset()? as usize;
            let expected = length.saturating_mul(OFFSET_SIZE);
            if first != expected {
                return Err(CodecError::InvalidOffset {
                    expected,
                    found: first,
                });
            }
            length
        }
        None => {
            if stream.remaining() == Some(0) {
                return Ok(Vec::new());
            }
            let first = stream.read_offset()? as usize;
            if first == 0 {
                return Err(CodecError::InvalidOffset {
                    expected: OFFSET_SIZE,
                    found: 0,
                });
            }
            if first % OFFSET_SIZE != 0 {
                return Err(CodecError::MisalignedSequence {
                    len: first,
                    width: OFFSET_SIZE,
                });
            }
            let count = first / OFFSET_SIZE;
            check_list_length(max_length, count)?;
            count
        }
    };

    for _ in 1..count {
        stream.read_offset()?;
    }
    (0..count)
        .map(|_| {
            let span = stream.consume_scope()?;
            decode_span(element, &span)
        })
        .collect()
}

/// Decode a span holding back-to-back fixed-size elements
fn decode_fixed_span(element: &SchemaType, span: &[u8]) -> Result<Vec<Value>> {
    if let SchemaType::Primitive { kind } = element {
        return primitives::decode_values(*kind, span);
    }

    let width = element.fixed_size();
    if width == 0 {
        // Only reachable with an unvalidated zero-length vector element
        return match span.len() {
            0 => Ok(Vec::new()),
            remaining => Err(CodecError::TrailingBytes { remaining }),
        };
    }
    if span.len() % width != 0 {
        return Err(CodecError::MisalignedSequence {
            len: span.len(),
            width,
        });
    }

    let mut stream = Stream::from_slice(span, None)?;
    let items = (0..span.len() / width)
        .map(|_| decode_value(element, &mut stream))
        .collect::<Result<Vec<_>>>()?;
    stream.finish()?;
    Ok(items)
}

//! Encoder
//!
//! Serializes a [`Value`] under a [`SchemaType`] in two phases per scope:
//!
//! ```text
//! container{a: u32, b: list<u8>}  a=1, b=[9, 9]
//!
//! fixed part                      variable part
//! ┌─────────────┬─────────────┐   ┌───────┐
//! │ 01 00 00 00 │ 08 00 00 00 │   │ 09 09 │
//! └─────────────┴─────────────┘   └───────┘
//!        a        offset of b         b
//! ```
//!
//! Fixed fields are written inline. Each variable field gets a 4-byte offset
//! equal to the fixed-part length plus the sizes of all earlier variable
//! fields; its data follows the fixed part in field order. Vectors and lists
//! of variable elements use the same layout with one offset per element.
//!
//! Offset slots are written as placeholders and patched with the scope-relative
//! position once the field's data is about to be appended, so every value is
//! visited once. [`size_of`] runs only at the top level, to enforce the size
//! limit before anything is allocated.

use crate::buffer::EncodeBuffer;
use crate::primitives;
use crate::size::{expect_container, expect_list, expect_vector, size_of};
use fixvar_core::{CodecConfig, CodecError, Result, SchemaType, Value, OFFSET_SIZE};
use tracing::debug;

/// Encode a value with the default configuration
pub fn encode(schema: &SchemaType, value: &Value) -> Result<Vec<u8>> {
    encode_with_config(schema, value, &CodecConfig::default())
}

/// Encode a value, enforcing `config.max_encoded_size`
///
/// The total size is computed before anything is written, so an oversized
/// value fails without allocating its encoding.
pub fn encode_with_config(
    schema: &SchemaType,
    value: &Value,
    config: &CodecConfig,
) -> Result<Vec<u8>> {
    encode_labelled(schema, value, config, None)
}

pub(crate) fn encode_labelled(
    schema: &SchemaType,
    value: &Value,
    config: &CodecConfig,
    name: Option<&str>,
) -> Result<Vec<u8>> {
    let size = size_of(schema, value)?;
    if size > config.max_encoded_size {
        return Err(CodecError::EncodedTooLarge {
            size,
            limit: config.max_encoded_size,
        });
    }

    let mut buf = EncodeBuffer::with_capacity(config.initial_capacity.min(size));
    encode_into(schema, value, &mut buf)?;
    debug_assert_eq!(buf.len(), size, "encoded length disagrees with size_of");

    debug!(
        target: "fixvar::codec",
        name = name.unwrap_or("-"),
        schema = %schema,
        size,
        "Value encoded"
    );
    Ok(buf.into_bytes())
}

/// Append the encoding of `value` to `buf`
///
/// No size limit beyond the 4-byte offset range is enforced here. On error
/// `buf` may hold a partial encoding.
pub fn encode_into(schema: &SchemaType, value: &Value, buf: &mut EncodeBuffer) -> Result<()> {
    match schema {
        SchemaType::Primitive { kind } => primitives::encode_value(*kind, value, buf),
        SchemaType::FixedVector { length, element } => {
            let items = expect_vector(schema, value, *length)?;
            encode_sequence(element, items, buf)
        }
        SchemaType::List {
            max_length,
            element,
        } => {
            let items = expect_list(schema, value, *max_length)?;
            encode_sequence(element, items, buf)
        }
        SchemaType::Container { fields } => {
            let values = expect_container(schema, value, fields.len())?;
            let start = buf.len();

            let mut slots = Vec::new();
            for (field, value) in fields.iter().zip(values) {
                if field.schema.is_fixed() {
                    encode_into(&field.schema, value, buf)?;
                } else {
                    slots.push(buf.len());
                    buf.append_offset(0)?;
                }
            }

            let variable = fields
                .iter()
                .zip(values)
                .filter(|(field, _)| !field.schema.is_fixed());
            for (slot, (field, value)) in slots.into_iter().zip(variable) {
                buf.patch_offset(slot, buf.len() - start)?;
                encode_into(&field.schema, value, buf)?;
            }
            Ok(())
        }
    }
}

/// Elements of a vector or list, without any length prefix
fn encode_sequence(element: &SchemaType, items: &[Value], buf: &mut EncodeBuffer) -> Result<()> {
    if let SchemaType::Primitive { kind } = element {
        return primitives::encode_values(*kind, items, buf);
    }

    if element.is_fixed() {
        return items
            .iter()
            .try_for_each(|item| encode_into(element, item, buf));
    }

    let start = buf.len();
    for _ in items {
        buf.append_offset(0)?;
    }
    for (i, item) in items.iter().enumerate() {
        buf.patch_offset(start + i * OFFSET_SIZE, buf.len() - start)?;
        encode_into(element, item, buf)?;
    }
    Ok(())
}

//! Size calculator
//!
//! Computes the exact encoded length of a value before any byte is written.
//! The encoder calls it once per top-level value to enforce the size limit
//! and to size its buffer; offsets themselves are backpatched while encoding.
//!
//! ```text
//! container : Σ fixed_size(field) + Σ size_of(variable field)
//! vector/list of fixed elements    : count × fixed_size(element)
//! vector/list of variable elements : Σ (4 + size_of(element))
//! ```

use fixvar_core::{
    CodecError, Result, SchemaType, Value, MAX_ADDRESSABLE_SIZE, OFFSET_SIZE,
};

/// Exact encoded size of `value` under `schema`
///
/// Fixed schemas return [`SchemaType::fixed_size`] without inspecting the value.
pub fn size_of(schema: &SchemaType, value: &Value) -> Result<usize> {
    if schema.is_fixed() {
        return fixed_size(schema);
    }

    match schema {
        SchemaType::Primitive { .. } => fixed_size(schema),
        SchemaType::FixedVector { length, element } => {
            let items = expect_vector(schema, value, *length)?;
            sequence_size(element, items)
        }
        SchemaType::List {
            max_length,
            element,
        } => {
            let items = expect_list(schema, value, *max_length)?;
            sequence_size(element, items)
        }
        SchemaType::Container { fields } => {
            let values = expect_container(schema, value, fields.len())?;
            fields
                .iter()
                .zip(values)
                .try_fold(0usize, |size, (field, value)| {
                    let size = checked_add(size, fixed_size(&field.schema)?)?;
                    if field.schema.is_fixed() {
                        Ok(size)
                    } else {
                        checked_add(size, size_of(&field.schema, value)?)
                    }
                })
        }
    }
}

fn sequence_size(element: &SchemaType, items: &[Value]) -> Result<usize> {
    if element.is_fixed() {
        return items
            .len()
            .checked_mul(fixed_size(element)?)
            .ok_or_else(overflow);
    }
    items.iter().try_fold(0usize, |size, item| {
        let size = checked_add(size, OFFSET_SIZE)?;
        checked_add(size, size_of(element, item)?)
    })
}

fn fixed_size(schema: &SchemaType) -> Result<usize> {
    schema.checked_fixed_size().ok_or_else(overflow)
}

fn checked_add(a: usize, b: usize) -> Result<usize> {
    a.checked_add(b).ok_or_else(overflow)
}

fn overflow() -> CodecError {
    CodecError::EncodedTooLarge {
        size: usize::MAX,
        limit: MAX_ADDRESSABLE_SIZE,
    }
}

fn type_mismatch(schema: &SchemaType, value: &Value) -> CodecError {
    CodecError::TypeMismatch {
        expected: schema.to_string(),
        found: value.kind(),
    }
}

/// Elements of a vector value, checked against the schema length
pub(crate) fn expect_vector<'v>(
    schema: &SchemaType,
    value: &'v Value,
    length: usize,
) -> Result<&'v [Value]> {
    match value {
        Value::Vector(items) if items.len() == length => Ok(items),
        Value::Vector(items) => Err(CodecError::VectorLengthMismatch {
            expected: length,
            actual: items.len(),
        }),
        _ => Err(type_mismatch(schema, value)),
    }
}

/// Elements of a list value, checked against the schema maximum
pub(crate) fn expect_list<'v>(
    schema: &SchemaType,
    value: &'v Value,
    max_length: Option<usize>,
) -> Result<&'v [Value]> {
    match value {
        Value::List(items) => {
            check_list_length(max_length, items.len())?;
            Ok(items)
        }
        _ => Err(type_mismatch(schema, value)),
    }
}

/// Field values of a container, checked against the schema field count
pub(crate) fn expect_container<'v>(
    schema: &SchemaType,
    value: &'v Value,
    field_count: usize,
) -> Result<&'v [Value]> {
    match value.fields() {
        Some(values) if values.len() == field_count => Ok(values),
        Some(values) => Err(CodecError::FieldCountMismatch {
            expected: field_count,
            actual: values.len(),
        }),
        None => Err(type_mismatch(schema, value)),
    }
}

/// Enforce a list's maximum element count
pub(crate) fn check_list_length(max_length: Option<usize>, actual: usize) -> Result<()> {
    match max_length {
        Some(max) if actual > max => Err(CodecError::ListTooLong { max, actual }),
        _ => Ok(()),
    }
}

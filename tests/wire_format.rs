//! Wire Format Tests
//!
//! Byte-exact fixtures for the offset layout, plus the error surface seen by
//! callers decoding malformed or truncated input.
//!
//! # Test Organization
//!
//! - Reference encodings (containers, vectors, lists, nesting)
//! - Offset rules (first offset, monotonicity, bounds)
//! - Truncation and budgets (slices and readers)
//! - Schemas handed over as JSON

use std::io::Cursor;

use fixvar::{
    decode, encode, size_of, Codec, CodecConfig, CodecError, NamedSchema, SchemaType, Stream,
    Value,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn header_schema() -> SchemaType {
    SchemaType::container([
        ("a", SchemaType::uint32()),
        ("b", SchemaType::list(SchemaType::uint8())),
    ])
}

fn le32(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

// =============================================================================
// REFERENCE ENCODINGS
// =============================================================================

#[test]
fn container_with_list_field() {
    let value = Value::Container(vec![Value::U32(1), Value::bytes(&[9, 9])]);
    let bytes = encode(&header_schema(), &value).unwrap();
    assert_eq!(bytes, [0x01, 0, 0, 0, 0x08, 0, 0, 0, 0x09, 0x09]);
    assert_eq!(size_of(&header_schema(), &value).unwrap(), 10);
    assert_eq!(decode(&header_schema(), &bytes).unwrap(), value);
}

#[test]
fn fixed_vector_is_raw_concatenation() {
    let schema = SchemaType::vector(3, SchemaType::uint8());
    let value = Value::Vector(vec![Value::U8(5), Value::U8(6), Value::U8(7)]);
    assert_eq!(encode(&schema, &value).unwrap(), [0x05, 0x06, 0x07]);
}

#[test]
fn fixed_container_has_no_offsets() {
    let schema = SchemaType::container([
        ("flag", SchemaType::boolean()),
        ("pair", SchemaType::vector(2, SchemaType::uint16())),
        ("id", SchemaType::uint64()),
    ]);
    assert!(schema.is_fixed());
    assert_eq!(schema.fixed_size(), 13);

    let value = Value::Container(vec![
        Value::Bool(true),
        Value::Vector(vec![Value::U16(0x0102), Value::U16(0x0304)]),
        Value::U64(0x05),
    ]);
    let bytes = encode(&schema, &value).unwrap();
    assert_eq!(
        bytes,
        [1, 0x02, 0x01, 0x04, 0x03, 5, 0, 0, 0, 0, 0, 0, 0]
    );
    assert_eq!(decode(&schema, &bytes).unwrap(), value);
}

#[test]
fn nested_container_in_variable_part() {
    let inner = header_schema();
    let schema = SchemaType::container([
        ("version", SchemaType::uint8()),
        ("header", inner),
    ]);
    let value = Value::Container(vec![
        Value::U8(2),
        Value::Container(vec![Value::U32(1), Value::bytes(&[9, 9])]),
    ]);

    let mut expected = vec![2];
    expected.extend_from_slice(&le32(5));
    expected.extend_from_slice(&[0x01, 0, 0, 0, 0x08, 0, 0, 0, 0x09, 0x09]);

    let bytes = encode(&schema, &value).unwrap();
    assert_eq!(bytes, expected);
    assert_eq!(decode(&schema, &bytes).unwrap(), value);
}

#[test]
fn vector_of_lists_uses_offset_table() {
    let schema = SchemaType::vector(2, SchemaType::list(SchemaType::uint16()));
    let value = Value::Vector(vec![
        Value::List(vec![Value::U16(0xaabb)]),
        Value::List(vec![]),
    ]);

    let mut expected = Vec::new();
    expected.extend_from_slice(&le32(8));
    expected.extend_from_slice(&le32(10));
    expected.extend_from_slice(&[0xbb, 0xaa]);

    let bytes = encode(&schema, &value).unwrap();
    assert_eq!(bytes, expected);
    assert_eq!(decode(&schema, &bytes).unwrap(), value);
}

#[test]
fn list_of_lists_count_comes_from_first_offset() {
    let schema = SchemaType::list(SchemaType::list(SchemaType::uint8()));
    let value = Value::List(vec![
        Value::bytes(&[1, 2]),
        Value::bytes(&[3]),
        Value::bytes(&[]),
        Value::bytes(&[4, 5, 6]),
    ]);
    let bytes = encode(&schema, &value).unwrap();
    assert_eq!(&bytes[..4], &le32(16));
    assert_eq!(bytes.len(), 16 + 6);

    let decoded = decode(&schema, &bytes).unwrap();
    assert_eq!(decoded.elements().map(|e| e.len()), Some(4));
    assert_eq!(decoded, value);
}

#[test]
fn empty_lists_encode_to_nothing() {
    let schema = SchemaType::container([
        ("x", SchemaType::list(SchemaType::uint64())),
        ("y", SchemaType::list(SchemaType::list(SchemaType::uint8()))),
    ]);
    let value = schema.default_value();
    let bytes = encode(&schema, &value).unwrap();
    // Both offsets point at the end of the fixed part
    assert_eq!(bytes, [8, 0, 0, 0, 8, 0, 0, 0]);
    assert_eq!(decode(&schema, &bytes).unwrap(), value);
}

#[test]
fn last_variable_field_ends_at_total_length() {
    let schema = SchemaType::container([
        ("a", SchemaType::list(SchemaType::uint8())),
        ("b", SchemaType::uint16()),
        ("c", SchemaType::list(SchemaType::uint32())),
    ]);
    let value = Value::Container(vec![
        Value::bytes(&[1, 2, 3]),
        Value::U16(7),
        Value::List(vec![Value::U32(8), Value::U32(9)]),
    ]);
    let bytes = encode(&schema, &value).unwrap();

    let first = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    let second = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
    assert_eq!(first, 10);
    assert_eq!(second, first + 3);
    assert_eq!(bytes.len() - second, 8);
}

// =============================================================================
// OFFSET RULES
// =============================================================================

#[test]
fn first_offset_inside_fixed_part_is_rejected() {
    let mut bytes = vec![0x01, 0, 0, 0];
    bytes.extend_from_slice(&le32(4));
    bytes.extend_from_slice(&[9, 9]);
    assert_eq!(
        decode(&header_schema(), &bytes).unwrap_err(),
        CodecError::InvalidOffset {
            expected: 8,
            found: 4
        }
    );
}

#[test]
fn decreasing_offsets_are_rejected() {
    let schema = SchemaType::container([
        ("x", SchemaType::list(SchemaType::uint8())),
        ("y", SchemaType::list(SchemaType::uint8())),
        ("z", SchemaType::list(SchemaType::uint8())),
    ]);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&le32(12));
    bytes.extend_from_slice(&le32(14));
    bytes.extend_from_slice(&le32(13));
    bytes.extend_from_slice(&[0; 3]);
    assert_eq!(
        decode(&schema, &bytes).unwrap_err(),
        CodecError::OffsetNotMonotonic {
            previous: 14,
            offset: 13
        }
    );
}

#[test]
fn offset_past_end_is_rejected() {
    let mut bytes = vec![0x01, 0, 0, 0];
    bytes.extend_from_slice(&le32(11));
    bytes.extend_from_slice(&[9, 9]);
    assert_eq!(
        decode(&header_schema(), &bytes).unwrap_err(),
        CodecError::ValueTooLarge {
            size: 11,
            limit: 10
        }
    );
}

// =============================================================================
// TRUNCATION AND BUDGETS
// =============================================================================

#[test]
fn read_past_known_length_is_unexpected_end() {
    let bytes = [0u8; 5];
    let mut stream = Stream::from_slice(&bytes[..], None).unwrap();
    stream.read_fixed(3).unwrap();
    assert_eq!(
        stream.read_fixed(4).unwrap_err(),
        CodecError::UnexpectedEnd {
            requested: 4,
            available: 2
        }
    );

    let schema = SchemaType::container([
        ("tag", SchemaType::vector(3, SchemaType::uint8())),
        ("n", SchemaType::uint32()),
    ]);
    assert_eq!(
        decode(&schema, &bytes).unwrap_err(),
        CodecError::UnexpectedEnd {
            requested: 4,
            available: 2
        }
    );
}

#[test]
fn short_primitive_is_unexpected_end() {
    assert_eq!(
        decode(&SchemaType::uint32(), &[1, 2, 3]).unwrap_err(),
        CodecError::UnexpectedEnd {
            requested: 4,
            available: 3
        }
    );
}

#[test]
fn every_truncation_of_a_fixed_value_fails() {
    let schema = SchemaType::container([
        ("a", SchemaType::uint64()),
        ("b", SchemaType::vector(2, SchemaType::uint32())),
    ]);
    let bytes = encode(&schema, &schema.default_value()).unwrap();
    for len in 0..bytes.len() {
        assert!(
            matches!(
                decode(&schema, &bytes[..len]),
                Err(CodecError::UnexpectedEnd { .. })
            ),
            "prefix of {} bytes decoded",
            len
        );
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let value = Value::Container(vec![Value::U32(1), Value::bytes(&[9, 9])]);
    let mut bytes = encode(&header_schema(), &value).unwrap();
    // Extra bytes after a list are absorbed by it, so pad a fixed schema instead
    bytes.push(0);
    assert_eq!(
        decode(&header_schema(), &bytes).unwrap(),
        Value::Container(vec![Value::U32(1), Value::bytes(&[9, 9, 0])])
    );
    assert_eq!(
        decode(&SchemaType::vector(2, SchemaType::uint8()), &[1, 2, 3]).unwrap_err(),
        CodecError::TrailingBytes { remaining: 1 }
    );
}

#[test]
fn size_hint_must_match_slice() {
    let bytes = [0u8; 4];
    assert_eq!(
        Stream::from_slice(&bytes[..], Some(8)).unwrap_err(),
        CodecError::SizeMismatch {
            declared: 8,
            actual: 4
        }
    );
}

#[test]
fn reader_with_budget() {
    let codec = Codec::default();
    let value = Value::Container(vec![Value::U32(3), Value::bytes(&[4, 5, 6])]);
    let bytes = encode(&header_schema(), &value).unwrap();
    let len = bytes.len();

    let decoded = codec
        .decode_reader(&header_schema(), Cursor::new(bytes.clone()), Some(len))
        .unwrap();
    assert_eq!(decoded, value);

    // A budget smaller than the fixed part
    let err = codec
        .decode_reader(&header_schema(), Cursor::new(bytes), Some(6))
        .unwrap_err();
    assert_eq!(err, CodecError::ValueTooLarge { size: 4, limit: 2 });
}

#[test]
fn reader_without_budget_reads_to_end() {
    let schema = SchemaType::list(SchemaType::list(SchemaType::uint16()));
    let value = Value::List(vec![
        Value::List(vec![Value::U16(1), Value::U16(2)]),
        Value::List(vec![Value::U16(3)]),
    ]);
    let bytes = encode(&schema, &value).unwrap();
    let decoded = Codec::default()
        .decode_reader(&schema, Cursor::new(bytes), None)
        .unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn truncated_reader_is_unexpected_end() {
    let schema = SchemaType::vector(4, SchemaType::uint32());
    let err = Codec::default()
        .decode_reader(&schema, Cursor::new(vec![0u8; 10]), None)
        .unwrap_err();
    assert_eq!(
        err,
        CodecError::UnexpectedEnd {
            requested: 16,
            available: 10
        }
    );
}

// =============================================================================
// JSON SCHEMAS
// =============================================================================

#[test]
fn schema_from_json_encodes() {
    let json = serde_json::json!({
        "name": "Attestation",
        "schema": {
            "type": "container",
            "fields": [
                {"name": "slot", "schema": {"type": "primitive", "kind": "u64"}},
                {"name": "bits", "schema": {"type": "list", "max_length": 64,
                    "element": {"type": "primitive", "kind": "bool"}}},
                {"name": "root", "schema": {"type": "fixed_vector", "length": 4,
                    "element": {"type": "primitive", "kind": "u8"}}}
            ]
        }
    });
    let named = NamedSchema::from_json(&json.to_string()).unwrap();
    assert_eq!(named.name, "Attestation");

    let codec = Codec::new(CodecConfig::default()).unwrap();
    let value = Value::Container(vec![
        Value::U64(9),
        Value::List(vec![Value::Bool(true), Value::Bool(false)]),
        Value::Vector(vec![Value::U8(1), Value::U8(2), Value::U8(3), Value::U8(4)]),
    ]);
    let bytes = codec.encode_named(&named, &value).unwrap();

    // 8 (slot) + 4 (offset) + 4 (root), then the two booleans
    assert_eq!(bytes.len(), 18);
    assert_eq!(&bytes[8..12], &le32(16));
    assert_eq!(&bytes[12..16], &[1, 2, 3, 4]);
    assert_eq!(&bytes[16..], &[1, 0]);
    assert_eq!(codec.decode_named(&named, &bytes).unwrap(), value);
}

#[test]
fn json_schema_with_bad_shape_is_rejected_by_codec() {
    let named = NamedSchema::from_json(
        r#"{"name": "Empty", "schema": {"type": "container", "fields": []}}"#,
    )
    .unwrap();
    let err = Codec::default()
        .encode_named(&named, &Value::Container(vec![]))
        .unwrap_err();
    assert!(matches!(err, CodecError::Schema(_)));
}

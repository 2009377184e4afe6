//! Error types for the fixvar codec
//!
//! This module defines every failure the codec can report.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! All errors are terminal for the encode/decode call that produced them:
//! the codec never retries and never returns a partial value alongside an error.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while encoding or decoding a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Declared size hint disagrees with the observed source length
    #[error("Size mismatch: declared {declared} bytes, source has {actual}")]
    SizeMismatch {
        /// Size hint supplied by the caller
        declared: usize,
        /// Length observed on the source
        actual: usize,
    },

    /// Source exhausted before a read completed (truncated input)
    #[error("Unexpected end of input: requested {requested} bytes, {available} available")]
    UnexpectedEnd {
        /// Bytes the read asked for
        requested: usize,
        /// Bytes that were actually available
        available: usize,
    },

    /// A read or offset exceeds the declared budget (malformed length field)
    #[error("Value too large: {size} exceeds remaining budget of {limit} bytes")]
    ValueTooLarge {
        /// Requested size or offset
        size: usize,
        /// Budget that was exceeded
        limit: usize,
    },

    /// Byte outside {0, 1} where a boolean was expected
    #[error("Invalid boolean byte: 0x{0:02x}")]
    InvalidBoolean(u8),

    /// Byte span is not a multiple of the element width
    #[error("Misaligned sequence: {len} bytes is not a multiple of element width {width}")]
    MisalignedSequence {
        /// Length of the span
        len: usize,
        /// Element width in bytes
        width: usize,
    },

    /// Offset smaller than its predecessor in the same scope
    #[error("Offset not monotonic: {offset} follows {previous}")]
    OffsetNotMonotonic {
        /// Previously read offset
        previous: u32,
        /// Offending offset
        offset: u32,
    },

    /// First offset does not line up with the end of the fixed part
    #[error("Invalid offset: expected {expected}, found {found}")]
    InvalidOffset {
        /// Offset implied by the fixed part
        expected: usize,
        /// Offset read from the input
        found: usize,
    },

    /// Bytes left over after a complete value was decoded
    #[error("Trailing bytes: {remaining} bytes left after decode")]
    TrailingBytes {
        /// Unconsumed bytes in the scope
        remaining: usize,
    },

    /// List holds more elements than its schema allows
    #[error("List too long: {actual} elements exceeds maximum of {max}")]
    ListTooLong {
        /// Schema maximum
        max: usize,
        /// Element count found
        actual: usize,
    },

    /// Encoded size (or an offset) does not fit the configured limit
    #[error("Encoded size {size} exceeds limit of {limit} bytes")]
    EncodedTooLarge {
        /// Size that was computed
        size: usize,
        /// Limit in force
        limit: usize,
    },

    /// Value variant does not match the schema
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Rendered schema type
        expected: String,
        /// Kind of the value supplied
        found: &'static str,
    },

    /// Fixed vector value has the wrong number of elements
    #[error("Vector length mismatch: expected {expected} elements, got {actual}")]
    VectorLengthMismatch {
        /// Length declared by the schema
        expected: usize,
        /// Length of the value
        actual: usize,
    },

    /// Container value has the wrong number of fields
    #[error("Field count mismatch: expected {expected} fields, got {actual}")]
    FieldCountMismatch {
        /// Fields declared by the schema
        expected: usize,
        /// Fields present in the value
        actual: usize,
    },

    /// Non-EOF failure of the underlying reader
    #[error("I/O error: {0}")]
    Io(String),

    /// Schema rejected by validation
    #[error("Invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

/// Errors raised while validating or loading a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Fixed vector declared with zero elements
    #[error("Vector length must be at least 1")]
    ZeroLengthVector,

    /// List declared with a zero maximum length
    #[error("List maximum length must be at least 1")]
    ZeroMaxLength,

    /// Container with no fields
    #[error("Container must declare at least one field")]
    EmptyContainer,

    /// Field with an empty name
    #[error("Field name must not be empty")]
    EmptyFieldName,

    /// Two fields share a name
    #[error("Duplicate field name: {0}")]
    DuplicateField(String),

    /// Schema nests deeper than allowed
    #[error("Schema nesting depth {depth} exceeds maximum of {max}")]
    NestingTooDeep {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// A fixed part cannot be addressed by a 4-byte offset
    #[error("Schema fixed part exceeds {max} bytes")]
    FixedPartTooLarge {
        /// Largest addressable size
        max: usize,
    },

    /// Schema document could not be parsed
    #[error("Schema parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for CodecError {
    fn from(e: std::io::Error) -> Self {
        CodecError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(e: serde_json::Error) -> Self {
        SchemaError::Parse(e.to_string())
    }
}

//! Schema type model
//!
//! A schema is a tree of [`SchemaType`] nodes drawn from a closed set:
//! primitives, fixed-length vectors, variable-length lists and containers.
//! The tree answers two questions used by both the size calculator and the
//! encoder/decoder:
//!
//! - [`SchemaType::is_fixed`]: is the encoded length identical for every value?
//! - [`SchemaType::fixed_size`]: how many bytes does the type occupy in its
//!   parent's fixed part?
//!
//! ## Serialized Form
//!
//! Schemas are produced by an external front end and may be handed over as
//! JSON. The representation is internally tagged:
//!
//! ```text
//! {"type": "container", "fields": [
//!     {"name": "a", "schema": {"type": "primitive", "kind": "u32"}},
//!     {"name": "b", "schema": {"type": "list", "element": {"type": "primitive", "kind": "u8"}}}
//! ]}
//! ```

use crate::config::{CodecConfig, MAX_ADDRESSABLE_SIZE};
use crate::error::SchemaError;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Width in bytes of an offset slot in a fixed part.
pub const OFFSET_SIZE: usize = 4;

/// Fixed-width unsigned primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Boolean, one byte with domain {0, 1}
    Bool,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
}

impl PrimitiveKind {
    /// Encoded width in bytes
    pub const fn width(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::U8 => 1,
            PrimitiveKind::U16 => 2,
            PrimitiveKind::U32 => 4,
            PrimitiveKind::U64 => 8,
        }
    }

    /// Short type name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named member of a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    pub schema: SchemaType,
}

impl Field {
    /// Create a new field
    pub fn new(name: impl Into<String>, schema: SchemaType) -> Self {
        Field {
            name: name.into(),
            schema,
        }
    }
}

/// Schema type descriptor
///
/// Field order in a [`SchemaType::Container`] is the wire order: it fixes the
/// order of inline values, of offsets, and of variable-data blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaType {
    /// Fixed-width primitive
    Primitive {
        /// Primitive kind
        kind: PrimitiveKind,
    },
    /// Vector whose length is part of the schema
    FixedVector {
        /// Number of elements, at least 1
        length: usize,
        /// Element type
        element: Box<SchemaType>,
    },
    /// Variable-length list; the count is recovered from the byte span
    List {
        /// Optional upper bound on the element count
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        /// Element type
        element: Box<SchemaType>,
    },
    /// Ordered record of named fields
    Container {
        /// Fields in wire order
        fields: Vec<Field>,
    },
}

impl SchemaType {
    /// Primitive schema of the given kind
    pub fn primitive(kind: PrimitiveKind) -> Self {
        SchemaType::Primitive { kind }
    }

    /// Boolean schema
    pub fn boolean() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    /// 8-bit unsigned schema
    pub fn uint8() -> Self {
        Self::primitive(PrimitiveKind::U8)
    }

    /// 16-bit unsigned schema
    pub fn uint16() -> Self {
        Self::primitive(PrimitiveKind::U16)
    }

    /// 32-bit unsigned schema
    pub fn uint32() -> Self {
        Self::primitive(PrimitiveKind::U32)
    }

    /// 64-bit unsigned schema
    pub fn uint64() -> Self {
        Self::primitive(PrimitiveKind::U64)
    }

    /// Fixed-length vector schema
    pub fn vector(length: usize, element: SchemaType) -> Self {
        SchemaType::FixedVector {
            length,
            element: Box::new(element),
        }
    }

    /// Unbounded list schema
    pub fn list(element: SchemaType) -> Self {
        SchemaType::List {
            max_length: None,
            element: Box::new(element),
        }
    }

    /// List schema with a maximum element count
    pub fn bounded_list(max_length: usize, element: SchemaType) -> Self {
        SchemaType::List {
            max_length: Some(max_length),
            element: Box::new(element),
        }
    }

    /// Container schema from `(name, schema)` pairs in wire order
    pub fn container<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaType)>,
        S: Into<String>,
    {
        SchemaType::Container {
            fields: fields
                .into_iter()
                .map(|(name, schema)| Field::new(name, schema))
                .collect(),
        }
    }

    /// True if every value of this type encodes to the same length
    pub fn is_fixed(&self) -> bool {
        match self {
            SchemaType::Primitive { .. } => true,
            SchemaType::FixedVector { element, .. } => element.is_fixed(),
            SchemaType::List { .. } => false,
            SchemaType::Container { fields } => fields.iter().all(|f| f.schema.is_fixed()),
        }
    }

    /// Bytes this type occupies in a parent's fixed part
    ///
    /// The full encoded size for fixed types, [`OFFSET_SIZE`] for variable ones.
    /// Saturates at `usize::MAX` for schemas that [`SchemaType::validate`]
    /// rejects as unaddressable.
    pub fn fixed_size(&self) -> usize {
        self.checked_fixed_size().unwrap_or(usize::MAX)
    }

    /// [`SchemaType::fixed_size`], or `None` if it overflows `usize`
    pub fn checked_fixed_size(&self) -> Option<usize> {
        if !self.is_fixed() {
            return Some(OFFSET_SIZE);
        }
        match self {
            SchemaType::Primitive { kind } => Some(kind.width()),
            SchemaType::FixedVector { length, element } => {
                length.checked_mul(element.checked_fixed_size()?)
            }
            SchemaType::List { .. } => Some(OFFSET_SIZE),
            SchemaType::Container { fields } => fields_fixed_len(fields),
        }
    }

    /// Length of this type's own fixed part, when the schema determines it
    ///
    /// For containers this is the sum of each field's fixed contribution, with
    /// [`OFFSET_SIZE`] for every variable field. A vector of variable elements
    /// has an offset table of `length` slots. Lists have no schema-determined
    /// fixed part and return `None`. Saturates like [`SchemaType::fixed_size`].
    pub fn fixed_part_len(&self) -> Option<usize> {
        match self {
            SchemaType::List { .. } => None,
            _ => Some(self.checked_fixed_part_len().unwrap_or(usize::MAX)),
        }
    }

    fn checked_fixed_part_len(&self) -> Option<usize> {
        match self {
            SchemaType::Container { fields } => fields_fixed_len(fields),
            SchemaType::FixedVector { length, element } if !element.is_fixed() => {
                length.checked_mul(OFFSET_SIZE)
            }
            SchemaType::List { .. } => Some(0),
            _ => self.checked_fixed_size(),
        }
    }

    /// Nesting depth of the schema tree; a primitive has depth 1
    pub fn depth(&self) -> usize {
        match self {
            SchemaType::Primitive { .. } => 1,
            SchemaType::FixedVector { element, .. } | SchemaType::List { element, .. } => {
                1 + element.depth()
            }
            SchemaType::Container { fields } => {
                1 + fields.iter().map(|f| f.schema.depth()).max().unwrap_or(0)
            }
        }
    }

    /// Check structural rules, the configured nesting limit, and that every
    /// fixed part fits in [`MAX_ADDRESSABLE_SIZE`] bytes
    pub fn validate(&self, config: &CodecConfig) -> Result<(), SchemaError> {
        let depth = self.depth();
        if depth > config.max_nesting_depth {
            return Err(SchemaError::NestingTooDeep {
                depth,
                max: config.max_nesting_depth,
            });
        }
        self.validate_node()
    }

    fn validate_node(&self) -> Result<(), SchemaError> {
        match self {
            SchemaType::Primitive { .. } => {}
            SchemaType::FixedVector { length, element } => {
                if *length == 0 {
                    return Err(SchemaError::ZeroLengthVector);
                }
                element.validate_node()?;
            }
            SchemaType::List {
                max_length,
                element,
            } => {
                if *max_length == Some(0) {
                    return Err(SchemaError::ZeroMaxLength);
                }
                element.validate_node()?;
            }
            SchemaType::Container { fields } => {
                if fields.is_empty() {
                    return Err(SchemaError::EmptyContainer);
                }
                let mut seen = HashSet::with_capacity(fields.len());
                for field in fields {
                    if field.name.is_empty() {
                        return Err(SchemaError::EmptyFieldName);
                    }
                    if !seen.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField(field.name.clone()));
                    }
                    field.schema.validate_node()?;
                }
            }
        }

        // Children are already addressable, so only this node can overflow
        let addressable = |len: Option<usize>| len.map_or(false, |len| len <= MAX_ADDRESSABLE_SIZE);
        if addressable(self.checked_fixed_size()) && addressable(self.checked_fixed_part_len()) {
            Ok(())
        } else {
            Err(SchemaError::FixedPartTooLarge {
                max: MAX_ADDRESSABLE_SIZE,
            })
        }
    }

    /// Zero value of this type
    ///
    /// `false`/`0` for primitives, `length` zero elements for vectors, an
    /// empty list, and zero values for every container field.
    pub fn default_value(&self) -> Value {
        match self {
            SchemaType::Primitive { kind } => match kind {
                PrimitiveKind::Bool => Value::Bool(false),
                PrimitiveKind::U8 => Value::U8(0),
                PrimitiveKind::U16 => Value::U16(0),
                PrimitiveKind::U32 => Value::U32(0),
                PrimitiveKind::U64 => Value::U64(0),
            },
            SchemaType::FixedVector { length, element } => {
                Value::Vector((0..*length).map(|_| element.default_value()).collect())
            }
            SchemaType::List { .. } => Value::List(Vec::new()),
            SchemaType::Container { fields } => {
                Value::Container(fields.iter().map(|f| f.schema.default_value()).collect())
            }
        }
    }
}

fn fields_fixed_len(fields: &[Field]) -> Option<usize> {
    fields
        .iter()
        .try_fold(0usize, |len, f| len.checked_add(f.schema.checked_fixed_size()?))
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Primitive { kind } => write!(f, "{}", kind),
            SchemaType::FixedVector { length, element } => {
                write!(f, "vector<{}, {}>", element, length)
            }
            SchemaType::List {
                max_length: Some(max),
                element,
            } => write!(f, "list<{}, {}>", element, max),
            SchemaType::List {
                max_length: None,
                element,
            } => write!(f, "list<{}>", element),
            SchemaType::Container { fields } => {
                f.write_str("container{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.schema)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Schema handed over by the front end, named for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedSchema {
    /// Declared type name
    pub name: String,
    /// Schema tree
    pub schema: SchemaType,
}

impl NamedSchema {
    /// Create a named schema
    pub fn new(name: impl Into<String>, schema: SchemaType) -> Self {
        NamedSchema {
            name: name.into(),
            schema,
        }
    }

    /// Parse a named schema from JSON
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the named schema as JSON
    pub fn to_json(&self) -> Result<String, SchemaError> {
        Ok(serde_json::to_string(self)?)
    }
}

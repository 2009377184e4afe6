//! Value types for fixvar
//!
//! A [`Value`] is an instance conforming to a [`SchemaType`](crate::SchemaType).
//! Values carry no schema information of their own: container values are
//! positional, and field names live in the schema.
//!
//! ## Type Rules
//!
//! - Different variants are never equal: `U8(1) != U16(1)`
//! - `Vector` and `List` are distinct even with identical elements

/// Decoded or to-be-encoded value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Boolean
    Bool(bool),
    /// 8-bit unsigned integer
    U8(u8),
    /// 16-bit unsigned integer
    U16(u16),
    /// 32-bit unsigned integer
    U32(u32),
    /// 64-bit unsigned integer
    U64(u64),
    /// Elements of a fixed-length vector
    Vector(Vec<Value>),
    /// Elements of a variable-length list
    List(Vec<Value>),
    /// Container fields in schema order
    Container(Vec<Value>),
}

impl Value {
    /// Variant name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::Vector(_) => "vector",
            Value::List(_) => "list",
            Value::Container(_) => "container",
        }
    }

    /// Elements of a vector or list
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(items) | Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Fields of a container
    pub fn fields(&self) -> Option<&[Value]> {
        match self {
            Value::Container(fields) => Some(fields),
            _ => None,
        }
    }

    /// Build a byte list
    pub fn bytes(data: &[u8]) -> Self {
        Value::List(data.iter().copied().map(Value::U8).collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Value::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::U64(v)
    }
}

//! fixvar - Offset-layout binary codec
//!
//! Encodes schema-described values into a compact format split into a fixed
//! part and a variable part. Fixed-size fields sit inline; every variable-size
//! field is replaced by a 4-byte little-endian offset to its data.
//!
//! # Quick Start
//!
//! ```
//! use fixvar::{decode, encode, SchemaType, Value};
//!
//! let schema = SchemaType::container([
//!     ("a", SchemaType::uint32()),
//!     ("b", SchemaType::list(SchemaType::uint8())),
//! ]);
//! let value = Value::Container(vec![Value::U32(1), Value::bytes(&[9, 9])]);
//!
//! let bytes = encode(&schema, &value).unwrap();
//! assert_eq!(bytes, [1, 0, 0, 0, 8, 0, 0, 0, 9, 9]);
//! assert_eq!(decode(&schema, &bytes).unwrap(), value);
//! ```
//!
//! # Architecture
//!
//! Schema, value, error and configuration types live in `fixvar-core`; the
//! buffer, cursor, encoder and decoder live in `fixvar-codec`. Both are
//! re-exported here.

pub use fixvar_codec::*;
pub use fixvar_core::*;

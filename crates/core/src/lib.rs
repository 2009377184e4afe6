//! Core types for fixvar
//!
//! This crate defines the foundational types shared by the codec:
//! - SchemaType: closed schema model (primitive, fixed vector, list, container)
//! - NamedSchema: schema hand-off record from a front end (JSON capable)
//! - Value: instances conforming to a schema
//! - CodecError / SchemaError: error type hierarchy
//! - CodecConfig: encode/decode limits

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod schema;
pub mod value;

pub use config::{CodecConfig, ConfigError, MAX_ADDRESSABLE_SIZE};
pub use error::{CodecError, Result, SchemaError};
pub use schema::{Field, NamedSchema, PrimitiveKind, SchemaType, OFFSET_SIZE};
pub use value::Value;

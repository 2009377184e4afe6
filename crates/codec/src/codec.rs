//! Configured codec entry point
//!
//! [`Codec`] bundles a validated [`CodecConfig`] and checks every schema
//! against it before encoding or decoding. It holds no mutable state and can
//! be shared freely across threads.

use crate::{decode, encode, size};
use fixvar_core::{
    CodecConfig, ConfigError, NamedSchema, Result, SchemaType, Value,
};
use std::io::Read;

/// Schema-checked encoder/decoder
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec after validating `config`
    pub fn new(config: CodecConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Codec { config })
    }

    /// Active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Check a schema's structure and nesting depth
    pub fn validate_schema(&self, schema: &SchemaType) -> Result<()> {
        schema.validate(&self.config)?;
        Ok(())
    }

    /// Exact encoded size of `value`
    pub fn size_of(&self, schema: &SchemaType, value: &Value) -> Result<usize> {
        self.validate_schema(schema)?;
        size::size_of(schema, value)
    }

    /// Encode `value` under `schema`
    pub fn encode(&self, schema: &SchemaType, value: &Value) -> Result<Vec<u8>> {
        self.validate_schema(schema)?;
        encode::encode_labelled(schema, value, &self.config, None)
    }

    /// Encode under a named schema; the name is attached to log events
    pub fn encode_named(&self, named: &NamedSchema, value: &Value) -> Result<Vec<u8>> {
        self.validate_schema(&named.schema)?;
        encode::encode_labelled(&named.schema, value, &self.config, Some(&named.name))
    }

    /// Decode a complete encoding
    pub fn decode(&self, schema: &SchemaType, bytes: &[u8]) -> Result<Value> {
        self.validate_schema(schema)?;
        decode::decode_labelled(schema, bytes, &self.config, None)
    }

    /// Decode under a named schema; the name is attached to log events
    pub fn decode_named(&self, named: &NamedSchema, bytes: &[u8]) -> Result<Value> {
        self.validate_schema(&named.schema)?;
        decode::decode_labelled(&named.schema, bytes, &self.config, Some(&named.name))
    }

    /// Decode one value from a reader, see [`decode::decode_reader`]
    pub fn decode_reader<R: Read>(
        &self,
        schema: &SchemaType,
        reader: R,
        size_hint: Option<usize>,
    ) -> Result<Value> {
        self.validate_schema(schema)?;
        decode::decode_reader(schema, reader, size_hint, &self.config)
    }
}

//! Offset-layout codec for fixvar
//!
//! This crate turns schema-described values into bytes and back:
//!
//! - Primitive codec: little-endian booleans and unsigned integers
//! - EncodeBuffer: growable, owned output buffer
//! - Stream: bounded input cursor with the pending-offset queue
//! - Size calculator: exact encoded length ahead of encoding
//! - Encoder / decoder: fixed part with 4-byte offsets, then variable part
//! - Codec: configured, schema-checked entry point

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod buffer; // Growable output buffer
pub mod codec; // Configured entry point
pub mod decode; // Decoder over slices and readers
pub mod encode; // Two-phase encoder
pub mod primitives; // Little-endian scalar codec
pub mod size; // Encoded size calculator
pub mod stream; // Bounded input cursor

// === Re-exports ===
pub use buffer::EncodeBuffer;
pub use codec::Codec;
pub use decode::{decode, decode_reader, decode_stream, decode_with_config};
pub use encode::{encode, encode_into, encode_with_config};
pub use primitives::FixedWidth;
pub use size::size_of;
pub use stream::Stream;

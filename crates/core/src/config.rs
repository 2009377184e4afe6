//! Codec configuration.
//!
//! Limits enforced while encoding and decoding. Offsets are 4 bytes wide, so no
//! encoding may ever exceed `u32::MAX` bytes regardless of configuration.

use thiserror::Error;

/// Largest encoding addressable by a 4-byte offset.
pub const MAX_ADDRESSABLE_SIZE: usize = u32::MAX as usize;

/// Codec configuration parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Maximum encoded size in bytes (default: `u32::MAX`).
    ///
    /// Applies to encoder output and to the length of decoder input.
    pub max_encoded_size: usize,

    /// Maximum schema nesting depth (default: 64).
    pub max_nesting_depth: usize,

    /// Initial capacity of the encode buffer (default: 256 bytes).
    ///
    /// Never exceeds the computed size of the value being encoded.
    pub initial_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            max_encoded_size: MAX_ADDRESSABLE_SIZE,
            max_nesting_depth: 64,
            initial_capacity: 256,
        }
    }
}

impl CodecConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum encoded size (builder pattern).
    pub fn with_max_encoded_size(mut self, size: usize) -> Self {
        self.max_encoded_size = size;
        self
    }

    /// Set maximum nesting depth (builder pattern).
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Set initial buffer capacity (builder pattern).
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_encoded_size == 0 {
            return Err(ConfigError::ZeroEncodedSize);
        }
        if self.max_encoded_size > MAX_ADDRESSABLE_SIZE {
            return Err(ConfigError::EncodedSizeNotAddressable {
                size: self.max_encoded_size,
            });
        }
        if self.max_nesting_depth == 0 {
            return Err(ConfigError::ZeroNestingDepth);
        }
        Ok(())
    }

    /// Create a configuration with small limits for testing.
    pub fn for_testing() -> Self {
        CodecConfig {
            max_encoded_size: 64 * 1024,
            max_nesting_depth: 8,
            initial_capacity: 16,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Maximum encoded size is zero.
    #[error("Maximum encoded size must be at least 1 byte")]
    ZeroEncodedSize,

    /// Maximum encoded size cannot be addressed by a 4-byte offset.
    #[error("Maximum encoded size {size} exceeds the 4-byte offset range")]
    EncodedSizeNotAddressable {
        /// Configured size
        size: usize,
    },

    /// Maximum nesting depth is zero.
    #[error("Maximum nesting depth must be at least 1")]
    ZeroNestingDepth,
}

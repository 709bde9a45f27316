//! # Payload Limits
//!
//! State tokens come back from the browser, so every length derived from
//! one is attacker controlled.

use super::compressor::CompressionError;

/// Upper bound for an inflated or deserialized state payload (32 MiB).
pub const MAX_DECOMPRESSED_SIZE: usize = 32 * 1024 * 1024;

/// Reject an inflated payload longer than [`MAX_DECOMPRESSED_SIZE`].
pub fn check_decompressed_len(len: usize) -> Result<(), CompressionError> {
    if len > MAX_DECOMPRESSED_SIZE {
        return Err(CompressionError::TooLarge);
    }
    Ok(())
}

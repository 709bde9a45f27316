//! # State Compression
//!
//! Zstd compression with a one-byte frame header recording whether the
//! payload was actually compressed.

use std::io::{self, Read};

use super::security::{check_decompressed_len, MAX_DECOMPRESSED_SIZE};

/// Frame header: payload stored as-is.
pub const FLAG_RAW: u8 = 0x00;
/// Frame header: payload is a zstd frame.
pub const FLAG_COMPRESSED: u8 = 0x01;

// =============================================================================
// COMPRESSION CONFIGURATION
// =============================================================================

/// Configuration for state compression
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Compression level (1-22, default 3)
    pub level: i32,
    /// Compress on write. Decompression is always available.
    pub enabled: bool,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: 3,
            enabled: true,
        }
    }
}

impl CompressionConfig {
    pub fn disabled() -> Self {
        Self {
            level: 3,
            enabled: false,
        }
    }

    /// Create config for testing (fast)
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            level: 1,
            enabled: true,
        }
    }
}

// =============================================================================
// COMPRESSION ERROR
// =============================================================================

/// Errors during compression/decompression
#[derive(Debug, thiserror::Error)]
pub enum CompressionError {
    /// Compression failed
    #[error("Compression failed: {0}")]
    CompressFailed(io::Error),
    /// Decompression failed
    #[error("Decompression failed: {0}")]
    DecompressFailed(io::Error),
    /// Output would exceed the decompression limit
    #[error("Decompressed payload exceeds {MAX_DECOMPRESSED_SIZE} bytes")]
    TooLarge,
    /// Framed payload is empty
    #[error("Missing compression frame header")]
    MissingFrame,
    /// Frame header byte is not recognised
    #[error("Unknown compression frame flag {0:#04x}")]
    UnknownFlag(u8),
}

// =============================================================================
// COMPRESSOR TRAIT
// =============================================================================

/// Trait for state compression implementations
pub trait StateCompressor: Send + Sync {
    /// Compress data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
    /// Decompress data, bounded by [`MAX_DECOMPRESSED_SIZE`]
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError>;
    /// Check if compression on write is enabled
    fn is_enabled(&self) -> bool;
}

// =============================================================================
// ZSTD COMPRESSOR
// =============================================================================

/// Zstd-based compressor
#[derive(Debug, Clone, Default)]
pub struct ZstdCompressor {
    config: CompressionConfig,
}

impl ZstdCompressor {
    /// Create a new Zstd compressor
    pub fn new(config: CompressionConfig) -> Self {
        Self { config }
    }
}

impl StateCompressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        zstd::encode_all(data, self.config.level).map_err(CompressionError::CompressFailed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let decoder = zstd::stream::Decoder::new(data).map_err(CompressionError::DecompressFailed)?;
        let mut output = Vec::new();
        decoder
            .take(MAX_DECOMPRESSED_SIZE as u64 + 1)
            .read_to_end(&mut output)
            .map_err(CompressionError::DecompressFailed)?;
        check_decompressed_len(output.len())?;
        Ok(output)
    }

    fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}

// =============================================================================
// FRAMING
// =============================================================================

/// Compress `data` if enabled and smaller, prefixing the frame header.
pub fn compress_if_smaller(
    compressor: &dyn StateCompressor,
    data: &[u8],
) -> Result<Vec<u8>, CompressionError> {
    if compressor.is_enabled() {
        let compressed = compressor.compress(data)?;
        if compressed.len() < data.len() {
            let mut framed = Vec::with_capacity(compressed.len() + 1);
            framed.push(FLAG_COMPRESSED);
            framed.extend_from_slice(&compressed);
            return Ok(framed);
        }
    }

    let mut framed = Vec::with_capacity(data.len() + 1);
    framed.push(FLAG_RAW);
    framed.extend_from_slice(data);
    Ok(framed)
}

/// Inverse of [`compress_if_smaller`].
pub fn decompress_framed(
    compressor: &dyn StateCompressor,
    framed: &[u8],
) -> Result<Vec<u8>, CompressionError> {
    match framed.split_first() {
        None => Err(CompressionError::MissingFrame),
        Some((&FLAG_RAW, rest)) => Ok(rest.to_vec()),
        Some((&FLAG_COMPRESSED, rest)) => compressor.decompress(rest),
        Some((&flag, _)) => Err(CompressionError::UnknownFlag(flag)),
    }
}

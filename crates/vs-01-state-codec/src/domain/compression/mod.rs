//! # Compression Module
//!
//! Zstd compression for state payloads, applied only when it shrinks them.

mod compressor;
pub mod security;


// Re-export public types
pub use compressor::{
    compress_if_smaller, decompress_framed, CompressionConfig, CompressionError, StateCompressor,
    ZstdCompressor, FLAG_COMPRESSED, FLAG_RAW,
};

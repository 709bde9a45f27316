//! # Domain Layer
//!
//! Pure codec building blocks: configuration, key material, compression,
//! transport encoding and value serialization.

pub mod compression;
pub mod config;
pub mod encoding;
pub mod errors;
pub mod keys;
pub mod serialization;

pub use compression::{CompressionConfig, CompressionError, StateCompressor, ZstdCompressor};
pub use config::{params, CipherAlgorithm, CipherMode, CodecConfig};
pub use errors::CodecError;
pub use keys::{DerivedKeys, KeyStore};

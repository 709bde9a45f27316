//! # Domain Errors
//!
//! Error types for the state codec.
//!
//! ## Design Principles
//!
//! - Tampering always surfaces as `Integrity`, never as plausible plaintext
//! - Misconfiguration names the missing or invalid setting
//! - Malformed input is a `Decode` error, never a silent wrong result

use shared_crypto::CryptoError;
use thiserror::Error;

use super::compression::CompressionError;

/// Errors produced while building or reading a state token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// MAC or AEAD tag did not verify.
    #[error("State integrity check failed: {0}")]
    Integrity(String),

    /// Token or payload is structurally malformed.
    #[error("Malformed state token: {0}")]
    Decode(String),

    /// Required setting missing or unusable.
    #[error("State codec misconfigured: {0}")]
    Configuration(String),

    /// Cipher failed while sealing a payload.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Compressor failed on otherwise well-formed input.
    #[error("Compression failed: {0}")]
    Compression(String),

    /// Value could not be (de)serialized.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<CompressionError> for CodecError {
    fn from(err: CompressionError) -> Self {
        match err {
            CompressionError::MissingFrame | CompressionError::UnknownFlag(_) => {
                CodecError::Decode(err.to_string())
            }
            CompressionError::DecompressFailed(_) => CodecError::Decode(err.to_string()),
            CompressionError::CompressFailed(_) | CompressionError::TooLarge => {
                CodecError::Compression(err.to_string())
            }
        }
    }
}

impl From<CryptoError> for CodecError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MacMismatch | CryptoError::DecryptionFailed(_) => {
                CodecError::Integrity(err.to_string())
            }
            CryptoError::InvalidKeyLength { .. } => CodecError::Configuration(err.to_string()),
            CryptoError::InvalidNonceLength { .. } => CodecError::Decode(err.to_string()),
            CryptoError::EncryptionFailed(_) => CodecError::Encryption(err.to_string()),
        }
    }
}

impl From<bincode::Error> for CodecError {
    fn from(err: bincode::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}

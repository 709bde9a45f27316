//! Inbound (Driving) ports for the state codec.

use crate::domain::CodecError;

/// Byte-level token operations.
///
/// `construct` and `reconstruct` are the full pipelines; the individual
/// stages are exposed for callers that only need part of them.
pub trait StateCodecApi: Send + Sync {
    /// Compress (if enabled), encrypt (if enabled) and encode.
    fn construct(&self, payload: &[u8]) -> Result<String, CodecError>;

    /// Inverse of [`construct`](Self::construct).
    fn reconstruct(&self, token: &str) -> Result<Vec<u8>, CodecError>;

    /// Seal bytes: `nonce || ciphertext || hmac`.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Verify the MAC then open.
    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Compress with a frame header.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// Inverse of [`compress`](Self::compress).
    fn decompress(&self, framed: &[u8]) -> Result<Vec<u8>, CodecError>;

    /// URL-safe transport encoding.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Inverse of [`encode`](Self::encode).
    fn decode(&self, token: &str) -> Result<Vec<u8>, CodecError>;
}

//! # Value Serialization
//!
//! Bincode with an explicit size limit so a crafted length prefix cannot
//! drive a huge allocation during decode.

use bincode::Options;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::compression::security::MAX_DECOMPRESSED_SIZE;
use super::errors::CodecError;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_DECOMPRESSED_SIZE as u64)
        .reject_trailing_bytes()
}

/// Serialize `value` to bytes.
pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    Ok(options().serialize(value)?)
}

/// Deserialize a value produced by [`to_bytes`].
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    Ok(options().deserialize(bytes)?)
}

//! # Transport Encoding
//!
//! Tokens travel in form fields and URLs, so they use the URL-safe base64
//! alphabet without padding. Configured key material uses standard base64.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use super::errors::CodecError;

/// Encode bytes as a URL-safe token.
pub fn encode_token(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode a URL-safe token.
pub fn decode_token(token: &str) -> Result<Vec<u8>, CodecError> {
    URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| CodecError::Decode(format!("invalid token encoding: {e}")))
}

/// Decode a configured base64 secret. `name` is the setting it came from.
pub fn decode_setting(name: &str, value: &str) -> Result<Vec<u8>, CodecError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| CodecError::Configuration(format!("{name} is not valid base64: {e}")))
}

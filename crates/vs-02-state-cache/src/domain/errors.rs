//! # Domain Errors
//!
//! Expiry is not an error: an evicted, timed-out or cross-view token
//! restores as `Ok(None)`. Only malformed or tampered tokens fail.

use thiserror::Error;
use vs_01_state_codec::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateCacheError {
    /// Codec failure (integrity, configuration, decode).
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Token does not have the shape of a session key.
    #[error("Invalid state token: {0}")]
    InvalidToken(String),

    /// Save attempted after the session was invalidated.
    #[error("Session {0} is no longer valid")]
    SessionInvalidated(String),
}

impl From<shared_types::KeyDecodeError> for StateCacheError {
    fn from(err: shared_types::KeyDecodeError) -> Self {
        StateCacheError::InvalidToken(err.to_string())
    }
}

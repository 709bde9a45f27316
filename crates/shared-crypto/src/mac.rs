//! # HMAC-SHA256
//!
//! Message authentication with a key independent of the encryption key.

use crate::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// Tag length in bytes.
pub const MAC_LEN: usize = 32;

/// Minimum accepted MAC key length.
pub const MIN_MAC_KEY_LEN: usize = 32;

/// MAC key (at least 256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct MacKey(Vec<u8>);

impl MacKey {
    /// Create from bytes, rejecting keys shorter than [`MIN_MAC_KEY_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() < MIN_MAC_KEY_LEN {
            return Err(CryptoError::InvalidKeyLength {
                expected: MIN_MAC_KEY_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        Self(crate::random_bytes::<MIN_MAC_KEY_LEN>().to_vec())
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MacKey(..)")
    }
}

fn keyed(key: &MacKey) -> HmacSha256 {
    // HMAC accepts keys of any length.
    match HmacSha256::new_from_slice(key.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts keys of any length"),
    }
}

/// Compute HMAC-SHA256 over the concatenation of `parts`.
pub fn hmac_sha256(key: &MacKey, parts: &[&[u8]]) -> [u8; MAC_LEN] {
    let mut mac = keyed(key);
    for part in parts {
        mac.update(part);
    }
    let mut tag = [0u8; MAC_LEN];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    tag
}

/// Verify `tag` over the concatenation of `parts`.
///
/// # Security
///
/// Uses constant-time comparison to prevent timing attacks.
pub fn verify_hmac_sha256(key: &MacKey, parts: &[&[u8]], tag: &[u8]) -> Result<(), CryptoError> {
    let mut mac = keyed(key);
    for part in parts {
        mac.update(part);
    }
    mac.verify_slice(tag).map_err(|_| CryptoError::MacMismatch)
}

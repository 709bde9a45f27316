//! # Symmetric Encryption
//!
//! Provides AES-256-GCM and XChaCha20-Poly1305 with caller-supplied nonces.
//!
//! ## Security Properties
//!
//! - **AES-256-GCM**: 96-bit nonce, use with AES-NI hardware acceleration
//! - **XChaCha20-Poly1305**: 192-bit nonce, constant-time ARX design, safe with
//!   fully random nonces

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    XChaCha20Poly1305, XNonce,
};
use zeroize::Zeroize;

/// Key length shared by both ciphers.
pub const KEY_LEN: usize = 32;

/// Secret key (256-bit).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; KEY_LEN]);

impl SecretKey {
    /// Create from bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, checking its length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; KEY_LEN] =
            bytes
                .try_into()
                .map_err(|_| CryptoError::InvalidKeyLength {
                    expected: KEY_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Generate random key.
    pub fn generate() -> Self {
        Self(random_bytes())
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// Cipher selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cipher {
    /// AES-256-GCM (default, 12-byte nonce)
    #[default]
    Aes256Gcm,
    /// XChaCha20-Poly1305 (24-byte nonce)
    XChaCha20Poly1305,
}

impl Cipher {
    /// Nonce length in bytes.
    pub const fn nonce_len(&self) -> usize {
        match self {
            Cipher::Aes256Gcm => 12,
            Cipher::XChaCha20Poly1305 => 24,
        }
    }

    /// Authentication tag length appended to every ciphertext.
    pub const fn tag_len(&self) -> usize {
        16
    }

    fn check_nonce(&self, nonce: &[u8]) -> Result<(), CryptoError> {
        if nonce.len() != self.nonce_len() {
            return Err(CryptoError::InvalidNonceLength {
                expected: self.nonce_len(),
                actual: nonce.len(),
            });
        }
        Ok(())
    }
}

/// Fill a fixed-size array from the thread-local CSPRNG.
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::RngCore::fill_bytes(&mut rand::thread_rng(), &mut bytes);
    bytes
}

/// Encrypt plaintext under `nonce`.
///
/// The returned ciphertext includes the AEAD tag.
///
/// # Errors
///
/// Returns `CryptoError::InvalidNonceLength` for a nonce of the wrong size and
/// `CryptoError::EncryptionFailed` if encryption fails.
pub fn encrypt(
    cipher: Cipher,
    key: &SecretKey,
    nonce: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    cipher.check_nonce(nonce)?;
    let result = match cipher {
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .encrypt(aes_gcm::Nonce::from_slice(nonce), plaintext),
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .encrypt(XNonce::from_slice(nonce), plaintext),
    };
    result.map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt ciphertext produced by [`encrypt`].
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` if the key is wrong or any byte of
/// the ciphertext or tag was modified.
pub fn decrypt(
    cipher: Cipher,
    key: &SecretKey,
    nonce: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    cipher.check_nonce(nonce)?;
    let result = match cipher {
        Cipher::Aes256Gcm => Aes256Gcm::new(key.as_bytes().into())
            .decrypt(aes_gcm::Nonce::from_slice(nonce), ciphertext),
        Cipher::XChaCha20Poly1305 => XChaCha20Poly1305::new(key.as_bytes().into())
            .decrypt(XNonce::from_slice(nonce), ciphertext),
    };
    result.map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

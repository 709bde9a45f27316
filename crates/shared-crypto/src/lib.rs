//! # Shared Crypto - Token Protection Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | AES-256-GCM, XChaCha20-Poly1305 | View-state encryption |
//! | `mac` | HMAC-SHA256 | Encrypt-then-MAC integrity |
//!
//! ## Security Properties
//!
//! - **AEAD**: every ciphertext carries its own authentication tag
//! - **HMAC**: independent key, verified in constant time before decryption
//! - **Zeroize**: key material is wiped on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod mac;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use mac::{hmac_sha256, verify_hmac_sha256, MacKey, MAC_LEN};
pub use symmetric::{decrypt, encrypt, random_bytes, Cipher, SecretKey, KEY_LEN};


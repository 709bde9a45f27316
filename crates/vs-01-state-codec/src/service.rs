//! # State Codec Service
//!
//! Token pipeline:
//!
//! ```text
//! construct:   bytes ─► frame/compress ─► encrypt + MAC ─► base64url
//! reconstruct: base64url ─► verify MAC ─► decrypt ─► unframe/decompress ─► bytes
//! ```
//!
//! Sealed layout: `nonce || aead_ciphertext || hmac_sha256(nonce || aead_ciphertext)`.
//! The MAC is checked in constant time before anything is decrypted.

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_crypto::{decrypt, encrypt, hmac_sha256, random_bytes, verify_hmac_sha256, MAC_LEN};
use shared_types::ConfigError;

use crate::domain::compression::{compress_if_smaller, decompress_framed};
use crate::domain::config::FIXED_FIELD_LEN;
use crate::domain::{
    encoding, serialization, CipherMode, CodecConfig, CodecError, CompressionConfig, KeyStore,
    ZstdCompressor,
};
use crate::ports::StateCodecApi;

/// Builds and reads opaque state tokens.
///
/// Thread-safe; one instance is shared by every request.
#[derive(Debug)]
pub struct StateCodec {
    config: CodecConfig,
    keys: KeyStore,
    compressor: ZstdCompressor,
}

impl StateCodec {
    /// Create a codec, validating `config`.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let compressor = ZstdCompressor::new(CompressionConfig {
            level: config.compression_level,
            enabled: config.compress_state,
        });
        tracing::info!(
            encryption = config.use_encryption,
            compression = config.compress_state,
            algorithm = %config.algorithm,
            mode = %config.algorithm_parameters,
            "[vs-01] State codec initialized"
        );
        Ok(Self {
            keys: KeyStore::new(config.clone()),
            config,
            compressor,
        })
    }

    /// Create a codec from `VS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(CodecConfig::from_env()?)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Serialize `value` and construct a token from it.
    pub fn construct_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, CodecError> {
        let bytes = serialization::to_bytes(value)?;
        self.construct(&bytes)
    }

    /// Reconstruct a token and deserialize its payload.
    pub fn reconstruct_value<T: DeserializeOwned>(&self, token: &str) -> Result<T, CodecError> {
        let bytes = self.reconstruct(token)?;
        serialization::from_bytes(&bytes)
    }

    fn nonce(&self, fixed_field: Option<[u8; FIXED_FIELD_LEN]>) -> Result<Vec<u8>, CodecError> {
        match self.config.algorithm_parameters {
            CipherMode::GcmNoPadding => Ok(random_bytes::<12>().to_vec()),
            CipherMode::GcmFixedField => {
                let fixed = fixed_field.ok_or_else(|| {
                    CodecError::Configuration("fixed IV field unavailable".into())
                })?;
                let mut nonce = Vec::with_capacity(12);
                nonce.extend_from_slice(&fixed);
                nonce.extend_from_slice(&random_bytes::<8>());
                Ok(nonce)
            }
            CipherMode::NoPadding => Ok(random_bytes::<24>().to_vec()),
        }
    }

    fn integrity_failure(&self, reason: &str) -> CodecError {
        tracing::warn!(reason, "[vs-01] Rejected state token");
        CodecError::Integrity(reason.to_string())
    }
}

impl StateCodecApi for StateCodec {
    fn construct(&self, payload: &[u8]) -> Result<String, CodecError> {
        let mut bytes = self.compress(payload)?;
        if self.config.use_encryption {
            bytes = self.encrypt(&bytes)?;
        }
        Ok(self.encode(&bytes))
    }

    fn reconstruct(&self, token: &str) -> Result<Vec<u8>, CodecError> {
        let mut bytes = self.decode(token)?;
        if self.config.use_encryption {
            bytes = self.decrypt(&bytes)?;
        }
        self.decompress(&bytes)
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let keys = self.keys.keys()?;
        let cipher = self.config.cipher();
        let nonce = self.nonce(keys.fixed_field)?;

        let ciphertext = encrypt(cipher, &keys.secret, &nonce, plaintext)?;
        let tag = hmac_sha256(&keys.mac, &[nonce.as_slice(), ciphertext.as_slice()]);

        let mut sealed = Vec::with_capacity(nonce.len() + ciphertext.len() + MAC_LEN);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        sealed.extend_from_slice(&tag);
        Ok(sealed)
    }

    fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
        let keys = self.keys.keys()?;
        let cipher = self.config.cipher();
        let nonce_len = cipher.nonce_len();

        if sealed.len() < nonce_len + cipher.tag_len() + MAC_LEN {
            return Err(CodecError::Decode(format!(
                "sealed payload of {} bytes is too short",
                sealed.len()
            )));
        }
        let (body, tag) = sealed.split_at(sealed.len() - MAC_LEN);
        let (nonce, ciphertext) = body.split_at(nonce_len);

        if verify_hmac_sha256(&keys.mac, &[nonce, ciphertext], tag).is_err() {
            return Err(self.integrity_failure("MAC mismatch"));
        }
        if let Some(fixed) = keys.fixed_field {
            if nonce[..FIXED_FIELD_LEN] != fixed {
                return Err(self.integrity_failure("IV fixed field mismatch"));
            }
        }

        decrypt(cipher, &keys.secret, nonce, ciphertext)
            .map_err(|_| self.integrity_failure("AEAD tag mismatch"))
    }

    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(compress_if_smaller(&self.compressor, data)?)
    }

    fn decompress(&self, framed: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(decompress_framed(&self.compressor, framed)?)
    }

    fn encode(&self, bytes: &[u8]) -> String {
        encoding::encode_token(bytes)
    }

    fn decode(&self, token: &str) -> Result<Vec<u8>, CodecError> {
        encoding::decode_token(token)
    }
}

//! # Key Material
//!
//! Resolves the encryption key, MAC key and fixed IV field from
//! configuration. With `secret_cache` on, derivation runs at most once per
//! codec and the result is shared; otherwise keys are re-read on every call.

use parking_lot::Mutex;
use shared_crypto::{MacKey, SecretKey};
use std::sync::Arc;

use super::config::{params, CodecConfig, FIXED_FIELD_LEN};
use super::encoding::decode_setting;
use super::errors::CodecError;

/// Keys needed to seal and open a token.
#[derive(Debug)]
pub struct DerivedKeys {
    pub secret: SecretKey,
    pub mac: MacKey,
    /// Present only for modes that use a configured IV.
    pub fixed_field: Option<[u8; FIXED_FIELD_LEN]>,
}

/// Key provider honouring the `secret_cache` setting.
#[derive(Debug)]
pub struct KeyStore {
    config: CodecConfig,
    cached: Mutex<Option<Arc<DerivedKeys>>>,
}

impl KeyStore {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            cached: Mutex::new(None),
        }
    }

    /// Current keys, deriving them if needed.
    pub fn keys(&self) -> Result<Arc<DerivedKeys>, CodecError> {
        if !self.config.secret_cache {
            return derive(&self.config, false).map(Arc::new);
        }

        let mut cached = self.cached.lock();
        if let Some(keys) = cached.as_ref() {
            return Ok(Arc::clone(keys));
        }
        let keys = Arc::new(derive(&self.config, true)?);
        *cached = Some(Arc::clone(&keys));
        Ok(keys)
    }

    /// Whether keys have been derived and cached.
    pub fn is_cached(&self) -> bool {
        self.cached.lock().is_some()
    }
}

fn derive(config: &CodecConfig, may_generate: bool) -> Result<DerivedKeys, CodecError> {
    let secret = match &config.secret {
        Some(encoded) => {
            let bytes = decode_setting(params::SECRET, encoded)?;
            SecretKey::from_slice(&bytes).map_err(|e| {
                CodecError::Configuration(format!("{}: {e}", params::SECRET))
            })?
        }
        None if may_generate => {
            tracing::warn!(
                "[vs-01] {} not set, generated a random key; tokens will not survive a restart",
                params::SECRET
            );
            SecretKey::generate()
        }
        None => {
            return Err(CodecError::Configuration(format!(
                "{} is required when {} is disabled",
                params::SECRET,
                params::SECRET_CACHE
            )))
        }
    };

    let mac = match &config.mac_secret {
        Some(encoded) => {
            let bytes = decode_setting(params::MAC_SECRET, encoded)?;
            MacKey::from_slice(&bytes).map_err(|e| {
                CodecError::Configuration(format!("{}: {e}", params::MAC_SECRET))
            })?
        }
        None if may_generate => MacKey::generate(),
        None => {
            return Err(CodecError::Configuration(format!(
                "{} is required when {} is disabled",
                params::MAC_SECRET,
                params::SECRET_CACHE
            )))
        }
    };

    let fixed_field = if config.algorithm_parameters.requires_iv() {
        let encoded = config.algorithm_iv.as_ref().ok_or_else(|| {
            CodecError::Configuration(format!(
                "{} is required for {}",
                params::ALGORITHM_IV,
                config.algorithm_parameters
            ))
        })?;
        let bytes = decode_setting(params::ALGORITHM_IV, encoded)?;
        let field: [u8; FIXED_FIELD_LEN] = bytes.as_slice().try_into().map_err(|_| {
            CodecError::Configuration(format!(
                "{} must decode to {FIXED_FIELD_LEN} bytes, got {}",
                params::ALGORITHM_IV,
                bytes.len()
            ))
        })?;
        Some(field)
    } else {
        None
    };

    tracing::debug!(
        algorithm = %config.algorithm,
        mode = %config.algorithm_parameters,
        "[vs-01] Derived state codec keys"
    );

    Ok(DerivedKeys {
        secret,
        mac,
        fixed_field,
    })
}

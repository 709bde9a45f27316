//! # Codec Configuration
//!
//! Cipher selection, key material and the compression/encryption switches.
//! Resolved once at startup from string-valued parameters.

use shared_crypto::Cipher;
use shared_types::config::{env_lookup, parse_flag, parse_param, parse_string};
use shared_types::{ConfigError, ConfigLookup};
use std::fmt;
use std::str::FromStr;

/// Parameter names.
pub mod params {
    pub const USE_ENCRYPTION: &str = "VS_USE_ENCRYPTION";
    pub const COMPRESS_STATE_IN_CLIENT: &str = "VS_COMPRESS_STATE_IN_CLIENT";
    pub const ALGORITHM: &str = "VS_ALGORITHM";
    pub const ALGORITHM_PARAMETERS: &str = "VS_ALGORITHM_PARAMETERS";
    pub const ALGORITHM_IV: &str = "VS_ALGORITHM_IV";
    pub const SECRET: &str = "VS_SECRET";
    pub const MAC_SECRET: &str = "VS_MAC_SECRET";
    pub const SECRET_CACHE: &str = "VS_SECRET_CACHE";
    pub const COMPRESSION_LEVEL: &str = "VS_COMPRESSION_LEVEL";
}

/// Symmetric cipher family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherAlgorithm {
    /// AES-256
    #[default]
    Aes,
    /// XChaCha20-Poly1305
    XChaCha20,
}

impl FromStr for CipherAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AES" => Ok(CipherAlgorithm::Aes),
            "XCHACHA20" | "XCHACHA20-POLY1305" => Ok(CipherAlgorithm::XChaCha20),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherAlgorithm::Aes => f.write_str("AES"),
            CipherAlgorithm::XChaCha20 => f.write_str("XChaCha20"),
        }
    }
}

/// Cipher mode and nonce construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherMode {
    /// AES-GCM with a fully random 96-bit nonce.
    #[default]
    GcmNoPadding,
    /// AES-GCM with a deterministic nonce: 4-byte configured IV (fixed field)
    /// followed by an 8-byte random invocation field. Requires `VS_ALGORITHM_IV`.
    GcmFixedField,
    /// Stream AEAD with a fully random nonce (XChaCha20).
    NoPadding,
}

impl CipherMode {
    /// Whether this mode needs an explicitly configured IV.
    pub const fn requires_iv(&self) -> bool {
        matches!(self, CipherMode::GcmFixedField)
    }
}

impl FromStr for CipherMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GCM/NOPADDING" => Ok(CipherMode::GcmNoPadding),
            "GCM/FIXEDFIELD" => Ok(CipherMode::GcmFixedField),
            "NOPADDING" => Ok(CipherMode::NoPadding),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherMode::GcmNoPadding => f.write_str("GCM/NoPadding"),
            CipherMode::GcmFixedField => f.write_str("GCM/FixedField"),
            CipherMode::NoPadding => f.write_str("NoPadding"),
        }
    }
}

/// Length of the configured IV fixed field for [`CipherMode::GcmFixedField`].
pub const FIXED_FIELD_LEN: usize = 4;

/// Configuration for the state codec.
///
/// Key material is base64 (standard alphabet). When `secret_cache` is on and
/// no secret is configured, a random key is generated once per codec.
#[derive(Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Encrypt and MAC tokens (default: true).
    pub use_encryption: bool,
    /// Compress tokens when it makes them smaller (default: false).
    pub compress_state: bool,
    /// Zstd level used when compressing (default: 3).
    pub compression_level: i32,
    pub algorithm: CipherAlgorithm,
    pub algorithm_parameters: CipherMode,
    /// Base64 IV for modes that require one.
    pub algorithm_iv: Option<String>,
    /// Base64 32-byte encryption key.
    pub secret: Option<String>,
    /// Base64 MAC key, at least 32 bytes.
    pub mac_secret: Option<String>,
    /// Derive keys once and keep them (default: true).
    pub secret_cache: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            use_encryption: true,
            compress_state: false,
            compression_level: 3,
            algorithm: CipherAlgorithm::Aes,
            algorithm_parameters: CipherMode::GcmNoPadding,
            algorithm_iv: None,
            secret: None,
            mac_secret: None,
            secret_cache: true,
        }
    }
}

impl fmt::Debug for CodecConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodecConfig")
            .field("use_encryption", &self.use_encryption)
            .field("compress_state", &self.compress_state)
            .field("compression_level", &self.compression_level)
            .field("algorithm", &self.algorithm)
            .field("algorithm_parameters", &self.algorithm_parameters)
            .field("algorithm_iv", &self.algorithm_iv.as_ref().map(|_| ".."))
            .field("secret", &self.secret.as_ref().map(|_| ".."))
            .field("mac_secret", &self.mac_secret.as_ref().map(|_| ".."))
            .field("secret_cache", &self.secret_cache)
            .finish()
    }
}

impl CodecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the codec parameters from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    /// Read the codec parameters from `lookup`.
    pub fn from_lookup<L: ConfigLookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            use_encryption: parse_flag(lookup, params::USE_ENCRYPTION, defaults.use_encryption)?,
            compress_state: parse_flag(
                lookup,
                params::COMPRESS_STATE_IN_CLIENT,
                defaults.compress_state,
            )?,
            compression_level: parse_param(
                lookup,
                params::COMPRESSION_LEVEL,
                defaults.compression_level,
            )?,
            algorithm: parse_param(lookup, params::ALGORITHM, defaults.algorithm)
                .map_err(|_| invalid(lookup, params::ALGORITHM))?,
            algorithm_parameters: parse_param(
                lookup,
                params::ALGORITHM_PARAMETERS,
                defaults.algorithm_parameters,
            )
            .map_err(|_| invalid(lookup, params::ALGORITHM_PARAMETERS))?,
            algorithm_iv: parse_string(lookup, params::ALGORITHM_IV),
            secret: parse_string(lookup, params::SECRET),
            mac_secret: parse_string(lookup, params::MAC_SECRET),
            secret_cache: parse_flag(lookup, params::SECRET_CACHE, defaults.secret_cache)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check algorithm/mode pairing and value ranges.
    ///
    /// A missing IV is reported on first use of the codec, not here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paired = matches!(
            (self.algorithm, self.algorithm_parameters),
            (CipherAlgorithm::Aes, CipherMode::GcmNoPadding)
                | (CipherAlgorithm::Aes, CipherMode::GcmFixedField)
                | (CipherAlgorithm::XChaCha20, CipherMode::NoPadding)
        );
        if !paired {
            return Err(ConfigError::Invalid(format!(
                "{} does not support mode {}",
                self.algorithm, self.algorithm_parameters
            )));
        }
        if !(1..=22).contains(&self.compression_level) {
            return Err(ConfigError::Invalid(format!(
                "compression level {} outside 1..=22",
                self.compression_level
            )));
        }
        Ok(())
    }

    /// Cipher implementing this algorithm.
    pub fn cipher(&self) -> Cipher {
        match self.algorithm {
            CipherAlgorithm::Aes => Cipher::Aes256Gcm,
            CipherAlgorithm::XChaCha20 => Cipher::XChaCha20Poly1305,
        }
    }

    pub fn with_encryption(mut self, enabled: bool) -> Self {
        self.use_encryption = enabled;
        self
    }

    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress_state = enabled;
        self
    }

    pub fn with_algorithm(mut self, algorithm: CipherAlgorithm, mode: CipherMode) -> Self {
        self.algorithm = algorithm;
        self.algorithm_parameters = mode;
        self
    }

    pub fn with_iv(mut self, iv_base64: impl Into<String>) -> Self {
        self.algorithm_iv = Some(iv_base64.into());
        self
    }

    pub fn with_secret(mut self, secret_base64: impl Into<String>) -> Self {
        self.secret = Some(secret_base64.into());
        self
    }

    pub fn with_mac_secret(mut self, mac_secret_base64: impl Into<String>) -> Self {
        self.mac_secret = Some(mac_secret_base64.into());
        self
    }

    pub fn with_secret_cache(mut self, enabled: bool) -> Self {
        self.secret_cache = enabled;
        self
    }
}

fn invalid<L: ConfigLookup + ?Sized>(lookup: &L, name: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: lookup.lookup(name).unwrap_or_default(),
    }
}

//! # State Cache Configuration
//!
//! Server-side storage bounds, client-side token lifetime and the strategy
//! switch. The codec settings are read from the same parameter source.

use shared_types::config::{env_lookup, parse_flag, parse_optional, parse_param};
use shared_types::{ConfigError, ConfigLookup};
use std::fmt;
use std::str::FromStr;
use vs_01_state_codec::CodecConfig;

/// Parameter names.
pub mod params {
    pub const STATE_SAVING_METHOD: &str = "VS_STATE_SAVING_METHOD";
    pub const NUMBER_OF_VIEWS_IN_SESSION: &str = "VS_NUMBER_OF_VIEWS_IN_SESSION";
    pub const NUMBER_OF_SEQUENTIAL_VIEWS_IN_SESSION: &str =
        "VS_NUMBER_OF_SEQUENTIAL_VIEWS_IN_SESSION";
    pub const SERIALIZE_STATE_IN_SESSION: &str = "VS_SERIALIZE_STATE_IN_SESSION";
    pub const COMPRESS_SERVER_STATE_IN_SESSION: &str = "VS_COMPRESS_SERVER_STATE_IN_SESSION";
    pub const RANDOM_KEY_IN_VIEW_STATE_SESSION_TOKEN: &str =
        "VS_RANDOM_KEY_IN_VIEW_STATE_SESSION_TOKEN";
    pub const ENCRYPT_SERVER_TOKEN: &str = "VS_ENCRYPT_SERVER_TOKEN";
    pub const CLIENT_VIEW_STATE_TIMEOUT: &str = "VS_CLIENT_VIEW_STATE_TIMEOUT";
}

/// Default bound on views kept per session.
pub const DEFAULT_NUMBER_OF_VIEWS_IN_SESSION: usize = 20;

/// Where view state lives between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSavingMethod {
    /// Whole view inside the token.
    Client,
    /// View parked in the session, token is a key.
    #[default]
    Server,
}

impl FromStr for StateSavingMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(StateSavingMethod::Client),
            "server" => Ok(StateSavingMethod::Server),
            _ => Err(()),
        }
    }
}

impl fmt::Display for StateSavingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateSavingMethod::Client => f.write_str("client"),
            StateSavingMethod::Server => f.write_str("server"),
        }
    }
}

/// How the server-side key sequence is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyStrategy {
    /// Per-session counter.
    #[default]
    Counter,
    /// 16 random bytes per save.
    Random,
}

impl FromStr for KeyStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(KeyStrategy::Counter),
            "random" | "secure_random" => Ok(KeyStrategy::Random),
            _ => Err(()),
        }
    }
}

/// Server-side state saving settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStateConfig {
    /// Upper bound on views kept per session (default: 20).
    pub number_of_views_in_session: usize,
    /// Upper bound on one back-navigation chain. `None` or `Some(0)` disables
    /// the chain limit.
    pub number_of_sequential_views_in_session: Option<usize>,
    /// Store serialized bytes instead of the live view (default: false).
    pub serialize_state_in_session: bool,
    /// Compress serialized bytes kept in the session (default: false).
    pub compress_server_state_in_session: bool,
    pub key_strategy: KeyStrategy,
    /// Pass the session token through the codec (default: false).
    pub encrypt_server_token: bool,
}

impl Default for ServerStateConfig {
    fn default() -> Self {
        Self {
            number_of_views_in_session: DEFAULT_NUMBER_OF_VIEWS_IN_SESSION,
            number_of_sequential_views_in_session: None,
            serialize_state_in_session: false,
            compress_server_state_in_session: false,
            key_strategy: KeyStrategy::Counter,
            encrypt_server_token: false,
        }
    }
}

impl ServerStateConfig {
    pub fn from_lookup<L: ConfigLookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            number_of_views_in_session: parse_param(
                lookup,
                params::NUMBER_OF_VIEWS_IN_SESSION,
                defaults.number_of_views_in_session,
            )?,
            number_of_sequential_views_in_session: parse_optional(
                lookup,
                params::NUMBER_OF_SEQUENTIAL_VIEWS_IN_SESSION,
            )?,
            serialize_state_in_session: parse_flag(
                lookup,
                params::SERIALIZE_STATE_IN_SESSION,
                defaults.serialize_state_in_session,
            )?,
            compress_server_state_in_session: parse_flag(
                lookup,
                params::COMPRESS_SERVER_STATE_IN_SESSION,
                defaults.compress_server_state_in_session,
            )?,
            key_strategy: parse_param(
                lookup,
                params::RANDOM_KEY_IN_VIEW_STATE_SESSION_TOKEN,
                defaults.key_strategy,
            )?,
            encrypt_server_token: parse_flag(
                lookup,
                params::ENCRYPT_SERVER_TOKEN,
                defaults.encrypt_server_token,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_views_in_session == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be at least 1",
                params::NUMBER_OF_VIEWS_IN_SESSION
            )));
        }
        if self.compress_server_state_in_session && !self.serialize_state_in_session {
            tracing::warn!(
                "[vs-02] {} has no effect without {}",
                params::COMPRESS_SERVER_STATE_IN_SESSION,
                params::SERIALIZE_STATE_IN_SESSION
            );
        }
        Ok(())
    }

    /// Effective chain limit, `None` when unlimited.
    pub fn sequential_limit(&self) -> Option<usize> {
        self.number_of_sequential_views_in_session
            .filter(|m| *m > 0)
    }

    pub fn with_views_in_session(mut self, n: usize) -> Self {
        self.number_of_views_in_session = n;
        self
    }

    pub fn with_sequential_views_in_session(mut self, m: usize) -> Self {
        self.number_of_sequential_views_in_session = Some(m);
        self
    }

    pub fn with_serialize_state(mut self, serialize: bool, compress: bool) -> Self {
        self.serialize_state_in_session = serialize;
        self.compress_server_state_in_session = compress;
        self
    }

    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.key_strategy = strategy;
        self
    }

    pub fn with_encrypted_token(mut self, encrypt: bool) -> Self {
        self.encrypt_server_token = encrypt;
        self
    }
}

/// Client-side state saving settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientStateConfig {
    /// Token lifetime in minutes; 0 disables the check.
    pub view_state_timeout_minutes: u64,
}

impl ClientStateConfig {
    pub fn from_lookup<L: ConfigLookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        Ok(Self {
            view_state_timeout_minutes: parse_param(lookup, params::CLIENT_VIEW_STATE_TIMEOUT, 0)?,
        })
    }

    /// Token lifetime in milliseconds, `None` when disabled.
    pub fn timeout_millis(&self) -> Option<u64> {
        match self.view_state_timeout_minutes {
            0 => None,
            minutes => Some(minutes.saturating_mul(60_000)),
        }
    }

    pub fn with_timeout_minutes(mut self, minutes: u64) -> Self {
        self.view_state_timeout_minutes = minutes;
        self
    }
}

/// Everything the state cache reads at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateConfig {
    pub state_saving_method: StateSavingMethod,
    pub codec: CodecConfig,
    pub server: ServerStateConfig,
    pub client: ClientStateConfig,
}

impl StateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from `VS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup<L: ConfigLookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let config = Self {
            state_saving_method: parse_param(
                lookup,
                params::STATE_SAVING_METHOD,
                StateSavingMethod::default(),
            )?,
            codec: CodecConfig::from_lookup(lookup)?,
            server: ServerStateConfig::from_lookup(lookup)?,
            client: ClientStateConfig::from_lookup(lookup)?,
        };
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.codec.validate()?;
        self.server.validate()
    }

    pub fn with_state_saving_method(mut self, method: StateSavingMethod) -> Self {
        self.state_saving_method = method;
        self
    }

    pub fn with_codec(mut self, codec: CodecConfig) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_server(mut self, server: ServerStateConfig) -> Self {
        self.server = server;
        self
    }

    pub fn with_client(mut self, client: ClientStateConfig) -> Self {
        self.client = client;
        self
    }
}

//! # Scope Storage Configuration

use shared_types::config::{env_lookup, parse_param};
use shared_types::{ConfigError, ConfigLookup};

/// Parameter names.
pub mod params {
    pub const NUMBER_OF_FLOW_CLIENT_WINDOW_IDS_IN_SESSION: &str =
        "VS_NUMBER_OF_FLOW_CLIENT_WINDOW_IDS_IN_SESSION";
}

/// Default number of client windows whose flows are remembered per session.
pub const DEFAULT_CLIENT_WINDOWS_IN_SESSION: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeConfig {
    /// Client windows tracked per session before the oldest one's flows are
    /// destroyed (default: 5).
    pub number_of_client_window_ids_in_session: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            number_of_client_window_ids_in_session: DEFAULT_CLIENT_WINDOWS_IN_SESSION,
        }
    }
}

impl ScopeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup<L: ConfigLookup + ?Sized>(lookup: &L) -> Result<Self, ConfigError> {
        let config = Self {
            number_of_client_window_ids_in_session: parse_param(
                lookup,
                params::NUMBER_OF_FLOW_CLIENT_WINDOW_IDS_IN_SESSION,
                DEFAULT_CLIENT_WINDOWS_IN_SESSION,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_client_window_ids_in_session == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be at least 1",
                params::NUMBER_OF_FLOW_CLIENT_WINDOW_IDS_IN_SESSION
            )));
        }
        Ok(())
    }

    pub fn with_client_windows(mut self, n: usize) -> Self {
        self.number_of_client_window_ids_in_session = n;
        self
    }
}

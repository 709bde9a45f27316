//! # Configuration Parameters
//!
//! All configuration arrives as string-valued parameters (environment
//! variables or deployment init parameters) and is resolved once at startup.
//! Each subsystem owns its config struct and reads it through [`ConfigLookup`].

use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter is present but cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },

    /// Parameters parse but are inconsistent.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Source of string-valued configuration parameters.
pub trait ConfigLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl<F> ConfigLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Option<String> {
        self(name)
    }
}

impl ConfigLookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Environment-variable lookup.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Read and parse a parameter, falling back to `default` when unset or blank.
pub fn parse_param<T, L>(lookup: &L, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    L: ConfigLookup + ?Sized,
{
    match lookup.lookup(name) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: name.to_string(),
                    value: raw,
                })
        }
        _ => Ok(default),
    }
}

/// Read an optional parameter; blank counts as unset.
pub fn parse_optional<T, L>(lookup: &L, name: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    L: ConfigLookup + ?Sized,
{
    match lookup.lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
        _ => Ok(None),
    }
}

/// Read a boolean flag (`true`/`false`/`1`/`0`/`yes`/`no`, case-insensitive).
pub fn parse_flag<L>(lookup: &L, name: &str, default: bool) -> Result<bool, ConfigError>
where
    L: ConfigLookup + ?Sized,
{
    match lookup.lookup(name) {
        Some(raw) if !raw.trim().is_empty() => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw,
            }),
        },
        _ => Ok(default),
    }
}

/// Read a string parameter; blank counts as unset.
pub fn parse_string<L>(lookup: &L, name: &str) -> Option<String>
where
    L: ConfigLookup + ?Sized,
{
    lookup
        .lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_param_default_and_value() {
        let p = params(&[("A", " 7 "), ("B", "")]);
        assert_eq!(parse_param(&p, "A", 1usize).unwrap(), 7);
        assert_eq!(parse_param(&p, "B", 1usize).unwrap(), 1);
        assert_eq!(parse_param(&p, "C", 1usize).unwrap(), 1);
    }

    #[test]
    fn test_parse_param_invalid() {
        let p = params(&[("A", "seven")]);
        let err = parse_param(&p, "A", 1usize).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: "A".into(),
                value: "seven".into()
            }
        );
    }

    #[test]
    fn test_parse_flag() {
        let p = params(&[("X", "TRUE"), ("Y", "0"), ("Z", "maybe")]);
        assert!(parse_flag(&p, "X", false).unwrap());
        assert!(!parse_flag(&p, "Y", true).unwrap());
        assert!(parse_flag(&p, "Z", true).is_err());
        assert!(parse_flag(&p, "missing", true).unwrap());
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |name: &str| (name == "N").then(|| "3".to_string());
        assert_eq!(parse_optional::<u32, _>(&lookup, "N").unwrap(), Some(3));
        assert_eq!(parse_optional::<u32, _>(&lookup, "M").unwrap(), None);
    }
}

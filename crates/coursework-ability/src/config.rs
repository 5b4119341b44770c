//! Site-level policy configuration.
//!
//! Some coursework features can be switched off for a whole site. A feature
//! is only usable when both the site switch here and the coursework's own
//! switch are on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Site-wide switches consulted by the coursework policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Individual deadline extensions may be granted.
    pub individual_extensions: bool,

    /// Personal deadlines may replace the general deadline.
    pub personal_deadlines: bool,

    /// Submissions may be flagged for plagiarism.
    pub plagiarism_flagging: bool,
}

impl Default for PolicyConfig {
    /// Everything on; the coursework switches decide.
    fn default() -> Self {
        Self {
            individual_extensions: true,
            personal_deadlines: true,
            plagiarism_flagging: true,
        }
    }
}

impl PolicyConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `COURSEWORK_INDIVIDUAL_EXTENSIONS`: Allow individual extensions (default: true)
    /// - `COURSEWORK_PERSONAL_DEADLINES`: Allow personal deadlines (default: true)
    /// - `COURSEWORK_PLAGIARISM_FLAGGING`: Allow plagiarism flagging (default: true)
    ///
    /// Accepted values are `true/false`, `1/0`, `yes/no` and `on/off`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for any other value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        Ok(Self {
            individual_extensions: flag(&lookup, "COURSEWORK_INDIVIDUAL_EXTENSIONS", default.individual_extensions)?,
            personal_deadlines: flag(&lookup, "COURSEWORK_PERSONAL_DEADLINES", default.personal_deadlines)?,
            plagiarism_flagging: flag(&lookup, "COURSEWORK_PLAGIARISM_FLAGGING", default.plagiarism_flagging)?,
        })
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = PolicyConfig::default();
        assert!(config.individual_extensions);
        assert!(config.personal_deadlines);
        assert!(config.plagiarism_flagging);
    }

    #[test]
    fn test_missing_values_use_defaults() {
        let config = PolicyConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PolicyConfig::default());
    }

    #[test]
    fn test_switches_off() {
        let config = PolicyConfig::from_lookup(lookup(&[
            ("COURSEWORK_INDIVIDUAL_EXTENSIONS", "false"),
            ("COURSEWORK_PERSONAL_DEADLINES", "0"),
            ("COURSEWORK_PLAGIARISM_FLAGGING", "Off"),
        ]))
        .unwrap();

        assert!(!config.individual_extensions);
        assert!(!config.personal_deadlines);
        assert!(!config.plagiarism_flagging);
    }

    #[test]
    fn test_malformed_value() {
        let err = PolicyConfig::from_lookup(lookup(&[("COURSEWORK_PERSONAL_DEADLINES", "maybe")]))
            .unwrap_err();

        match err {
            ConfigError::InvalidValue { key, message } => {
                assert_eq!(key, "COURSEWORK_PERSONAL_DEADLINES");
                assert!(message.contains("maybe"));
            }
        }
    }
}

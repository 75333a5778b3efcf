//! Runtime configuration
//!
//! Settings come from defaults, then `SDPROMPT_*` environment variables, then
//! command-line overrides applied by the binary.
//!
//! - `SDPROMPT_WEIGHT_MULTIPLIER`: factor per emphasis level (default 1.1)
//! - `SDPROMPT_LOG_LEVEL`: trace, debug, info, warn or error (default warn)

use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::prompt::evaluation::DEFAULT_WEIGHT_MULTIPLIER;

pub const WEIGHT_MULTIPLIER_VAR: &str = "SDPROMPT_WEIGHT_MULTIPLIER";
pub const LOG_LEVEL_VAR: &str = "SDPROMPT_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// How much of the parser's recovery chatter reaches stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

const LOG_LEVEL_NAMES: [(&str, LogLevel); 5] = [
    ("trace", LogLevel::Trace),
    ("debug", LogLevel::Debug),
    ("info", LogLevel::Info),
    ("warn", LogLevel::Warn),
    ("error", LogLevel::Error),
];

impl LogLevel {
    /// Lowercase name, also usable as an `EnvFilter` directive
    pub fn name(&self) -> &'static str {
        LOG_LEVEL_NAMES
            .iter()
            .find(|(_, level)| level == self)
            .map_or("warn", |(name, _)| *name)
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LOG_LEVEL_NAMES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, level)| *level)
            .ok_or_else(|| {
                ConfigError::InvalidConfig(format!(
                    "log level '{s}' not recognised; use trace, debug, info, warn or error"
                ))
            })
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a weight multiplier, rejecting negative and non-finite values
pub fn parse_weight_multiplier(value: &str) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(multiplier) if multiplier.is_finite() && multiplier >= 0.0 => Ok(multiplier),
        _ => Err(ConfigError::InvalidConfig(format!(
            "invalid weight multiplier '{value}', expected a non-negative number"
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptConfig {
    /// Factor applied per emphasis level; `0` means the default
    pub weight_multiplier: f64,
    pub log_level: LogLevel,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            weight_multiplier: DEFAULT_WEIGHT_MULTIPLIER,
            log_level: LogLevel::default(),
        }
    }
}

impl PromptConfig {
    /// Load configuration from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let weight_multiplier = match lookup(WEIGHT_MULTIPLIER_VAR) {
            Some(value) => parse_weight_multiplier(&value)?,
            None => defaults.weight_multiplier,
        };

        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(value) => value.parse()?,
            None => defaults.log_level,
        };

        Ok(Self {
            weight_multiplier,
            log_level,
        })
    }

    /// Apply command-line overrides on top of the environment
    #[must_use]
    pub fn apply_overrides(
        mut self,
        weight_multiplier: Option<f64>,
        log_level: Option<LogLevel>,
    ) -> Self {
        if let Some(multiplier) = weight_multiplier {
            self.weight_multiplier = multiplier;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PromptConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PromptConfig::default());
        assert_eq!(config.weight_multiplier, 1.1);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = PromptConfig::from_lookup(lookup(&[
            (WEIGHT_MULTIPLIER_VAR, "1.2"),
            (LOG_LEVEL_VAR, "DEBUG"),
        ]))
        .unwrap();
        assert_eq!(config.weight_multiplier, 1.2);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_values() {
        assert!(PromptConfig::from_lookup(lookup(&[(WEIGHT_MULTIPLIER_VAR, "-1")])).is_err());
        assert!(PromptConfig::from_lookup(lookup(&[(WEIGHT_MULTIPLIER_VAR, "abc")])).is_err());
        let err = PromptConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "loud")])).unwrap_err();
        assert!(err.to_string().contains("log level 'loud' not recognised"));
    }

    #[test]
    fn test_log_level_names() {
        assert_eq!(" Info ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("ERROR".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("warning".parse::<LogLevel>().is_err());
        for (name, level) in LOG_LEVEL_NAMES {
            assert_eq!(level.name(), name);
            assert_eq!(level.to_string(), name);
        }
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = PromptConfig::default().apply_overrides(Some(1.3), Some(LogLevel::Trace));
        assert_eq!(config.weight_multiplier, 1.3);
        assert_eq!(config.log_level, LogLevel::Trace);

        let unchanged = PromptConfig::default().apply_overrides(None, None);
        assert_eq!(unchanged, PromptConfig::default());
    }
}

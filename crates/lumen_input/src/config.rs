//! # Touch Configuration
//!
//! ```toml
//! dispatch = "deferred"
//! handoff_capacity = 128
//!
//! [pool]
//! initial_capacity = 16
//! ```

use serde::{Deserialize, Serialize};

use lumen_core::{ConfigError, ConfigResult, PoolConfig};

/// When touch callbacks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// The callback runs inside `fire_touch_event`, on the caller's thread.
    #[default]
    Synchronous,
    /// Events queue up and the callback runs on the next `on_update`.
    Deferred,
}

/// Touch dispatch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Delivery mode.
    pub dispatch: DispatchMode,
    /// Event pool sizing.
    pub pool: PoolConfig,
    /// Capacity of the cross-thread handoff queue.
    pub handoff_capacity: usize,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            dispatch: DispatchMode::Synchronous,
            pool: PoolConfig::with_capacity(8),
            handoff_capacity: 64,
        }
    }
}

impl TouchConfig {
    /// Parses the config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] when
    /// [`TouchConfig::validate`] fails.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are usable.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a zero handoff capacity or a bad pool
    /// section.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.handoff_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "handoff_capacity",
                reason: "must be at least 1".to_owned(),
            });
        }
        self.pool.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TouchConfig::from_toml_str("").unwrap();
        assert_eq!(config, TouchConfig::default());
        assert_eq!(config.dispatch, DispatchMode::Synchronous);
    }

    #[test]
    fn test_parse_deferred() {
        let config =
            TouchConfig::from_toml_str("dispatch = \"deferred\"\n[pool]\ninitial_capacity = 2")
                .unwrap();
        assert_eq!(config.dispatch, DispatchMode::Deferred);
        assert_eq!(config.pool.initial_capacity, 2);
    }

    #[test]
    fn test_rejects_zero_handoff() {
        let err = TouchConfig::from_toml_str("handoff_capacity = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "handoff_capacity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(matches!(
            TouchConfig::from_toml_str("dispatch = \"sometimes\""),
            Err(ConfigError::Parse(_))
        ));
    }
}

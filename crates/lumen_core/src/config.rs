//! # Pool Configuration
//!
//! Pool sizing is data, loaded once at startup from TOML:
//!
//! ```toml
//! initial_capacity = 64
//! growth = 16
//! max_capacity = 4096
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Sizing policy for an object pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Objects created up front, before the first frame.
    pub initial_capacity: usize,
    /// Objects created at once when the free list runs dry.
    pub growth: usize,
    /// Hard upper bound. `None` means the pool grows on demand forever.
    pub max_capacity: Option<usize>,
}

impl PoolConfig {
    /// Creates an unbounded config that pre-allocates `initial_capacity` objects.
    #[must_use]
    pub const fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            growth: 1,
            max_capacity: None,
        }
    }

    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML and
    /// [`ConfigError::Invalid`] when [`PoolConfig::validate`] fails.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the sizing values are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `growth` is zero or the initial
    /// capacity exceeds the configured maximum.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.growth == 0 {
            return Err(ConfigError::Invalid {
                field: "growth",
                reason: "must be at least 1".to_owned(),
            });
        }
        if let Some(max) = self.max_capacity {
            if self.initial_capacity > max {
                return Err(ConfigError::Invalid {
                    field: "initial_capacity",
                    reason: format!("{} exceeds max_capacity {max}", self.initial_capacity),
                });
            }
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            growth: 1,
            max_capacity: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = PoolConfig::from_toml_str(
            "initial_capacity = 64\ngrowth = 16\nmax_capacity = 4096\n",
        )
        .unwrap();

        assert_eq!(config.initial_capacity, 64);
        assert_eq!(config.growth, 16);
        assert_eq!(config.max_capacity, Some(4096));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = PoolConfig::from_toml_str("initial_capacity = 8").unwrap();
        assert_eq!(config.growth, 1);
        assert_eq!(config.max_capacity, None);
    }

    #[test]
    fn test_zero_growth_rejected() {
        let err = PoolConfig::from_toml_str("growth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "growth", .. }));
    }

    #[test]
    fn test_initial_above_max_rejected() {
        let err = PoolConfig::from_toml_str("initial_capacity = 10\nmax_capacity = 4").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "initial_capacity", .. }));
    }

    #[test]
    fn test_malformed_toml() {
        let err = PoolConfig::from_toml_str("initial_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

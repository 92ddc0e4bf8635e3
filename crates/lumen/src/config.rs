//! # Engine Configuration
//!
//! One TOML document configures a whole runtime:
//!
//! ```toml
//! [touch]
//! dispatch = "deferred"
//!
//! [particles]
//! max_particles = 512
//! rate_per_second = 60.0
//!
//! [textures]
//! memory_budget = 16777216
//!
//! [frame]
//! max_delta_time = 0.05
//! ```

use serde::{Deserialize, Serialize};

use lumen_core::{ConfigError, ConfigResult};
use lumen_input::TouchConfig;
use lumen_rendering::{HeadlessDevice, ParticleSystemConfig};

/// Texture memory settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Device memory cap in bytes. `None` means unlimited.
    pub memory_budget: Option<usize>,
}

impl TextureConfig {
    /// Builds a headless device honoring the budget.
    #[must_use]
    pub fn headless_device(&self) -> HeadlessDevice {
        match self.memory_budget {
            Some(bytes) => HeadlessDevice::with_memory_budget(bytes),
            None => HeadlessDevice::new(),
        }
    }
}

/// Frame timing settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Upper bound on the delta handed to a tick, in seconds.
    pub max_delta_time: f32,
    /// Log frames that blow the budget.
    pub log_slow_frames: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_delta_time: 0.1,
            log_slow_frames: true,
        }
    }
}

/// Every section of the runtime config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Touch dispatch.
    pub touch: TouchConfig,
    /// Default settings for particle systems.
    pub particles: ParticleSystemConfig,
    /// Texture memory.
    pub textures: TextureConfig,
    /// Frame timing.
    pub frame: FrameConfig,
}

impl EngineConfig {
    /// Parses the config from TOML text and validates every section.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] when
    /// a section fails validation.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// The first [`ConfigError::Invalid`] found.
    pub fn validate(&self) -> ConfigResult<()> {
        self.touch.validate()?;
        self.particles.validate()?;
        if self.textures.memory_budget == Some(0) {
            return Err(ConfigError::Invalid {
                field: "memory_budget",
                reason: "must be positive when set".to_owned(),
            });
        }
        let max = self.frame.max_delta_time;
        if !max.is_finite() || max <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "max_delta_time",
                reason: format!("must be finite and > 0, got {max}"),
            });
        }
        Ok(())
    }
}

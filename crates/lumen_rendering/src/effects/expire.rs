//! Lifetime assignment for spawned particles.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::effects::{Particle, ParticleModifier};
use crate::error::ParticleError;

/// Expire modifier settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpireConfig {
    /// Shortest lifetime in seconds.
    pub min_lifetime: f32,
    /// Longest lifetime in seconds.
    pub max_lifetime: f32,
    /// Fixed RNG seed; a fresh per-modifier seed when absent.
    pub seed: Option<u64>,
}

impl Default for ExpireConfig {
    fn default() -> Self {
        Self {
            min_lifetime: 1.0,
            max_lifetime: 1.0,
            seed: None,
        }
    }
}

/// Gives every particle a lifetime drawn uniformly from
/// `[min_lifetime, max_lifetime]`.
///
/// Only the expire time is written; the owning system ages particles and
/// returns them to the pool once they pass it.
#[derive(Debug, Clone)]
pub struct ExpireModifier {
    min_lifetime: f32,
    max_lifetime: f32,
    rng: ChaCha8Rng,
}

fn next_seed() -> u64 {
    static NEXT_SEED: AtomicU64 = AtomicU64::new(0x5EED);
    NEXT_SEED
        .fetch_add(1, Ordering::Relaxed)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn check_range(min: f32, max: f32) -> Result<(), ParticleError> {
    let valid = min.is_finite() && max.is_finite() && min >= 0.0 && min <= max;
    if valid {
        Ok(())
    } else {
        tracing::warn!(min, max, "invalid particle lifetime range");
        Err(ParticleError::InvalidLifetimeRange { min, max })
    }
}

impl ExpireModifier {
    /// Every particle lives exactly `lifetime` seconds.
    ///
    /// # Errors
    ///
    /// [`ParticleError::InvalidLifetimeRange`] for a negative or non-finite
    /// lifetime.
    pub fn fixed(lifetime: f32) -> Result<Self, ParticleError> {
        Self::new(lifetime, lifetime)
    }

    /// Lifetimes drawn from `[min_lifetime, max_lifetime]`.
    ///
    /// # Errors
    ///
    /// [`ParticleError::InvalidLifetimeRange`] if the bounds are negative,
    /// non-finite, or inverted.
    pub fn new(min_lifetime: f32, max_lifetime: f32) -> Result<Self, ParticleError> {
        check_range(min_lifetime, max_lifetime)?;
        Ok(Self {
            min_lifetime,
            max_lifetime,
            rng: ChaCha8Rng::seed_from_u64(next_seed()),
        })
    }

    /// Builds the modifier from config.
    ///
    /// # Errors
    ///
    /// Same as [`ExpireModifier::new`].
    pub fn from_config(config: &ExpireConfig) -> Result<Self, ParticleError> {
        let modifier = Self::new(config.min_lifetime, config.max_lifetime)?;
        Ok(match config.seed {
            Some(seed) => modifier.with_seed(seed),
            None => modifier,
        })
    }

    /// Replaces the RNG with one seeded from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    /// Shortest lifetime.
    #[must_use]
    pub const fn min_lifetime(&self) -> f32 {
        self.min_lifetime
    }

    /// Longest lifetime.
    #[must_use]
    pub const fn max_lifetime(&self) -> f32 {
        self.max_lifetime
    }

    /// Switches to a fixed lifetime.
    ///
    /// # Errors
    ///
    /// Same as [`ExpireModifier::fixed`]; the modifier is unchanged on error.
    pub fn set_lifetime(&mut self, lifetime: f32) -> Result<(), ParticleError> {
        self.set_lifetime_range(lifetime, lifetime)
    }

    /// Switches to a lifetime range.
    ///
    /// # Errors
    ///
    /// Same as [`ExpireModifier::new`]; the modifier is unchanged on error.
    pub fn set_lifetime_range(
        &mut self,
        min_lifetime: f32,
        max_lifetime: f32,
    ) -> Result<(), ParticleError> {
        check_range(min_lifetime, max_lifetime)?;
        self.min_lifetime = min_lifetime;
        self.max_lifetime = max_lifetime;
        Ok(())
    }

    /// Draws one lifetime.
    pub fn sample(&mut self) -> f32 {
        if self.min_lifetime >= self.max_lifetime {
            return self.min_lifetime;
        }
        self.rng.gen_range(self.min_lifetime..=self.max_lifetime)
    }
}

impl ParticleModifier for ExpireModifier {
    fn on_initialize_particle(&mut self, particle: &mut Particle) {
        let lifetime = self.sample();
        particle.set_expire_time(lifetime);
    }

    fn on_update_particle(&mut self, _particle: &mut Particle, _delta_time: f32) {}
}

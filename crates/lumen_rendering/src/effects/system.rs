//! CPU Particle System
//!
//! Particles live in an [`ObjectPool`] and go back to it the tick they
//! expire. One update:
//!
//! 1. Spawn new particles at the configured rate (initializers run here)
//! 2. Age and move every live particle
//! 3. Release particles past their expire time
//! 4. Run the modifier pipeline on survivors
//! 5. Rebuild the vertex buffer for upload

use serde::{Deserialize, Serialize};

use lumen_core::{ConfigError, ConfigResult, ObjectPool, PoolConfig, PoolError, PoolHandle};

use crate::effects::{ModifierPipeline, Particle, ParticleModifier, ParticleVertex};
use crate::error::ParticleError;

/// Default cap on live particles.
pub const DEFAULT_MAX_PARTICLES: usize = 1024;

/// Particle system settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleSystemConfig {
    /// Cap on live particles; spawns beyond it are skipped.
    pub max_particles: usize,
    /// Continuous emission in particles per second (0 = spawn manually).
    pub rate_per_second: f32,
    /// Velocity given to spawned particles.
    pub initial_velocity: [f32; 2],
    /// Backing pool sizing.
    pub pool: PoolConfig,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            rate_per_second: 0.0,
            initial_velocity: [0.0; 2],
            pool: PoolConfig::default(),
        }
    }
}

impl ParticleSystemConfig {
    /// Checks the settings for consistency.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for a negative or non-finite rate, or an
    /// invalid pool section.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.rate_per_second.is_finite() || self.rate_per_second < 0.0 {
            return Err(ConfigError::Invalid {
                field: "rate_per_second",
                reason: format!("must be finite and >= 0, got {}", self.rate_per_second),
            });
        }
        self.pool.validate()
    }
}

/// Statistics from the particle system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// Currently alive particles.
    pub alive: usize,
    /// Particles spawned during the last update.
    pub spawned_this_frame: usize,
    /// Particles released during the last update.
    pub expired_this_frame: usize,
    /// Spawns skipped because the system was full.
    pub skipped_this_frame: usize,
    /// Slots allocated by the pool.
    pub pool_capacity: usize,
}

/// A pool-backed particle emitter.
pub struct ParticleSystem {
    config: ParticleSystemConfig,
    position: [f32; 2],
    pool: ObjectPool<Particle>,
    live: Vec<PoolHandle>,
    expired: Vec<PoolHandle>,
    modifiers: ModifierPipeline,
    vertices: Vec<ParticleVertex>,
    spawn_accumulator: f32,
    stats: ParticleStats,
    time: f32,
}

impl ParticleSystem {
    /// Creates an emitter at `position`.
    #[must_use]
    pub fn new(position: [f32; 2], config: ParticleSystemConfig) -> Self {
        let pool = ObjectPool::with_config(config.pool);
        Self {
            position,
            live: Vec::with_capacity(config.pool.initial_capacity),
            expired: Vec::new(),
            modifiers: ModifierPipeline::new(),
            vertices: Vec::with_capacity(config.pool.initial_capacity),
            spawn_accumulator: 0.0,
            stats: ParticleStats {
                pool_capacity: pool.capacity(),
                ..ParticleStats::default()
            },
            pool,
            config,
            time: 0.0,
        }
    }

    /// Appends a modifier to the pipeline.
    pub fn add_modifier(&mut self, modifier: impl ParticleModifier + 'static) {
        self.modifiers.push(modifier);
    }

    /// Moves the emitter.
    pub fn set_position(&mut self, position: [f32; 2]) {
        self.position = position;
    }

    /// Emitter position.
    #[must_use]
    pub const fn position(&self) -> [f32; 2] {
        self.position
    }

    /// Active settings.
    #[must_use]
    pub const fn config(&self) -> &ParticleSystemConfig {
        &self.config
    }

    /// Spawns one particle at `position` and runs the initializers on it.
    ///
    /// Returns `Ok(None)` when the system is at `max_particles`.
    ///
    /// # Errors
    ///
    /// [`ParticleError::Pool`] if the backing pool reached its maximum.
    pub fn spawn(&mut self, position: [f32; 2]) -> Result<Option<PoolHandle>, ParticleError> {
        if self.live.len() >= self.config.max_particles {
            self.stats.skipped_this_frame += 1;
            return Ok(None);
        }
        let handle = self.pool.acquire()?;
        if let Some(particle) = self.pool.get_mut(handle) {
            particle.position = position;
            particle.velocity = self.config.initial_velocity;
            self.modifiers.initialize(particle);
        }
        self.live.push(handle);
        self.stats.spawned_this_frame += 1;
        Ok(Some(handle))
    }

    /// Advances the system by `delta_time` seconds.
    ///
    /// Rate spawns refused by a full bounded pool are counted as skipped,
    /// like spawns past `max_particles`. Live particles age and expire on
    /// every update regardless of how spawning went.
    ///
    /// # Errors
    ///
    /// [`ParticleError::Pool`] for a pool contract violation. The update
    /// still completes before it is returned.
    pub fn on_update(&mut self, delta_time: f32) -> Result<ParticleStats, ParticleError> {
        self.time += delta_time;
        self.stats.spawned_this_frame = 0;
        self.stats.expired_this_frame = 0;
        self.stats.skipped_this_frame = 0;
        let mut first_error = None;

        self.spawn_accumulator += self.config.rate_per_second * delta_time;
        while self.spawn_accumulator >= 1.0 {
            self.spawn_accumulator -= 1.0;
            match self.spawn(self.position) {
                Ok(_) => {}
                Err(ParticleError::Pool(PoolError::CapacityReached { .. })) => {
                    self.stats.skipped_this_frame += 1;
                }
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        let pool = &mut self.pool;
        let modifiers = &mut self.modifiers;
        let expired = &mut self.expired;
        self.live.retain(|&handle| {
            let Some(particle) = pool.get_mut(handle) else {
                return false;
            };
            particle.advance(delta_time);
            if particle.is_expired() {
                expired.push(handle);
                return false;
            }
            modifiers.update(particle, delta_time);
            true
        });

        self.stats.expired_this_frame = self.expired.len();
        for handle in self.expired.drain(..) {
            if let Err(err) = self.pool.release(handle) {
                first_error.get_or_insert(err.into());
            }
        }

        self.vertices.clear();
        let pool = &self.pool;
        self.vertices.extend(
            self.live
                .iter()
                .filter_map(|&handle| pool.get(handle))
                .map(Particle::to_vertex),
        );

        self.stats.alive = self.live.len();
        self.stats.pool_capacity = self.pool.capacity();
        match first_error {
            Some(err) => Err(err),
            None => Ok(self.stats),
        }
    }

    /// A live particle.
    #[must_use]
    pub fn particle(&self, handle: PoolHandle) -> Option<&Particle> {
        self.pool.get(handle)
    }

    /// Handles of live particles in spawn order.
    #[must_use]
    pub fn live_handles(&self) -> &[PoolHandle] {
        &self.live
    }

    /// Vertex data of live particles, as of the last update.
    #[must_use]
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// Vertex data as bytes for GPU upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Returns every live particle to the pool.
    ///
    /// # Errors
    ///
    /// [`ParticleError::Pool`] if a handle was already released.
    pub fn clear(&mut self) -> Result<(), ParticleError> {
        for handle in self.live.drain(..) {
            self.pool.release(handle)?;
        }
        self.vertices.clear();
        self.spawn_accumulator = 0.0;
        self.stats.alive = 0;
        Ok(())
    }

    /// Current statistics.
    #[must_use]
    pub const fn stats(&self) -> ParticleStats {
        self.stats
    }

    /// Seconds simulated so far.
    #[must_use]
    pub const fn time(&self) -> f32 {
        self.time
    }

    /// The backing pool.
    #[must_use]
    pub const fn pool(&self) -> &ObjectPool<Particle> {
        &self.pool
    }
}

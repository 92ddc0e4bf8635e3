//! # LUMEN Frame Loop
//!
//! One tick, in order:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. INPUT                                                            │
//! │    ├─ Drain the cross-thread touch handoff                          │
//! │    └─ Deliver deferred touches, recycle their events                │
//! │                                                                     │
//! │ 2. PARTICLES                                                        │
//! │    ├─ Spawn at rate, age, move                                      │
//! │    └─ Release expired particles to their pools                      │
//! │                                                                     │
//! │ 3. TEXTURES (render thread, owns the device)                        │
//! │    ├─ Re-upload changed textures                                    │
//! │    ├─ Upload queued loads, keep failures queued                     │
//! │    └─ Free queued unloads                                           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failing stage never skips the stages after it: pools are reclaimed
//! every tick. The first error is returned once the frame is recorded.

use std::time::{Duration, Instant};

use lumen_input::{TouchDispatcher, TouchHandoff};
use lumen_rendering::{
    GraphicsDevice, ParticleStats, ParticleSystem, TextureManager, TextureUpdateReport,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};

/// Target frame time for 60 FPS.
pub const TARGET_FRAME_TIME: Duration = Duration::from_micros(16_666);

/// Frame time past which a frame is logged as slow.
pub const MAX_FRAME_TIME: Duration = Duration::from_millis(33);

fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// What one tick did and how long it took.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Delta handed to the stages, after clamping.
    pub delta_time: f32,
    /// Total tick time in microseconds.
    pub total_us: u64,
    /// Input stage time in microseconds.
    pub input_us: u64,
    /// Particle stage time in microseconds.
    pub particles_us: u64,
    /// Texture stage time in microseconds.
    pub textures_us: u64,
    /// Touches delivered by the input stage, failed deliveries included.
    pub touches_delivered: usize,
    /// Particles summed over every system.
    pub particles: ParticleStats,
    /// Texture transitions performed.
    pub textures: TextureUpdateReport,
}

/// Owns the per-frame subsystems and runs them in order.
pub struct FrameLoop<R: 'static = ()> {
    config: EngineConfig,
    touch: TouchDispatcher<R>,
    particle_systems: Vec<ParticleSystem>,
    textures: TextureManager,
    frame_count: u64,
    last_tick: Option<Instant>,
    last_stats: FrameStats,
    stats_accumulator: FrameStatsAccumulator,
}

impl<R: 'static> FrameLoop<R> {
    /// Creates a loop from a validated config.
    ///
    /// # Errors
    ///
    /// [`EngineError::Config`] when the config does not validate.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        tracing::debug!(
            dispatch = ?config.touch.dispatch,
            max_delta_time = config.frame.max_delta_time,
            "frame loop created"
        );
        Ok(Self {
            touch: TouchDispatcher::new(&config.touch),
            particle_systems: Vec::new(),
            textures: TextureManager::new(),
            frame_count: 0,
            last_tick: None,
            last_stats: FrameStats::default(),
            stats_accumulator: FrameStatsAccumulator::new(),
            config,
        })
    }

    /// Adds a particle system built from the `[particles]` section.
    /// Returns its index.
    pub fn add_particle_system(&mut self, position: [f32; 2]) -> usize {
        self.push_particle_system(ParticleSystem::new(position, self.config.particles))
    }

    /// Adds a prepared particle system. Returns its index.
    pub fn push_particle_system(&mut self, system: ParticleSystem) -> usize {
        self.particle_systems.push(system);
        self.particle_systems.len() - 1
    }

    /// A particle system by index.
    #[must_use]
    pub fn particle_system(&self, index: usize) -> Option<&ParticleSystem> {
        self.particle_systems.get(index)
    }

    /// A particle system by index, mutably.
    pub fn particle_system_mut(&mut self, index: usize) -> Option<&mut ParticleSystem> {
        self.particle_systems.get_mut(index)
    }

    /// Every particle system, in tick order.
    #[must_use]
    pub fn particle_systems(&self) -> &[ParticleSystem] {
        &self.particle_systems
    }

    /// The touch dispatcher.
    #[must_use]
    pub const fn touch(&self) -> &TouchDispatcher<R> {
        &self.touch
    }

    /// The touch dispatcher, mutably (register the callback here).
    pub fn touch_mut(&mut self) -> &mut TouchDispatcher<R> {
        &mut self.touch
    }

    /// A sender for touches read on another thread.
    pub fn handoff(&mut self) -> TouchHandoff<R> {
        self.touch.handoff()
    }

    /// The texture registry.
    #[must_use]
    pub const fn textures(&self) -> &TextureManager {
        &self.textures
    }

    /// The texture registry, mutably.
    pub fn textures_mut(&mut self) -> &mut TextureManager {
        &mut self.textures
    }

    /// The config the loop was built from.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs one frame with an explicit delta, in seconds.
    ///
    /// The delta is clamped to `[0, max_delta_time]`; a non-finite delta
    /// counts as zero.
    ///
    /// # Errors
    ///
    /// The first error any stage reported. Later stages still ran.
    pub fn tick(
        &mut self,
        delta_time: f32,
        device: &mut dyn GraphicsDevice,
    ) -> EngineResult<FrameStats> {
        let frame_start = Instant::now();
        let delta_time = self.clamp_delta(delta_time);
        let mut stats = FrameStats {
            frame: self.frame_count,
            delta_time,
            ..FrameStats::default()
        };
        let mut first_error: Option<EngineError> = None;

        let stage_start = Instant::now();
        let dispatched_before = self.touch.stats().dispatched;
        if let Err(err) = self.touch.on_update(delta_time) {
            first_error.get_or_insert(err.into());
        }
        let delivered = self.touch.stats().dispatched - dispatched_before;
        stats.touches_delivered = usize::try_from(delivered).unwrap_or(usize::MAX);
        stats.input_us = micros(stage_start.elapsed());

        let stage_start = Instant::now();
        for system in &mut self.particle_systems {
            match system.on_update(delta_time) {
                Ok(particles) => {
                    stats.particles.alive += particles.alive;
                    stats.particles.spawned_this_frame += particles.spawned_this_frame;
                    stats.particles.expired_this_frame += particles.expired_this_frame;
                    stats.particles.skipped_this_frame += particles.skipped_this_frame;
                    stats.particles.pool_capacity += particles.pool_capacity;
                }
                Err(err) => {
                    first_error.get_or_insert(err.into());
                }
            }
        }
        stats.particles_us = micros(stage_start.elapsed());

        let stage_start = Instant::now();
        stats.textures = self.textures.update_textures(device);
        stats.textures_us = micros(stage_start.elapsed());

        stats.total_us = micros(frame_start.elapsed());
        self.end_frame(stats);

        match first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }

    /// Runs one frame using the wall-clock time since the previous call.
    /// The first call uses a zero delta.
    ///
    /// # Errors
    ///
    /// See [`FrameLoop::tick`].
    pub fn tick_elapsed(&mut self, device: &mut dyn GraphicsDevice) -> EngineResult<FrameStats> {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_tick = Some(now);
        self.tick(delta, device)
    }

    fn clamp_delta(&self, delta_time: f32) -> f32 {
        if delta_time.is_finite() {
            delta_time.clamp(0.0, self.config.frame.max_delta_time)
        } else {
            0.0
        }
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.frame_count += 1;
        self.last_stats = stats;
        self.stats_accumulator.record(stats);

        if self.config.frame.log_slow_frames && stats.total_us > micros(MAX_FRAME_TIME) {
            tracing::warn!(
                frame = stats.frame,
                total_us = stats.total_us,
                input_us = stats.input_us,
                particles_us = stats.particles_us,
                textures_us = stats.textures_us,
                "frame exceeded budget"
            );
        }
    }

    /// Frames completed.
    #[inline]
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Statistics of the most recent frame.
    #[must_use]
    pub const fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Statistics accumulated over every frame.
    #[must_use]
    pub const fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of input stage times.
    pub input_us_sum: u64,
    /// Sum of particle stage times.
    pub particles_us_sum: u64,
    /// Sum of texture stage times.
    pub textures_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded the 60 FPS budget.
    pub frames_over_budget: u64,
}

impl FrameStatsAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            input_us_sum: 0,
            particles_us_sum: 0,
            textures_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum = self.total_us_sum.saturating_add(stats.total_us);
        self.input_us_sum = self.input_us_sum.saturating_add(stats.input_us);
        self.particles_us_sum = self.particles_us_sum.saturating_add(stats.particles_us);
        self.textures_us_sum = self.textures_us_sum.saturating_add(stats.textures_us);
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if stats.total_us > micros(TARGET_FRAME_TIME) {
            self.frames_over_budget += 1;
        }
    }

    /// Average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Average frames per second.
    #[must_use]
    pub fn avg_fps(&self) -> f64 {
        let avg_ms = self.avg_frame_ms();
        if avg_ms <= 0.0 {
            return 0.0;
        }
        1000.0 / avg_ms
    }

    /// Share of frames over budget, in `0.0..=1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

//! # Particle Effects
//!
//! This module provides:
//! - `Particle` - pooled CPU-side particle with a GPU vertex view
//! - `ParticleModifier` - initialize/update hooks, run in caller order
//! - `ExpireModifier` - uniform random lifetime per particle
//! - `ParticleSystem` - spawns, ages, and recycles particles every tick

mod expire;
mod modifier;
mod particle;
mod system;

pub use expire::{ExpireConfig, ExpireModifier};
pub use modifier::{ModifierPipeline, ParticleModifier};
pub use particle::{Particle, ParticleVertex};
pub use system::{ParticleStats, ParticleSystem, ParticleSystemConfig, DEFAULT_MAX_PARTICLES};

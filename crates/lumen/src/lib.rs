//! # LUMEN
//!
//! Runtime core for frame loops that must not stall on the allocator.
//!
//! ## Units
//!
//! - [`core`]: recyclable objects, immediate and deferred pools
//! - [`input`]: pooled touch events and their dispatch
//! - [`rendering`]: texture state machine, particles, blend state
//!
//! ## Quick Start
//!
//! ```rust
//! use lumen::{EngineConfig, FrameLoop};
//!
//! let config = EngineConfig::from_toml_str("[touch]\ndispatch = \"deferred\"").unwrap();
//! let mut device = config.textures.headless_device();
//! let mut frame_loop: FrameLoop = FrameLoop::new(config).unwrap();
//! frame_loop.add_particle_system([0.0, 0.0]);
//!
//! let stats = frame_loop.tick(1.0 / 60.0, &mut device).unwrap();
//! assert_eq!(stats.frame, 0);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod frame_loop;

pub use lumen_core as core;
pub use lumen_input as input;
pub use lumen_rendering as rendering;

pub use config::{EngineConfig, FrameConfig, TextureConfig};
pub use error::{EngineError, EngineResult};
pub use frame_loop::{FrameLoop, FrameStats, FrameStatsAccumulator, MAX_FRAME_TIME, TARGET_FRAME_TIME};

pub use lumen_core::{DeferredPool, ObjectPool, PoolConfig, PoolHandle, Recyclable};
pub use lumen_input::{DispatchMode, TouchAction, TouchConfig, TouchDispatcher, TouchEvent};
pub use lumen_rendering::{
    GraphicsDevice, HardwareTexture, HeadlessDevice, ParticleSystem, ParticleSystemConfig,
    Texture, TextureManager,
};

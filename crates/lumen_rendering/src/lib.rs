//! # LUMEN Rendering
//!
//! Device-backed resources and per-frame effects:
//! - Textures that know exactly where their pixels are
//! - A placeholder texture instead of null checks
//! - Particles pooled, aged, and recycled every tick
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    RENDER THREAD                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TextureSource → Texture → TextureManager → GraphicsDevice  │
//! │                                                 ↑           │
//! │  ObjectPool<Particle> → ParticleSystem → vertex bytes       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//!
//! - Binding a texture that is not on the device is an error, never a blank draw
//! - A failed upload leaves the texture where it was
//! - Device calls happen on the thread that owns the graphics context

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod blend;
pub mod effects;
pub mod error;
pub mod texture;

pub use blend::{AvoidBlend, AvoidMode};
pub use effects::{
    ExpireConfig, ExpireModifier, ModifierPipeline, Particle, ParticleModifier, ParticleStats,
    ParticleSystem, ParticleSystemConfig, ParticleVertex,
};
pub use error::{BlendError, DeviceError, DeviceResult, ParticleError, TextureError, TextureResult};
pub use texture::{
    BlankTexture, GraphicsDevice, HardwareTexture, HardwareTextureId, HeadlessDevice,
    MemorySource, PixelData, PixelFormat, Texture, TextureId, TextureManager, TextureOptions,
    TextureSource, TextureState, TextureStateListener, TextureUnit, TextureUpdateReport,
};

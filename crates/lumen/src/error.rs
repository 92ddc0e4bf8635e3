//! # Engine Error Types

use thiserror::Error;

use lumen_core::ConfigError;
use lumen_input::TouchError;
use lumen_rendering::ParticleError;

/// Errors surfaced by a frame or by engine setup.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Touch delivery failed.
    #[error(transparent)]
    Touch(#[from] TouchError),

    /// A particle system failed to spawn or recycle.
    #[error(transparent)]
    Particle(#[from] ParticleError),

    /// The configuration is malformed or inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

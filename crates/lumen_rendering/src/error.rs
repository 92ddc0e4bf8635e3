//! # Rendering Error Types
//!
//! Texture, device, blend, and particle errors.

use thiserror::Error;

use lumen_core::PoolError;

use crate::texture::{HardwareTextureId, TextureId, TextureState};

/// Errors reported by a graphics device.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The upload does not fit in the remaining device memory.
    #[error("out of device memory: requested {requested} bytes, {available} available")]
    OutOfMemory {
        /// Bytes the upload needs.
        requested: usize,
        /// Bytes left on the device.
        available: usize,
    },

    /// The device does not know this texture handle.
    #[error("unknown hardware texture {0:?}")]
    UnknownTexture(HardwareTextureId),

    /// The texture unit index is beyond what the device supports.
    #[error("texture unit {unit} out of range (device has {max})")]
    InvalidUnit {
        /// Requested unit.
        unit: u32,
        /// Number of units on the device.
        max: u32,
    },

    /// The device refused the operation for a backend-specific reason.
    #[error("device rejected the operation: {0}")]
    Rejected(String),
}

/// Errors from texture state transitions.
#[derive(Error, Debug)]
pub enum TextureError {
    /// Bind was called on a texture that is not on the device.
    #[error("texture {id:?} bound while {state:?}; load it to hardware first")]
    NotLoadedToHardware {
        /// The texture.
        id: TextureId,
        /// Its state when bind was attempted.
        state: TextureState,
    },

    /// An upload was attempted without a software payload.
    #[error("texture {0:?} has no software payload to upload")]
    SoftwarePayloadMissing(TextureId),

    /// The device rejected the upload. The texture keeps its previous state.
    #[error("upload of texture {id:?} failed: {source}")]
    Upload {
        /// The texture.
        id: TextureId,
        /// What the device reported.
        #[source]
        source: DeviceError,
    },

    /// Bind failed at the device level.
    #[error("bind of texture {id:?} failed: {source}")]
    Bind {
        /// The texture.
        id: TextureId,
        /// What the device reported.
        #[source]
        source: DeviceError,
    },

    /// The texture source could not produce pixels.
    #[error("texture source failed: {0}")]
    Source(#[from] std::io::Error),
}

impl TextureError {
    /// Returns true if the caller may retry the operation later.
    ///
    /// Contract violations (binding an unloaded texture) are not recoverable:
    /// they indicate the render pass skipped a transition.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotLoadedToHardware { .. })
    }
}

/// Errors constructing blend state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendError {
    /// Tolerance must lie in `0..=255`.
    #[error("tolerance must be 0..=255, got {0}")]
    ToleranceOutOfRange(i32),
}

/// Errors from the particle pipeline.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParticleError {
    /// Lifetime bounds are negative, non-finite, or inverted.
    #[error("invalid lifetime range [{min}, {max}]")]
    InvalidLifetimeRange {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },

    /// The particle pool refused the request.
    #[error("particle pool: {0}")]
    Pool(#[from] PoolError),
}

/// Result type for texture operations.
pub type TextureResult<T> = Result<T, TextureError>;

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

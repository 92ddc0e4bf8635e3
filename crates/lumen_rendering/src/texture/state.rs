//! Texture identity, lifecycle states, and state listeners.

use std::sync::atomic::{AtomicU32, Ordering};

/// Logical identity of a texture, independent of any device handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u32);

impl TextureId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Where a texture's pixels currently live.
///
/// ```text
///            load()              load_to_hardware()
/// Unloaded ─────────> SoftwareLoaded ─────────────────> HardwareLoaded
///    ^                   ^    unload_from_hardware()        │
///    │                   └──────────────────────────────────┤
///    └───────────────────── unload() ───────────────────────┘
/// ```
///
/// "Needs update" is tracked separately: it is orthogonal to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureState {
    /// No pixels anywhere.
    Unloaded,
    /// Pixels in process memory only.
    SoftwareLoaded,
    /// Pixels in process memory and on the device.
    HardwareLoaded,
}

impl TextureState {
    /// Checks whether the software payload is present.
    #[inline]
    #[must_use]
    pub const fn has_software_payload(self) -> bool {
        !matches!(self, Self::Unloaded)
    }
}

/// Notified when a texture crosses the hardware boundary.
pub trait TextureStateListener {
    /// The texture is now resident on the device.
    fn on_loaded_to_hardware(&mut self, texture: TextureId);

    /// The texture left the device.
    fn on_unloaded_from_hardware(&mut self, texture: TextureId);
}

/// Listener that reports hardware transitions through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingTextureStateListener;

impl TextureStateListener for LoggingTextureStateListener {
    fn on_loaded_to_hardware(&mut self, texture: TextureId) {
        tracing::debug!(texture = texture.raw(), "texture loaded to hardware");
    }

    fn on_unloaded_from_hardware(&mut self, texture: TextureId) {
        tracing::debug!(texture = texture.raw(), "texture unloaded from hardware");
    }
}

//! # Graphics Device Seam
//!
//! The texture state machine never talks to a graphics API directly. Every
//! device-touching transition goes through [`GraphicsDevice`], implemented by
//! the engine's backend and by [`HeadlessDevice`] for tests and headless runs.
//!
//! All calls must come from the thread that owns the graphics context.

use std::collections::HashMap;

use crate::error::{DeviceError, DeviceResult};
use crate::texture::{PixelData, TextureOptions};

/// Device-side texture name.
///
/// [`HardwareTextureId::INVALID`] means "not on the device".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HardwareTextureId(u32);

impl HardwareTextureId {
    /// The "not bound" sentinel.
    pub const INVALID: Self = Self(u32::MAX);

    /// Wraps a raw device name.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw device name.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Checks whether this names a live device texture.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Default for HardwareTextureId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Index of a texture sampling unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct TextureUnit(pub u32);

/// Operations the texture state machine needs from a graphics backend.
pub trait GraphicsDevice {
    /// Uploads pixels into new device memory.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::OutOfMemory`] or [`DeviceError::Rejected`] when
    /// the device cannot hold the texture.
    fn create_texture(
        &mut self,
        pixels: &PixelData,
        options: &TextureOptions,
    ) -> DeviceResult<HardwareTextureId>;

    /// Replaces the contents of an existing device texture.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownTexture`] for a dead handle, or a memory
    /// error if the new pixels do not fit.
    fn update_texture(&mut self, id: HardwareTextureId, pixels: &PixelData) -> DeviceResult<()>;

    /// Frees device memory. Unknown ids are ignored.
    fn delete_texture(&mut self, id: HardwareTextureId);

    /// Makes the texture current on `unit`.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownTexture`] or [`DeviceError::InvalidUnit`].
    fn bind_texture(&mut self, id: HardwareTextureId, unit: TextureUnit) -> DeviceResult<()>;
}

/// Per-texture record kept by the headless device.
#[derive(Debug, Clone, Copy)]
struct DeviceTexture {
    bytes: usize,
    options: TextureOptions,
}

/// Statistics from the headless device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Textures created.
    pub uploads: u64,
    /// Textures updated in place.
    pub updates: u64,
    /// Textures deleted.
    pub deletes: u64,
    /// Bind calls that succeeded.
    pub binds: u64,
}

/// An in-process graphics device.
///
/// Tracks texture memory against an optional budget, records bindings per
/// unit, and can be told to reject the next upload.
#[derive(Debug)]
pub struct HeadlessDevice {
    textures: HashMap<HardwareTextureId, DeviceTexture>,
    next_id: u32,
    memory_budget: Option<usize>,
    memory_used: usize,
    bound: Vec<Option<HardwareTextureId>>,
    fail_next_upload: bool,
    stats: DeviceStats,
}

impl HeadlessDevice {
    /// Texture units on a headless device.
    pub const TEXTURE_UNITS: u32 = 16;

    /// Creates a device with unlimited memory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            next_id: 1,
            memory_budget: None,
            memory_used: 0,
            bound: vec![None; Self::TEXTURE_UNITS as usize],
            fail_next_upload: false,
            stats: DeviceStats::default(),
        }
    }

    /// Creates a device holding at most `bytes` of texture memory.
    #[must_use]
    pub fn with_memory_budget(bytes: usize) -> Self {
        Self {
            memory_budget: Some(bytes),
            ..Self::new()
        }
    }

    /// Makes the next `create_texture` or `update_texture` fail.
    pub fn fail_next_upload(&mut self) {
        self.fail_next_upload = true;
    }

    /// Bytes of texture memory in use.
    #[must_use]
    pub const fn memory_used(&self) -> usize {
        self.memory_used
    }

    /// Number of live device textures.
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Checks whether the device knows this texture.
    #[must_use]
    pub fn contains(&self, id: HardwareTextureId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Sampling options a texture was created with.
    #[must_use]
    pub fn options_of(&self, id: HardwareTextureId) -> Option<TextureOptions> {
        self.textures.get(&id).map(|texture| texture.options)
    }

    /// The texture currently bound on `unit`.
    #[must_use]
    pub fn bound_texture(&self, unit: TextureUnit) -> Option<HardwareTextureId> {
        self.bound.get(unit.0 as usize).copied().flatten()
    }

    /// Operation counters.
    #[must_use]
    pub const fn stats(&self) -> DeviceStats {
        self.stats
    }

    /// Simulates losing the graphics context: every device texture is gone.
    pub fn lose_context(&mut self) {
        self.textures.clear();
        self.memory_used = 0;
        self.bound.iter_mut().for_each(|slot| *slot = None);
    }

    fn reserve(&mut self, requested: usize, released: usize) -> DeviceResult<()> {
        if std::mem::take(&mut self.fail_next_upload) {
            return Err(DeviceError::Rejected("injected upload failure".to_owned()));
        }
        if let Some(budget) = self.memory_budget {
            let available = budget.saturating_sub(self.memory_used - released);
            if requested > available {
                return Err(DeviceError::OutOfMemory {
                    requested,
                    available,
                });
            }
        }
        Ok(())
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessDevice {
    fn create_texture(
        &mut self,
        pixels: &PixelData,
        options: &TextureOptions,
    ) -> DeviceResult<HardwareTextureId> {
        let bytes = pixels.byte_len();
        self.reserve(bytes, 0)?;

        let id = HardwareTextureId(self.next_id);
        self.next_id += 1;
        self.textures.insert(
            id,
            DeviceTexture {
                bytes,
                options: *options,
            },
        );
        self.memory_used += bytes;
        self.stats.uploads += 1;
        Ok(id)
    }

    fn update_texture(&mut self, id: HardwareTextureId, pixels: &PixelData) -> DeviceResult<()> {
        let old = self
            .textures
            .get(&id)
            .map(|texture| texture.bytes)
            .ok_or(DeviceError::UnknownTexture(id))?;
        let bytes = pixels.byte_len();
        self.reserve(bytes, old)?;

        if let Some(texture) = self.textures.get_mut(&id) {
            texture.bytes = bytes;
        }
        self.memory_used = self.memory_used - old + bytes;
        self.stats.updates += 1;
        Ok(())
    }

    fn delete_texture(&mut self, id: HardwareTextureId) {
        if let Some(texture) = self.textures.remove(&id) {
            self.memory_used -= texture.bytes;
            self.stats.deletes += 1;
            for slot in &mut self.bound {
                if *slot == Some(id) {
                    *slot = None;
                }
            }
        }
    }

    fn bind_texture(&mut self, id: HardwareTextureId, unit: TextureUnit) -> DeviceResult<()> {
        if !self.textures.contains_key(&id) {
            return Err(DeviceError::UnknownTexture(id));
        }
        let slot = self
            .bound
            .get_mut(unit.0 as usize)
            .ok_or(DeviceError::InvalidUnit {
                unit: unit.0,
                max: Self::TEXTURE_UNITS,
            })?;
        *slot = Some(id);
        self.stats.binds += 1;
        Ok(())
    }
}

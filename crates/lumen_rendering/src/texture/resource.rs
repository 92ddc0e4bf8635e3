//! The hardware texture contract shared by real and placeholder textures.

use crate::error::TextureResult;
use crate::texture::{
    GraphicsDevice, HardwareTextureId, PixelFormat, TextureId, TextureOptions, TextureState,
    TextureStateListener, TextureUnit,
};

/// A resource whose pixels live in process memory and, optionally, on the
/// graphics device.
///
/// Render passes drive the transitions explicitly; nothing here happens
/// behind the caller's back. Implemented by [`crate::texture::Texture`] and by
/// the placeholder [`crate::texture::BlankTexture`], which absorbs every call.
///
/// Device-touching methods must run on the thread owning the graphics context.
pub trait HardwareTexture {
    /// Logical identity.
    fn id(&self) -> TextureId;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Current lifecycle state.
    fn state(&self) -> TextureState;

    /// Checks whether the texture can be bound for drawing right now.
    #[inline]
    fn is_loaded_to_hardware(&self) -> bool {
        self.state() == TextureState::HardwareLoaded
    }

    /// Device handle, [`HardwareTextureId::INVALID`] when not on the device.
    fn hardware_id(&self) -> HardwareTextureId;

    /// Checks whether software pixels changed since the last upload.
    fn is_update_on_hardware_needed(&self) -> bool;

    /// Flags (or clears) a pending re-upload.
    fn set_update_on_hardware_needed(&mut self, needed: bool);

    /// Forgets the device handle without touching the device, after the
    /// graphics context was lost. The software payload is kept.
    fn mark_not_loaded_to_hardware(&mut self);

    /// Pixel layout.
    fn pixel_format(&self) -> PixelFormat;

    /// Sampling options.
    fn options(&self) -> TextureOptions;

    /// Estimated device memory in bytes.
    fn memory_footprint(&self) -> usize;

    /// Unloaded → `SoftwareLoaded`. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TextureError::Source`] when the pixel source fails.
    fn load(&mut self) -> TextureResult<()>;

    /// `SoftwareLoaded` → `HardwareLoaded`.
    ///
    /// # Errors
    ///
    /// Recoverable: [`crate::TextureError::SoftwarePayloadMissing`] before
    /// `load()`, [`crate::TextureError::Upload`] if the device refuses. The
    /// state is unchanged on failure.
    fn load_to_hardware(&mut self, device: &mut dyn GraphicsDevice) -> TextureResult<()>;

    /// Re-uploads the current software payload and clears "needs update".
    ///
    /// # Errors
    ///
    /// Same as [`HardwareTexture::load_to_hardware`].
    fn reload_to_hardware(&mut self, device: &mut dyn GraphicsDevice) -> TextureResult<()>;

    /// Makes the texture current on `unit` (unit 0 when `None`), re-uploading
    /// first if an update is pending.
    ///
    /// # Errors
    ///
    /// [`crate::TextureError::NotLoadedToHardware`] when the texture is not on
    /// the device: the render pass skipped `load` + `load_to_hardware`.
    fn bind(&mut self, device: &mut dyn GraphicsDevice, unit: Option<TextureUnit>)
        -> TextureResult<()>;

    /// `HardwareLoaded` → `SoftwareLoaded`; the device handle is released.
    fn unload_from_hardware(&mut self, device: &mut dyn GraphicsDevice);

    /// Any state → `Unloaded`; payload and device handle are discarded.
    fn unload(&mut self, device: &mut dyn GraphicsDevice);

    /// Installs (or removes) the hardware transition listener.
    fn set_state_listener(&mut self, listener: Option<Box<dyn TextureStateListener>>);

    /// Checks whether a listener is installed.
    fn has_state_listener(&self) -> bool;
}

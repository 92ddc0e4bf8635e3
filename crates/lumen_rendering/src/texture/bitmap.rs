//! # Bitmap Texture
//!
//! The real texture: pixels pulled from a [`TextureSource`], mirrored on the
//! device on request.

use crate::error::{TextureError, TextureResult};
use crate::texture::{
    GraphicsDevice, HardwareTexture, HardwareTextureId, PixelData, PixelFormat, TextureId,
    TextureOptions, TextureSource, TextureState, TextureStateListener, TextureUnit,
};

/// A texture backed by a pixel source.
///
/// # Example
///
/// ```rust
/// use lumen_rendering::texture::{HardwareTexture, HeadlessDevice, MemorySource, Texture, TextureOptions};
///
/// let mut device = HeadlessDevice::new();
/// let mut texture = Texture::new(MemorySource::solid(4, 4, [255; 4]), TextureOptions::BILINEAR);
///
/// texture.load()?;
/// texture.load_to_hardware(&mut device)?;
/// texture.bind(&mut device, None)?;
/// # Ok::<(), lumen_rendering::TextureError>(())
/// ```
pub struct Texture {
    id: TextureId,
    source: Box<dyn TextureSource>,
    pixels: Option<PixelData>,
    state: TextureState,
    hardware_id: HardwareTextureId,
    update_needed: bool,
    width: u32,
    height: u32,
    format: PixelFormat,
    options: TextureOptions,
    listener: Option<Box<dyn TextureStateListener>>,
}

impl Texture {
    /// Creates an unloaded texture.
    #[must_use]
    pub fn new(source: impl TextureSource + 'static, options: TextureOptions) -> Self {
        Self {
            id: TextureId::next(),
            width: source.width(),
            height: source.height(),
            format: source.format(),
            source: Box::new(source),
            pixels: None,
            state: TextureState::Unloaded,
            hardware_id: HardwareTextureId::INVALID,
            update_needed: false,
            options,
            listener: None,
        }
    }

    /// Installs a listener at construction.
    #[must_use]
    pub fn with_listener(mut self, listener: impl TextureStateListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// The software payload, if loaded.
    #[must_use]
    pub const fn pixels(&self) -> Option<&PixelData> {
        self.pixels.as_ref()
    }

    /// Replaces the software payload.
    ///
    /// An unloaded texture becomes `SoftwareLoaded`; a texture already on the
    /// device is flagged for re-upload on its next bind.
    pub fn replace_pixels(&mut self, pixels: PixelData) {
        self.width = pixels.width();
        self.height = pixels.height();
        self.format = pixels.format();
        self.pixels = Some(pixels);
        match self.state {
            TextureState::Unloaded => self.state = TextureState::SoftwareLoaded,
            TextureState::SoftwareLoaded => {}
            TextureState::HardwareLoaded => self.update_needed = true,
        }
    }

    fn upload_error(&self, source: crate::error::DeviceError) -> TextureError {
        tracing::error!(texture = self.id.raw(), error = %source, "texture upload failed");
        TextureError::Upload {
            id: self.id,
            source,
        }
    }
}

impl HardwareTexture for Texture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn state(&self) -> TextureState {
        self.state
    }

    fn hardware_id(&self) -> HardwareTextureId {
        self.hardware_id
    }

    fn is_update_on_hardware_needed(&self) -> bool {
        self.update_needed
    }

    fn set_update_on_hardware_needed(&mut self, needed: bool) {
        self.update_needed = needed;
    }

    fn mark_not_loaded_to_hardware(&mut self) {
        if self.state == TextureState::HardwareLoaded {
            self.hardware_id = HardwareTextureId::INVALID;
            self.state = TextureState::SoftwareLoaded;
        }
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn options(&self) -> TextureOptions {
        self.options
    }

    fn memory_footprint(&self) -> usize {
        self.format.byte_size(self.width, self.height)
    }

    fn load(&mut self) -> TextureResult<()> {
        if self.state.has_software_payload() {
            return Ok(());
        }
        let pixels = self.source.load()?;
        self.width = pixels.width();
        self.height = pixels.height();
        self.format = pixels.format();
        self.pixels = Some(pixels);
        self.state = TextureState::SoftwareLoaded;
        tracing::trace!(texture = self.id.raw(), "texture loaded");
        Ok(())
    }

    fn load_to_hardware(&mut self, device: &mut dyn GraphicsDevice) -> TextureResult<()> {
        match self.state {
            TextureState::Unloaded => return Err(TextureError::SoftwarePayloadMissing(self.id)),
            TextureState::HardwareLoaded => {
                return if self.update_needed {
                    self.reload_to_hardware(device)
                } else {
                    Ok(())
                };
            }
            TextureState::SoftwareLoaded => {}
        }
        let Some(pixels) = self.pixels.as_ref() else {
            return Err(TextureError::SoftwarePayloadMissing(self.id));
        };

        let hardware_id = device
            .create_texture(pixels, &self.options)
            .map_err(|err| self.upload_error(err))?;

        self.hardware_id = hardware_id;
        self.state = TextureState::HardwareLoaded;
        self.update_needed = false;
        tracing::debug!(
            texture = self.id.raw(),
            hardware = hardware_id.raw(),
            bytes = self.memory_footprint(),
            "texture uploaded"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener.on_loaded_to_hardware(self.id);
        }
        Ok(())
    }

    fn reload_to_hardware(&mut self, device: &mut dyn GraphicsDevice) -> TextureResult<()> {
        if self.state != TextureState::HardwareLoaded {
            return self.load_to_hardware(device);
        }
        let Some(pixels) = self.pixels.as_ref() else {
            return Err(TextureError::SoftwarePayloadMissing(self.id));
        };

        device
            .update_texture(self.hardware_id, pixels)
            .map_err(|err| self.upload_error(err))?;

        self.update_needed = false;
        tracing::debug!(texture = self.id.raw(), "texture reloaded");
        Ok(())
    }

    fn bind(
        &mut self,
        device: &mut dyn GraphicsDevice,
        unit: Option<TextureUnit>,
    ) -> TextureResult<()> {
        if self.state != TextureState::HardwareLoaded {
            tracing::warn!(
                texture = self.id.raw(),
                state = ?self.state,
                "bind of a texture that is not on the device"
            );
            return Err(TextureError::NotLoadedToHardware {
                id: self.id,
                state: self.state,
            });
        }
        if self.update_needed {
            self.reload_to_hardware(device)?;
        }
        device
            .bind_texture(self.hardware_id, unit.unwrap_or_default())
            .map_err(|source| TextureError::Bind {
                id: self.id,
                source,
            })
    }

    fn unload_from_hardware(&mut self, device: &mut dyn GraphicsDevice) {
        if self.state != TextureState::HardwareLoaded {
            return;
        }
        device.delete_texture(self.hardware_id);
        self.hardware_id = HardwareTextureId::INVALID;
        self.state = TextureState::SoftwareLoaded;
        tracing::debug!(texture = self.id.raw(), "texture unloaded from hardware");
        if let Some(listener) = self.listener.as_mut() {
            listener.on_unloaded_from_hardware(self.id);
        }
    }

    fn unload(&mut self, device: &mut dyn GraphicsDevice) {
        self.unload_from_hardware(device);
        self.pixels = None;
        self.update_needed = false;
        self.state = TextureState::Unloaded;
    }

    fn set_state_listener(&mut self, listener: Option<Box<dyn TextureStateListener>>) {
        self.listener = listener;
    }

    fn has_state_listener(&self) -> bool {
        self.listener.is_some()
    }
}

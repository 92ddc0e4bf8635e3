//! The placeholder texture.

use crate::error::TextureResult;
use crate::texture::{
    GraphicsDevice, HardwareTexture, HardwareTextureId, PixelFormat, TextureId, TextureOptions,
    TextureState, TextureStateListener, TextureUnit,
};

/// A texture that is never anything.
///
/// Every transition succeeds and changes nothing; the hardware id is always
/// invalid and the footprint always zero. Use it where a collaborator needs
/// *some* texture before the real one exists, and test
/// [`HardwareTexture::is_loaded_to_hardware`] before drawing with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankTexture {
    id: TextureId,
}

impl BlankTexture {
    /// Creates a placeholder with its own identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: TextureId::next(),
        }
    }
}

impl Default for BlankTexture {
    fn default() -> Self {
        Self::new()
    }
}

impl HardwareTexture for BlankTexture {
    fn id(&self) -> TextureId {
        self.id
    }

    fn width(&self) -> u32 {
        0
    }

    fn height(&self) -> u32 {
        0
    }

    fn state(&self) -> TextureState {
        TextureState::Unloaded
    }

    fn hardware_id(&self) -> HardwareTextureId {
        HardwareTextureId::INVALID
    }

    fn is_update_on_hardware_needed(&self) -> bool {
        false
    }

    fn set_update_on_hardware_needed(&mut self, _needed: bool) {}

    fn mark_not_loaded_to_hardware(&mut self) {}

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Undefined
    }

    fn options(&self) -> TextureOptions {
        TextureOptions::DEFAULT
    }

    fn memory_footprint(&self) -> usize {
        0
    }

    fn load(&mut self) -> TextureResult<()> {
        Ok(())
    }

    fn load_to_hardware(&mut self, _device: &mut dyn GraphicsDevice) -> TextureResult<()> {
        Ok(())
    }

    fn reload_to_hardware(&mut self, _device: &mut dyn GraphicsDevice) -> TextureResult<()> {
        Ok(())
    }

    fn bind(
        &mut self,
        _device: &mut dyn GraphicsDevice,
        _unit: Option<TextureUnit>,
    ) -> TextureResult<()> {
        Ok(())
    }

    fn unload_from_hardware(&mut self, _device: &mut dyn GraphicsDevice) {}

    fn unload(&mut self, _device: &mut dyn GraphicsDevice) {}

    fn set_state_listener(&mut self, _listener: Option<Box<dyn TextureStateListener>>) {}

    fn has_state_listener(&self) -> bool {
        false
    }
}

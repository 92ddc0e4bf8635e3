//! # Texture Manager
//!
//! Owns every registered texture and batches the device work into one pass
//! per frame. Game code queues loads and unloads from anywhere on the render
//! thread; [`TextureManager::update_textures`] performs them while the
//! graphics context is current.
//!
//! ```text
//! load_texture(id) ──> to_load ──┐
//!                                ├── update_textures(device) ──> GraphicsDevice
//! unload_texture(id) ─> to_unload┘
//! ```

use std::collections::{HashMap, VecDeque};

use crate::texture::{GraphicsDevice, HardwareTexture, TextureId};

/// What one update pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureUpdateReport {
    /// Textures uploaded to the device.
    pub uploaded: u32,
    /// Textures re-uploaded because their pixels changed.
    pub reloaded: u32,
    /// Textures removed from the device.
    pub unloaded: u32,
    /// Uploads that failed and stay queued.
    pub failed: u32,
}

/// Registry of textures with queued device transitions.
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<TextureId, Box<dyn HardwareTexture>>,
    to_load: VecDeque<TextureId>,
    to_unload: VecDeque<TextureId>,
}

impl TextureManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a texture. Nothing is loaded yet.
    pub fn register(&mut self, texture: impl HardwareTexture + 'static) -> TextureId {
        let id = texture.id();
        self.textures.insert(id, Box::new(texture));
        id
    }

    /// Removes a texture, freeing its device memory.
    pub fn unregister(
        &mut self,
        id: TextureId,
        device: &mut dyn GraphicsDevice,
    ) -> Option<Box<dyn HardwareTexture>> {
        self.to_load.retain(|queued| *queued != id);
        self.to_unload.retain(|queued| *queued != id);
        let mut texture = self.textures.remove(&id)?;
        texture.unload_from_hardware(device);
        Some(texture)
    }

    /// Queues a texture for upload on the next pass.
    ///
    /// Returns false for an unknown id.
    pub fn load_texture(&mut self, id: TextureId) -> bool {
        if !self.textures.contains_key(&id) {
            return false;
        }
        self.to_unload.retain(|queued| *queued != id);
        if !self.to_load.contains(&id) {
            self.to_load.push_back(id);
        }
        true
    }

    /// Queues a texture for removal from the device on the next pass.
    ///
    /// Returns false for an unknown id.
    pub fn unload_texture(&mut self, id: TextureId) -> bool {
        if !self.textures.contains_key(&id) {
            return false;
        }
        self.to_load.retain(|queued| *queued != id);
        if !self.to_unload.contains(&id) {
            self.to_unload.push_back(id);
        }
        true
    }

    /// Looks up a texture.
    #[must_use]
    pub fn get(&self, id: TextureId) -> Option<&dyn HardwareTexture> {
        self.textures.get(&id).map(AsRef::as_ref)
    }

    /// Looks up a texture mutably.
    pub fn get_mut(&mut self, id: TextureId) -> Option<&mut (dyn HardwareTexture + 'static)> {
        self.textures.get_mut(&id).map(AsMut::as_mut)
    }

    /// Runs the device work for this frame.
    ///
    /// Order: re-upload textures whose pixels changed, upload queued loads,
    /// then release queued unloads. Failed uploads stay queued and are
    /// retried next pass; the texture itself stays in its last good state.
    pub fn update_textures(&mut self, device: &mut dyn GraphicsDevice) -> TextureUpdateReport {
        let mut report = TextureUpdateReport::default();

        for texture in self.textures.values_mut() {
            if texture.is_loaded_to_hardware() && texture.is_update_on_hardware_needed() {
                match texture.reload_to_hardware(device) {
                    Ok(()) => report.reloaded += 1,
                    Err(_) => report.failed += 1,
                }
            }
        }

        // Failures go back on the same queue; one pass visits each entry once.
        for _ in 0..self.to_load.len() {
            let Some(id) = self.to_load.pop_front() else {
                break;
            };
            let Some(texture) = self.textures.get_mut(&id) else {
                continue;
            };
            let result = texture
                .load()
                .and_then(|()| texture.load_to_hardware(device));
            match result {
                Ok(()) => report.uploaded += 1,
                Err(err) => {
                    tracing::debug!(texture = id.raw(), error = %err, "texture load deferred");
                    report.failed += 1;
                    self.to_load.push_back(id);
                }
            }
        }

        while let Some(id) = self.to_unload.pop_front() {
            if let Some(texture) = self.textures.get_mut(&id) {
                if texture.is_loaded_to_hardware() {
                    texture.unload_from_hardware(device);
                    report.unloaded += 1;
                }
            }
        }

        report
    }

    /// Forgets every device handle after the graphics context was lost and
    /// requeues the affected textures for upload.
    pub fn on_context_lost(&mut self) {
        let mut requeued = 0_usize;
        for (id, texture) in &mut self.textures {
            if texture.is_loaded_to_hardware() {
                texture.mark_not_loaded_to_hardware();
                if !self.to_load.contains(id) {
                    self.to_load.push_back(*id);
                }
                requeued += 1;
            }
        }
        tracing::debug!(requeued, "graphics context lost");
    }

    /// Estimated device memory held by loaded textures.
    #[must_use]
    pub fn memory_used(&self) -> usize {
        self.textures
            .values()
            .filter(|texture| texture.is_loaded_to_hardware())
            .map(|texture| texture.memory_footprint())
            .sum()
    }

    /// Number of registered textures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    /// Checks whether no texture is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Textures waiting for upload.
    #[must_use]
    pub fn pending_loads(&self) -> usize {
        self.to_load.len()
    }

    /// Textures waiting for removal from the device.
    #[must_use]
    pub fn pending_unloads(&self) -> usize {
        self.to_unload.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{
        BlankTexture, HeadlessDevice, MemorySource, PixelData, Texture, TextureOptions,
        TextureState,
    };

    fn solid(side: u32) -> Texture {
        Texture::new(MemorySource::solid(side, side, [255; 4]), TextureOptions::DEFAULT)
    }

    #[test]
    fn test_queued_load_and_unload() {
        let mut device = HeadlessDevice::new();
        let mut manager = TextureManager::new();
        let id = manager.register(solid(4));
        assert!(manager.load_texture(id));
        assert_eq!(manager.pending_loads(), 1);

        let report = manager.update_textures(&mut device);
        assert_eq!(report.uploaded, 1);
        assert!(manager.get(id).unwrap().is_loaded_to_hardware());
        assert_eq!(manager.memory_used(), 64);

        assert!(manager.unload_texture(id));
        let report = manager.update_textures(&mut device);
        assert_eq!(report.unloaded, 1);
        assert_eq!(manager.get(id).unwrap().state(), TextureState::SoftwareLoaded);
        assert_eq!(manager.memory_used(), 0);
        assert_eq!(device.texture_count(), 0);
    }

    #[test]
    fn test_unknown_id_is_rejected() {
        let mut manager = TextureManager::new();
        let stranger = BlankTexture::new();
        assert!(!manager.load_texture(stranger.id()));
        assert!(!manager.unload_texture(stranger.id()));
    }

    #[test]
    fn test_failed_upload_is_retried() {
        let mut device = HeadlessDevice::with_memory_budget(64);
        let mut manager = TextureManager::new();
        let first = manager.register(solid(4));
        let second = manager.register(solid(4));
        manager.load_texture(first);
        manager.load_texture(second);

        let report = manager.update_textures(&mut device);
        assert_eq!((report.uploaded, report.failed), (1, 1));
        assert_eq!(manager.pending_loads(), 1);
        assert_eq!(manager.get(second).unwrap().state(), TextureState::SoftwareLoaded);

        manager.unload_texture(first);
        manager.update_textures(&mut device);
        let report = manager.update_textures(&mut device);
        assert_eq!(report.uploaded, 1);
        assert!(manager.get(second).unwrap().is_loaded_to_hardware());
    }

    #[test]
    fn test_retry_reuses_queue() {
        let mut device = HeadlessDevice::with_memory_budget(16);
        let mut manager = TextureManager::new();
        let small = manager.register(solid(1));
        let big = manager.register(solid(4));
        let other = manager.register(solid(4));
        manager.load_texture(big);
        manager.load_texture(small);
        manager.load_texture(other);

        let report = manager.update_textures(&mut device);
        assert_eq!((report.uploaded, report.failed), (1, 2));
        let capacity = manager.to_load.capacity();

        for _ in 0..50 {
            let report = manager.update_textures(&mut device);
            assert_eq!((report.uploaded, report.failed), (0, 2));
        }
        assert_eq!(manager.to_load.capacity(), capacity);
        assert_eq!(manager.to_load.iter().copied().collect::<Vec<_>>(), vec![big, other]);
        assert!(manager.get(small).unwrap().is_loaded_to_hardware());
    }

    #[test]
    fn test_reload_of_changed_pixels() {
        let mut device = HeadlessDevice::new();
        let mut manager = TextureManager::new();
        let id = manager.register(solid(2));
        manager.load_texture(id);
        manager.update_textures(&mut device);

        manager.get_mut(id).unwrap().set_update_on_hardware_needed(true);
        let report = manager.update_textures(&mut device);
        assert_eq!(report.reloaded, 1);
        assert!(!manager.get(id).unwrap().is_update_on_hardware_needed());
    }

    #[test]
    fn test_context_loss_requeues() {
        let mut device = HeadlessDevice::new();
        let mut manager = TextureManager::new();
        let id = manager.register(solid(2));
        manager.register(BlankTexture::new());
        manager.load_texture(id);
        manager.update_textures(&mut device);

        device.lose_context();
        manager.on_context_lost();
        assert_eq!(manager.pending_loads(), 1);
        assert_eq!(manager.memory_used(), 0);

        manager.update_textures(&mut device);
        let texture = manager.get_mut(id).unwrap();
        texture.bind(&mut device, None).unwrap();
    }

    #[test]
    fn test_unregister_frees_device_memory() {
        let mut device = HeadlessDevice::new();
        let mut manager = TextureManager::new();
        let mut texture = solid(2);
        texture.replace_pixels(PixelData::filled(2, 2, [1, 2, 3, 4]));
        let id = manager.register(texture);
        manager.load_texture(id);
        manager.update_textures(&mut device);
        assert_eq!(device.texture_count(), 1);

        let removed = manager.unregister(id, &mut device).unwrap();
        assert_eq!(removed.state(), TextureState::SoftwareLoaded);
        assert!(manager.is_empty());
        assert_eq!(device.texture_count(), 0);
    }
}

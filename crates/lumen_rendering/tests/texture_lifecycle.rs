//! # Texture Lifecycle Tests
//!
//! End-to-end checks of the texture state machine against the headless
//! device:
//!
//! 1. **Round trip**: load → upload → bind → unload
//! 2. **Contract**: binding before upload fails loudly
//! 3. **Recovery**: a refused upload leaves the texture retryable
//! 4. **Placeholder**: the blank texture never changes
//! 5. **Particles**: pooled particles expire and come back

use lumen_rendering::texture::{
    BlankTexture, GraphicsDevice, HardwareTexture, HeadlessDevice, MemorySource, PixelData,
    Texture, TextureManager, TextureOptions, TextureState, TextureUnit,
};
use lumen_rendering::{
    ExpireModifier, ParticleSystem, ParticleSystemConfig, TextureError,
};

// ============================================================================
// ROUND TRIP
// ============================================================================

#[test]
fn texture_round_trip() {
    let mut device = HeadlessDevice::new();
    let source =
        MemorySource::from_rgba(2, 2, &[[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [0; 4]])
            .unwrap();
    let mut texture = Texture::new(source, TextureOptions::BILINEAR);

    texture.load().unwrap();
    texture.load_to_hardware(&mut device).unwrap();
    texture.bind(&mut device, Some(TextureUnit(3))).unwrap();

    let hardware_id = texture.hardware_id();
    assert_eq!(device.bound_texture(TextureUnit(3)), Some(hardware_id));
    assert_eq!(device.options_of(hardware_id), Some(TextureOptions::BILINEAR));
    assert_eq!(texture.memory_footprint(), 16);

    texture.unload_from_hardware(&mut device);
    assert_eq!(texture.state(), TextureState::SoftwareLoaded);
    assert!(!device.contains(hardware_id));
    assert_eq!(device.bound_texture(TextureUnit(3)), None);

    texture.unload(&mut device);
    assert_eq!(texture.state(), TextureState::Unloaded);
}

// ============================================================================
// CONTRACT
// ============================================================================

#[test]
fn bind_without_upload_is_rejected() {
    let mut device = HeadlessDevice::new();
    let mut texture = Texture::new(MemorySource::solid(8, 8, [0; 4]), TextureOptions::DEFAULT);

    let err = texture.bind(&mut device, None).unwrap_err();
    assert!(matches!(err, TextureError::NotLoadedToHardware { .. }));
    assert!(!err.is_recoverable());
    assert_eq!(device.stats().binds, 0);
}

// ============================================================================
// RECOVERY
// ============================================================================

#[test]
fn out_of_memory_then_retry() {
    let mut device = HeadlessDevice::with_memory_budget(256);
    let mut manager = TextureManager::new();
    let big = manager.register(Texture::new(
        MemorySource::solid(8, 8, [9; 4]),
        TextureOptions::DEFAULT,
    ));
    let small = manager.register(Texture::new(
        MemorySource::solid(4, 4, [9; 4]),
        TextureOptions::DEFAULT,
    ));

    manager.load_texture(small);
    manager.load_texture(big);
    let report = manager.update_textures(&mut device);
    assert_eq!((report.uploaded, report.failed), (1, 1));
    assert_eq!(manager.get(big).unwrap().state(), TextureState::SoftwareLoaded);

    manager.unload_texture(small);
    manager.update_textures(&mut device);
    manager.update_textures(&mut device);
    assert!(manager.get(big).unwrap().is_loaded_to_hardware());
    assert_eq!(device.memory_used(), 256);
}

#[test]
fn changed_pixels_reach_the_device_on_bind() {
    let mut device = HeadlessDevice::new();
    let mut texture = Texture::new(MemorySource::solid(2, 2, [0; 4]), TextureOptions::DEFAULT);
    texture.load().unwrap();
    texture.load_to_hardware(&mut device).unwrap();

    texture.replace_pixels(PixelData::filled(4, 4, [7; 4]));
    assert!(texture.is_update_on_hardware_needed());
    texture.bind(&mut device, None).unwrap();

    assert!(!texture.is_update_on_hardware_needed());
    assert_eq!(device.memory_used(), 64);
    assert_eq!(device.stats().updates, 1);
}

// ============================================================================
// PLACEHOLDER
// ============================================================================

#[test]
fn placeholder_never_transitions() {
    let mut device = HeadlessDevice::new();
    let mut textures: Vec<Box<dyn HardwareTexture>> = vec![
        Box::new(BlankTexture::new()),
        Box::new(Texture::new(MemorySource::solid(1, 1, [1; 4]), TextureOptions::DEFAULT)),
    ];

    for texture in &mut textures {
        texture.load().unwrap();
        texture.load_to_hardware(&mut device).unwrap();
    }

    let drawable: Vec<bool> = textures.iter().map(|t| t.is_loaded_to_hardware()).collect();
    assert_eq!(drawable, vec![false, true]);

    let blank = &mut textures[0];
    blank.unload(&mut device);
    blank.bind(&mut device, None).unwrap();
    assert_eq!(blank.memory_footprint(), 0);
    assert!(!blank.hardware_id().is_valid());
    assert_eq!(device.texture_count(), 1);
}

#[test]
fn device_is_usable_as_trait_object() {
    let mut device = HeadlessDevice::new();
    let dynamic: &mut dyn GraphicsDevice = &mut device;
    let mut texture = Texture::new(MemorySource::solid(1, 1, [1; 4]), TextureOptions::DEFAULT);
    texture.load().unwrap();
    texture.load_to_hardware(dynamic).unwrap();
    assert_eq!(device.texture_count(), 1);
}

// ============================================================================
// PARTICLES
// ============================================================================

#[test]
fn particles_recycle_through_the_pool() {
    let mut system = ParticleSystem::new(
        [0.0, 0.0],
        ParticleSystemConfig {
            rate_per_second: 100.0,
            ..ParticleSystemConfig::default()
        },
    );
    system.add_modifier(ExpireModifier::new(0.1, 0.2).unwrap().with_seed(1));

    for _ in 0..120 {
        system.on_update(1.0 / 60.0).unwrap();
    }

    let stats = system.stats();
    assert!(stats.alive > 0);
    assert!(stats.alive <= 25, "alive {}", stats.alive);
    assert!(
        system.pool().capacity() < 40,
        "pool grew to {}",
        system.pool().capacity()
    );
    assert_eq!(system.pool().in_use_count(), stats.alive);
}

//! A pooled CPU-side particle and its GPU vertex layout.

use bytemuck::{Pod, Zeroable};

use lumen_core::Recyclable;

/// One particle owned by a [`crate::effects::ParticleSystem`] pool.
///
/// Kinematic and visual fields are public; the lifetime bookkeeping is
/// private so only the system advances it.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in world units.
    pub position: [f32; 2],
    /// Velocity in world units per second.
    pub velocity: [f32; 2],
    /// RGBA colour.
    pub color: [f32; 4],
    /// Uniform scale.
    pub scale: f32,
    /// Rotation in radians.
    pub rotation: f32,
    age: f32,
    expire_time: Option<f32>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: [0.0; 2],
            velocity: [0.0; 2],
            color: [1.0; 4],
            scale: 1.0,
            rotation: 0.0,
            age: 0.0,
            expire_time: None,
        }
    }
}

impl Particle {
    /// Seconds since spawn.
    #[inline]
    #[must_use]
    pub const fn age(&self) -> f32 {
        self.age
    }

    /// Age at which the particle dies, `None` for immortal particles.
    #[inline]
    #[must_use]
    pub const fn expire_time(&self) -> Option<f32> {
        self.expire_time
    }

    /// Sets the age at which the particle dies.
    pub fn set_expire_time(&mut self, expire_time: f32) {
        self.expire_time = Some(expire_time);
    }

    /// Checks whether the particle reached its expire time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expire_time.is_some_and(|expire| self.age >= expire)
    }

    /// Ages the particle and integrates its velocity.
    pub fn advance(&mut self, delta_time: f32) {
        self.age += delta_time;
        self.position[0] += self.velocity[0] * delta_time;
        self.position[1] += self.velocity[1] * delta_time;
    }

    /// Packs the drawable fields for upload.
    #[must_use]
    pub const fn to_vertex(&self) -> ParticleVertex {
        ParticleVertex {
            position: self.position,
            scale_rotation: [self.scale, self.rotation],
            color: self.color,
        }
    }
}

impl Recyclable for Particle {
    fn on_recycle(&mut self) {
        *self = Self::default();
    }
}

/// Per-particle vertex data, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleVertex {
    /// Position (xy).
    pub position: [f32; 2],
    /// Scale and rotation.
    pub scale_rotation: [f32; 2],
    /// Colour (rgba).
    pub color: [f32; 4],
}

impl ParticleVertex {
    /// Size of one vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        assert_eq!(ParticleVertex::SIZE, 32);
        assert_eq!(ParticleVertex::SIZE % 16, 0);
    }

    #[test]
    fn test_advance_and_expire() {
        let mut particle = Particle {
            velocity: [2.0, -1.0],
            ..Particle::default()
        };
        particle.set_expire_time(1.0);

        particle.advance(0.5);
        assert!(!particle.is_expired());
        assert_eq!(particle.position, [1.0, -0.5]);

        particle.advance(0.5);
        assert!(particle.is_expired());
    }

    #[test]
    fn test_immortal_without_expire_time() {
        let mut particle = Particle::default();
        particle.advance(1000.0);
        assert!(!particle.is_expired());
    }

    #[test]
    fn test_recycle_resets() {
        let mut particle = Particle::default();
        particle.set_expire_time(3.0);
        particle.advance(1.0);
        particle.color = [0.0; 4];

        particle.on_recycle();
        assert_eq!(particle, Particle::default());
    }
}

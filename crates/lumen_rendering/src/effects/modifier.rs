//! The particle modifier protocol and the ordered pipeline running it.

use crate::effects::Particle;

/// Shapes particles at spawn and on every tick.
pub trait ParticleModifier {
    /// Called once when the particle is taken from the pool.
    fn on_initialize_particle(&mut self, particle: &mut Particle);

    /// Called once per tick while the particle lives.
    fn on_update_particle(&mut self, particle: &mut Particle, delta_time: f32);
}

/// Modifiers run in insertion order. Ordering is the caller's business.
#[derive(Default)]
pub struct ModifierPipeline {
    modifiers: Vec<Box<dyn ParticleModifier>>,
}

impl ModifierPipeline {
    /// Creates an empty pipeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a modifier.
    pub fn push(&mut self, modifier: impl ParticleModifier + 'static) {
        self.modifiers.push(Box::new(modifier));
    }

    /// Number of modifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Checks whether the pipeline has no modifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Runs every initializer on a fresh particle.
    pub fn initialize(&mut self, particle: &mut Particle) {
        for modifier in &mut self.modifiers {
            modifier.on_initialize_particle(particle);
        }
    }

    /// Runs every updater on a live particle.
    pub fn update(&mut self, particle: &mut Particle, delta_time: f32) {
        for modifier in &mut self.modifiers {
            modifier.on_update_particle(particle, delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fade(f32);

    impl ParticleModifier for Fade {
        fn on_initialize_particle(&mut self, particle: &mut Particle) {
            particle.color[3] = 1.0;
        }

        fn on_update_particle(&mut self, particle: &mut Particle, delta_time: f32) {
            particle.color[3] -= self.0 * delta_time;
        }
    }

    struct Clamp;

    impl ParticleModifier for Clamp {
        fn on_initialize_particle(&mut self, _particle: &mut Particle) {}

        fn on_update_particle(&mut self, particle: &mut Particle, _delta_time: f32) {
            particle.color[3] = particle.color[3].max(0.0);
        }
    }

    #[test]
    fn test_runs_in_insertion_order() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.push(Fade(4.0));
        pipeline.push(Clamp);
        assert_eq!(pipeline.len(), 2);

        let mut particle = Particle::default();
        pipeline.initialize(&mut particle);
        pipeline.update(&mut particle, 0.5);
        assert_eq!(particle.color[3], 0.0);
    }

    #[test]
    fn test_order_changes_outcome() {
        let mut pipeline = ModifierPipeline::new();
        pipeline.push(Clamp);
        pipeline.push(Fade(4.0));

        let mut particle = Particle::default();
        pipeline.initialize(&mut particle);
        pipeline.update(&mut particle, 0.5);
        assert!(particle.color[3] < 0.0);
    }
}

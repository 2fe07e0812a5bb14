use core::f32::consts::PI;

use glam::{vec2, UVec2, Vec2};

/// PCG-based white noise; each invocation creates its own generator out of
/// the pass' seed and its own id, so that invocations are independent.
#[derive(Copy, Clone, Debug)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        let mut this = Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        };

        // Warm-up, so that neighbouring ids don't start with correlated words
        this.sample_int();
        this
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() >> 8) as f32 / 16777216.0
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform index in range `<0, len)`.
    ///
    /// Returns zero for `len == 0`, so callers must check for emptiness on
    /// their own.
    pub fn sample_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        ((self.sample() * len as f32) as usize).min(len - 1)
    }

    /// Generates a uniform sample on a circle.
    pub fn sample_circle(&mut self) -> Vec2 {
        let angle = self.sample() * PI * 2.0;

        vec2(angle.cos(), angle.sin())
    }

    /// Generates a uniform sample inside of a disk.
    pub fn sample_disk(&mut self) -> Vec2 {
        let radius = self.sample().sqrt();

        self.sample_circle() * radius
    }
}
